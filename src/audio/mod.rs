//! Microphone monitoring session
//!
//! This module provides the `SessionController` that manages:
//! - Device enumeration and selector rendering
//! - Capture stream acquisition and teardown
//! - Per-frame input level analysis
//! - Live playback routing
//! - Status reporting to the page

pub mod config;
pub mod controller;
pub mod enumerator;
pub mod error;
pub mod host;
pub mod level;
pub mod playback;
pub mod render;
pub mod state;
pub mod status;
pub mod surface;

pub use config::MonitorConfig;
pub use controller::SessionController;
pub use error::{HostError, SessionError, SessionResult};
pub use host::{CaptureConstraints, DeviceDescriptor, DeviceKind, HostEnvironment, PageOrigin};
pub use level::{level_percent, AnalyzerConfig, LevelMeter};
pub use playback::PlaybackState;
pub use render::render_device_list;
pub use state::{SessionPhase, SessionSnapshot};
pub use status::{Severity, StatusMessage};
pub use surface::{ControlState, DeviceOption, PresentationSurface};

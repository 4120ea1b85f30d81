pub mod audio;
pub mod config;
pub mod http;

pub use audio::{
    AnalyzerConfig, CaptureConstraints, ControlState, DeviceDescriptor, DeviceKind, DeviceOption,
    HostEnvironment, HostError, MonitorConfig, PageOrigin, PlaybackState, PresentationSurface,
    SessionController, SessionError, SessionPhase, SessionSnapshot, Severity, StatusMessage,
};
pub use config::Config;
pub use http::{create_router, AppState};

use serde::{Deserialize, Serialize};

use super::host::{DeviceDescriptor, HostEnvironment};

/// Lifecycle phase of the listening session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Starting,
    Listening,
    Stopping,
}

/// Mutable state owned by one session controller
pub struct SessionState<H: HostEnvironment> {
    pub phase: SessionPhase,
    pub selected_device_id: Option<String>,
    pub active_stream: Option<H::Stream>,
    /// Paired 1:1 with `active_stream`
    pub analyzer: Option<H::Analyzer>,
    /// Last successful enumeration, host order
    pub known_devices: Vec<DeviceDescriptor>,
}

impl<H: HostEnvironment> SessionState<H> {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            selected_device_id: None,
            active_stream: None,
            analyzer: None,
            known_devices: Vec::new(),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.phase == SessionPhase::Listening
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            selected_device_id: self.selected_device_id.clone(),
            has_stream: self.active_stream.is_some(),
            has_analyzer: self.analyzer.is_some(),
            known_devices: self.known_devices.clone(),
        }
    }
}

impl<H: HostEnvironment> Default for SessionState<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub selected_device_id: Option<String>,
    pub has_stream: bool,
    pub has_analyzer: bool,
    pub known_devices: Vec<DeviceDescriptor>,
}

impl SessionSnapshot {
    pub fn is_listening(&self) -> bool {
        self.phase == SessionPhase::Listening
    }

    /// Stream, analyzer and listening flag are all set or all clear
    pub fn is_consistent(&self) -> bool {
        self.has_stream == self.has_analyzer && self.has_stream == self.is_listening()
    }
}

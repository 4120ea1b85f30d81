use thiserror::Error;

/// Failures reported by the host environment (browser media APIs)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// User or OS refused microphone access
    #[error("microphone permission denied")]
    PermissionDenied,

    /// Chosen device is missing, removed, or busy
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The exact device requested cannot be opened
    #[error("capture constraints cannot be satisfied for device {0}")]
    ConstraintUnsatisfiable(String),

    /// Host refused to start playback without a user gesture
    #[error("autoplay blocked by host policy")]
    PlaybackAutoplayBlocked,

    /// Capture APIs missing or page not loaded in a secure context
    #[error("environment unsupported: {0}")]
    EnvironmentUnsupported(String),

    #[error("{0}")]
    Other(String),
}

/// Errors returned by session controller operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("no microphone selected")]
    NoDeviceSelected,

    #[error("a listening session is already active")]
    AlreadyListening,

    #[error("operation not allowed while listening")]
    Busy,

    /// Teardown finished but one or more steps reported an error
    #[error("teardown completed with {} error(s)", .0.len())]
    Teardown(Vec<HostError>),
}

impl SessionError {
    /// True when this is a host permission refusal
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, SessionError::Host(HostError::PermissionDenied))
    }
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

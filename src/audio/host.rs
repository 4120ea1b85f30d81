use serde::{Deserialize, Serialize};

use super::error::HostError;
use super::level::AnalyzerConfig;

/// Kind of media device reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    AudioInput,
    AudioOutput,
    VideoInput,
}

/// One enumerable media device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Stable per physical device for the lifetime of the page
    pub device_id: String,
    /// Human-readable name, empty until permission has been granted
    pub label: String,
    pub kind: DeviceKind,
}

impl DeviceDescriptor {
    pub fn audio_input(device_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            label: label.into(),
            kind: DeviceKind::AudioInput,
        }
    }
}

/// Constraints passed to the host when acquiring a capture stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConstraints {
    /// Exact device to open (`None` = any microphone)
    pub device_id: Option<String>,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
}

impl CaptureConstraints {
    /// Any microphone with host defaults; used to unlock device labels
    pub fn any_microphone() -> Self {
        Self {
            device_id: None,
            echo_cancellation: true,
            noise_suppression: true,
            auto_gain_control: true,
        }
    }

    /// Exact device with all voice processing disabled for faithful monitoring
    pub fn exact(device_id: impl Into<String>) -> Self {
        Self {
            device_id: Some(device_id.into()),
            echo_cancellation: false,
            noise_suppression: false,
            auto_gain_control: false,
        }
    }
}

/// Origin the page was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOrigin {
    /// URL scheme including the trailing colon, e.g. `https:`
    pub protocol: String,
    pub hostname: String,
}

impl PageOrigin {
    pub fn new(protocol: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            hostname: hostname.into(),
        }
    }

    /// Capture APIs are only exposed over HTTPS or on localhost
    pub fn is_secure(&self) -> bool {
        self.protocol == "https:" || self.hostname == "localhost"
    }
}

/// Capabilities the session controller needs from the browser
///
/// Implementations:
/// - wasm binding over `navigator.mediaDevices` / `AudioContext` / `<audio>`
/// - in-memory fakes for tests (see `tests/support`)
#[async_trait::async_trait]
pub trait HostEnvironment: Send + Sync + 'static {
    /// Opaque live capture stream
    type Stream: Send + Sync + 'static;

    /// Opaque frequency analyzer bound to one stream
    type Analyzer: Send + Sync + 'static;

    /// Whether the host exposes capture APIs at all
    fn capture_supported(&self) -> bool;

    fn page_origin(&self) -> PageOrigin;

    /// List every media device, in host order
    async fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, HostError>;

    /// Acquire a capture stream (may prompt the user)
    async fn acquire_stream(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Self::Stream, HostError>;

    /// Stop every track of the stream
    fn release_stream(&self, stream: &Self::Stream) -> Result<(), HostError>;

    /// Build a frequency analyzer fed by the stream
    fn create_analyzer(
        &self,
        stream: &Self::Stream,
        config: &AnalyzerConfig,
    ) -> Result<Self::Analyzer, HostError>;

    /// Fill `bins` with the current byte-magnitude spectrum
    fn read_spectrum(&self, analyzer: &Self::Analyzer, bins: &mut [u8]);

    /// Tear down the analysis context
    async fn close_analyzer(&self, analyzer: Self::Analyzer) -> Result<(), HostError>;

    /// Assign the stream as the playback element's source
    fn attach_playback(&self, stream: &Self::Stream) -> Result<(), HostError>;

    /// Request playback; may be refused by autoplay policy
    async fn play(&self) -> Result<(), HostError>;

    /// Clear the playback element's source
    fn detach_playback(&self) -> Result<(), HostError>;

    /// Resolve at the next rendering frame
    async fn next_frame(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_constraints_disable_processing() {
        let constraints = CaptureConstraints::exact("mic-1");
        assert_eq!(constraints.device_id.as_deref(), Some("mic-1"));
        assert!(!constraints.echo_cancellation);
        assert!(!constraints.noise_suppression);
        assert!(!constraints.auto_gain_control);
    }

    #[test]
    fn test_secure_origin() {
        assert!(PageOrigin::new("https:", "mesh.example.com").is_secure());
        assert!(PageOrigin::new("http:", "localhost").is_secure());
        assert!(!PageOrigin::new("http:", "mesh.example.com").is_secure());
        assert!(!PageOrigin::new("http:", "127.0.0.1").is_secure());
    }
}

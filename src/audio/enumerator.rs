use std::collections::HashSet;
use tracing::{info, warn};

use super::error::SessionResult;
use super::host::{CaptureConstraints, DeviceDescriptor, DeviceKind, HostEnvironment};

/// Discover audio input devices with their full labels
///
/// A throwaway capture is opened first so the host discloses device labels,
/// then released before listing, whether or not listing succeeds.
pub async fn request_devices<H: HostEnvironment>(host: &H) -> SessionResult<Vec<DeviceDescriptor>> {
    let unlock = host
        .acquire_stream(&CaptureConstraints::any_microphone())
        .await?;

    if let Err(e) = host.release_stream(&unlock) {
        warn!("Failed to release label-unlock stream: {}", e);
    }
    drop(unlock);

    let devices = host.enumerate_devices().await?;
    let inputs = filter_audio_inputs(devices);

    info!("Enumerated {} audio input device(s)", inputs.len());

    Ok(inputs)
}

/// Keep audio inputs in host order, dropping repeated identifiers
pub fn filter_audio_inputs(devices: Vec<DeviceDescriptor>) -> Vec<DeviceDescriptor> {
    let mut seen = HashSet::new();

    devices
        .into_iter()
        .filter(|device| device.kind == DeviceKind::AudioInput)
        .filter(|device| seen.insert(device.device_id.clone()))
        .collect()
}

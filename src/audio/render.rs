use super::host::DeviceDescriptor;
use super::surface::DeviceOption;

pub const NO_DEVICES_LABEL: &str = "No microphones found";
pub const PLACEHOLDER_LABEL: &str = "Select a microphone...";

/// Characters of the device id shown when a device has no label
const FALLBACK_ID_CHARS: usize = 8;

/// Project the device list onto selector options
///
/// An empty list yields a single disabled "No microphones found" entry;
/// otherwise a disabled placeholder precedes one entry per device.
pub fn render_device_list(devices: &[DeviceDescriptor]) -> Vec<DeviceOption> {
    if devices.is_empty() {
        return vec![DeviceOption {
            value: String::new(),
            label: NO_DEVICES_LABEL.to_string(),
            disabled: true,
        }];
    }

    let mut options = Vec::with_capacity(devices.len() + 1);
    options.push(DeviceOption {
        value: String::new(),
        label: PLACEHOLDER_LABEL.to_string(),
        disabled: true,
    });

    options.extend(devices.iter().map(|device| DeviceOption {
        value: device.device_id.clone(),
        label: display_label(device),
        disabled: false,
    }));

    options
}

fn display_label(device: &DeviceDescriptor) -> String {
    if !device.label.is_empty() {
        return device.label.clone();
    }

    let short_id: String = device.device_id.chars().take(FALLBACK_ID_CHARS).collect();
    format!("Microphone {}", short_id)
}

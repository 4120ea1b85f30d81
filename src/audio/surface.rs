use serde::{Deserialize, Serialize};

use super::status::StatusMessage;

/// One entry of the device selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

/// Enabled/disabled state of the page controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub select_enabled: bool,
    pub refresh_enabled: bool,
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl ControlState {
    /// Layout while no session is active
    pub fn idle() -> Self {
        Self {
            select_enabled: true,
            refresh_enabled: true,
            start_enabled: true,
            stop_enabled: false,
        }
    }

    /// Layout while listening: only stop is usable
    pub fn listening() -> Self {
        Self {
            select_enabled: false,
            refresh_enabled: false,
            start_enabled: false,
            stop_enabled: true,
        }
    }
}

/// UI elements the controller reads from and writes to
///
/// All methods are fire-and-forget updates of page elements.
pub trait PresentationSurface: Send + Sync + 'static {
    /// Replace the selector's option list
    fn set_device_options(&self, options: Vec<DeviceOption>);

    fn set_controls(&self, controls: ControlState);

    /// Show or hide the level meter container
    fn set_meter_visible(&self, visible: bool);

    /// Meter fill width, 0-100
    fn set_meter_level(&self, percent: f32);

    fn set_playback_visible(&self, visible: bool);

    /// Text of the info panel below the playback element
    fn set_info_text(&self, text: &str);

    fn set_info_visible(&self, visible: bool);

    fn show_status(&self, status: &StatusMessage);

    fn hide_status(&self);
}

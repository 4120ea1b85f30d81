use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::HostError;
use super::host::HostEnvironment;
use super::surface::PresentationSurface;

pub const MANUAL_PLAYBACK_HINT: &str = "Click play button to hear the microphone input.";

/// Outcome of routing a stream to the playback element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    /// Autoplay was refused; the user must press play
    Paused,
}

/// Attach the live stream to the playback element and try to play it
///
/// A refused `play()` is not an error: the element stays paused and the
/// info panel tells the user to start playback manually.
pub async fn route_playback<H, S>(
    host: &H,
    surface: &S,
    stream: &H::Stream,
) -> Result<PlaybackState, HostError>
where
    H: HostEnvironment,
    S: PresentationSurface,
{
    host.attach_playback(stream)?;

    match host.play().await {
        Ok(()) => {
            info!("Live playback started");
            Ok(PlaybackState::Playing)
        }
        Err(e) => {
            warn!("Could not auto-play audio: {}", e);
            surface.set_info_text(MANUAL_PLAYBACK_HINT);
            Ok(PlaybackState::Paused)
        }
    }
}

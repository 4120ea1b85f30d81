use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::host::HostEnvironment;
use super::state::SessionState;
use super::surface::PresentationSurface;

/// Full-scale value of one byte-magnitude bin
const MAX_MAGNITUDE: f32 = 255.0;

/// Configuration for the frequency analyzer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// FFT window size in samples
    pub fft_size: usize,
    /// Exponential smoothing between consecutive frames (0.0 - 1.0)
    pub smoothing_time_constant: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: 256,
            smoothing_time_constant: 0.3,
        }
    }
}

impl AnalyzerConfig {
    /// Number of bins exposed by the analyzer
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }
}

/// Mean magnitude of a byte spectrum as a 0-100 percentage
pub fn level_percent(spectrum: &[u8]) -> f32 {
    if spectrum.is_empty() {
        return 0.0;
    }

    let sum: u64 = spectrum.iter().map(|&bin| bin as u64).sum();
    let average = sum as f32 / spectrum.len() as f32;

    (average / MAX_MAGNITUDE) * 100.0
}

/// Per-frame level meter driven by the host's rendering clock
///
/// The task stops scheduling itself as soon as the liveness flag drops or
/// the analyzer disappears from the session state, checked at the top of
/// every iteration.
pub struct LevelMeter;

impl LevelMeter {
    pub fn spawn<H, S>(
        host: Arc<H>,
        surface: Arc<S>,
        state: Arc<Mutex<SessionState<H>>>,
        live: Arc<AtomicBool>,
        config: AnalyzerConfig,
    ) -> JoinHandle<()>
    where
        H: HostEnvironment,
        S: PresentationSurface,
    {
        tokio::spawn(async move {
            info!("Level meter started");

            let mut bins = vec![0u8; config.frequency_bin_count()];
            let mut frames: u64 = 0;

            loop {
                if !live.load(Ordering::SeqCst) {
                    break;
                }

                let percent = {
                    let state = state.lock().await;
                    match state.analyzer.as_ref() {
                        Some(analyzer) => {
                            host.read_spectrum(analyzer, &mut bins);
                            level_percent(&bins)
                        }
                        None => break,
                    }
                };

                surface.set_meter_level(percent);
                frames += 1;

                host.next_frame().await;
            }

            debug!("Level meter ran for {} frames", frames);
            info!("Level meter stopped");
        })
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::level::AnalyzerConfig;

/// Tunables for a monitoring session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Frequency analyzer settings for the level meter
    pub analyzer: AnalyzerConfig,

    /// How long success messages stay visible
    /// Default: 5 seconds
    pub status_auto_hide: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            status_auto_hide: Duration::from_secs(5),
        }
    }
}

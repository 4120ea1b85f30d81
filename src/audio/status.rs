use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use super::surface::PresentationSurface;

/// Severity of a status banner message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    /// CSS class applied to the banner
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

/// A message shown in the status banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
    pub posted_at: DateTime<Utc>,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
            posted_at: Utc::now(),
        }
    }
}

/// Writes status messages to the surface and auto-hides success messages
pub struct StatusBanner<S: PresentationSurface> {
    surface: Arc<S>,
    auto_hide: Duration,
    /// Bumped on every message; a pending hide only fires if unchanged
    generation: Arc<AtomicU64>,
}

impl<S: PresentationSurface> StatusBanner<S> {
    pub fn new(surface: Arc<S>, auto_hide: Duration) -> Self {
        Self {
            surface,
            auto_hide,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn info(&self, text: &str) {
        self.show(text, Severity::Info);
    }

    pub fn success(&self, text: &str) {
        self.show(text, Severity::Success);
    }

    pub fn error(&self, text: &str) {
        self.show(text, Severity::Error);
    }

    /// Show a message; must be called from within a tokio runtime
    pub fn show(&self, text: &str, severity: Severity) {
        let status = StatusMessage::new(text, severity);
        let current = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        match severity {
            Severity::Error => error!("Status: {}", text),
            _ => info!("Status: {}", text),
        }

        self.surface.show_status(&status);

        if severity == Severity::Success {
            let surface = Arc::clone(&self.surface);
            let generation = Arc::clone(&self.generation);
            let delay = self.auto_hide;

            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if generation.load(Ordering::SeqCst) == current {
                    debug!("Auto-hiding status banner");
                    surface.hide_status();
                }
            });
        }
    }
}

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub plugin: PluginConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Where and how the monitoring page is hosted
#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    /// URL segment under `/plugins/`
    pub name: String,
    /// Directory holding `index.html` and the page assets
    pub web_root: PathBuf,
    /// Where unauthenticated visitors are redirected
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Cookie carrying the session token
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_session_cookie() -> String {
    "session".to_string()
}

impl PluginConfig {
    /// Route prefix for the page and its assets
    pub fn route_prefix(&self) -> String {
        format!("/plugins/{}", self.name)
    }
}

impl Config {
    /// Load from a config file, with `MIC_LISTEN__SECTION__KEY` overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("MIC_LISTEN").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

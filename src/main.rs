use anyhow::{Context, Result};
use clap::Parser;
use mic_listen::{create_router, AppState, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Host the microphone monitoring page
#[derive(Debug, Parser)]
#[command(name = "mic-listen", version)]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/mic-listen")]
    config: String,

    /// Pre-register a session as TOKEN=USER_ID (repeatable); otherwise the
    /// embedding server must register sessions through `AppState`
    #[arg(long = "session", value_parser = parse_session)]
    sessions: Vec<(String, String)>,
}

fn parse_session(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((token, user)) if !token.is_empty() && !user.is_empty() => {
            Ok((token.to_string(), user.to_string()))
        }
        _ => Err(format!("expected TOKEN=USER_ID, got '{}'", raw)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Serving page assets from {}", cfg.plugin.web_root.display());

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let prefix = cfg.plugin.route_prefix();

    let state = AppState::new(cfg.plugin);
    for (token, user_id) in args.sessions {
        info!("Registered session for user {}", user_id);
        state.register_session(token, user_id).await;
    }
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Plugin web interface available at: {}/main", prefix);
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

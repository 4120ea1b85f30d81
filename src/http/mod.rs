//! HTTP host for the monitoring page
//!
//! - GET /plugins/:plugin/main - Monitoring page (authenticated users only)
//! - GET /plugins/:plugin/*    - Static page assets
//! - GET /health               - Health check
//!
//! Authentication is not handled here: the page is only served to callers
//! whose session cookie is present in `AppState`'s session map. An embedding
//! server fills that map via `AppState::register_session`; the standalone
//! binary can seed it with `--session TOKEN=USER_ID`. `web/index.html` is
//! only the page shell; the controller binding is supplied by the embedder.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;

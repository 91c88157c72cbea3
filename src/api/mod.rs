pub mod collections;
pub mod middleware;
pub mod prompts;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use crate::store::Store;

pub use routes::build_router;

/// Shared state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Directory holding the static client build, if one is configured.
    /// When present the router serves it as a fallback.
    pub static_dir: Option<PathBuf>,
}

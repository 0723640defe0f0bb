//! API layer - HTTP entry points.

pub mod error;
pub mod health;
pub mod http;

use std::sync::Arc;

use axum::Router;
use tower_http::{decompression::RequestDecompressionLayer, trace::TraceLayer};

use crate::app::App;

pub use error::ApiError;

/// Full router: collection routes, operational endpoints and middleware.
pub fn router(app: Arc<App>) -> Router {
    http::routes()
        .merge(health::routes())
        .with_state(app)
        .layer(RequestDecompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

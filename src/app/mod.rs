//! 应用层

pub mod product;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::core::middleware::{catch_panic_layer, request_logging_middleware};
use product::handler::AppState;

/// 组装完整路由；panic 兜底层位于最外层
pub fn router(state: AppState) -> Router {
    product::routes()
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(catch_panic_layer())
        .with_state(state)
}

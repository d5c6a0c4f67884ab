//! 产品管理

pub mod handler;
pub mod model;
pub mod repository;

use axum::{routing::get, Router};

use handler::AppState;

pub const BASE_PATH: &str = "/api/products";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(BASE_PATH, get(handler::get_all).post(handler::create))
        .route(
            &format!("{}/:id", BASE_PATH),
            get(handler::get).put(handler::update).delete(handler::delete),
        )
}

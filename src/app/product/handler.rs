//! 产品处理器
//!
//! 每个处理器把存储层的任何错误收敛为该操作固定文案的 500，
//! 错误细节只写日志，不返回给客户端。

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Json},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use validator::Validate;

use super::model::{Product, ProductCreateRequest, ProductResponse, ProductUpdateRequest};
use super::repository::ProductRepository;
use super::BASE_PATH;
use crate::core::error::{ApiError, StoreResultExt};
use crate::core::repository::Repository;
use crate::utils::{html_encode, html_encode_opt};

pub const RETRIEVE_ERROR: &str = "Error retrieving data from the database";
pub const CREATE_ERROR: &str = "Error creating new product record";
pub const UPDATE_ERROR: &str = "Error updating data";
pub const DELETE_ERROR: &str = "Error deleting data";
pub const INVALID_MODEL: &str = "Invalid model object";
pub const ID_MISMATCH: &str = "Product ID mismatch";

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ProductRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }
}

/// 路径中的产品 id；不是整数时路由视为不匹配 (404)
#[derive(Debug, Clone, Copy)]
pub struct ProductId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<i32>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| ProductId(id))
            .map_err(|_| StatusCode::NOT_FOUND)
    }
}

fn invalid_model<E: Display>(err: E) -> ApiError {
    debug!(error = %err, "请求体无效");
    ApiError::BadRequest(INVALID_MODEL)
}

/// 获取所有产品
pub async fn get_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    // 客户端断开时处理器 future 被丢弃，guard 随之取消查询
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let products = state
        .repository
        .get_all(&cancel)
        .await
        .or_internal(RETRIEVE_ERROR)?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// 获取特定产品
pub async fn get(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .repository
        .get(id)
        .await
        .or_internal(RETRIEVE_ERROR)?
        .ok_or(ApiError::NotFound(id))?;

    Ok(Json(product.into()))
}

/// 创建新产品
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ProductCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(invalid_model)?;
    request.validate().map_err(invalid_model)?;

    let product = Product::new(
        html_encode(&request.name),
        html_encode_opt(request.description.as_deref()),
    );

    let created = state
        .repository
        .add(product)
        .await
        .or_internal(CREATE_ERROR)?;

    info!(id = created.id, "产品已创建");

    let location = format!("{}/{}", BASE_PATH, created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ProductResponse::from(created)),
    ))
}

/// 更新产品
pub async fn update(
    State(state): State<AppState>,
    ProductId(id): ProductId,
    payload: Result<Json<ProductUpdateRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload.map_err(invalid_model)?;
    request.validate().map_err(invalid_model)?;

    if request.id.is_some_and(|body_id| body_id != id) {
        return Err(ApiError::BadRequest(ID_MISMATCH));
    }

    let mut product = state
        .repository
        .get(id)
        .await
        .or_internal(UPDATE_ERROR)?
        .ok_or(ApiError::NotFound(id))?;

    product.name = html_encode(&request.name);
    product.description = html_encode_opt(request.description.as_deref());

    state
        .repository
        .update(product)
        .await
        .or_internal(UPDATE_ERROR)?;

    info!(id, "产品已更新");
    Ok(StatusCode::OK)
}

/// 删除产品
pub async fn delete(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> Result<StatusCode, ApiError> {
    if state
        .repository
        .get(id)
        .await
        .or_internal(DELETE_ERROR)?
        .is_none()
    {
        return Err(ApiError::NotFound(id));
    }

    state
        .repository
        .delete(id)
        .await
        .or_internal(DELETE_ERROR)?;

    info!(id, "产品已删除");
    Ok(StatusCode::OK)
}

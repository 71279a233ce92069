//! Product catalog API endpoints

use api_types::product::{
    PriceUpdate, ProductCreated, ProductNew, ProductView, ProductsResponse, StockAdjust,
    StockLevel,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_state(state: engine::BottleState) -> api_types::BottleState {
    match state {
        engine::BottleState::Full => api_types::BottleState::Full,
        engine::BottleState::Empty => api_types::BottleState::Empty,
        engine::BottleState::Comodato => api_types::BottleState::Comodato,
    }
}

pub(crate) fn to_engine_state(state: api_types::BottleState) -> engine::BottleState {
    match state {
        api_types::BottleState::Full => engine::BottleState::Full,
        api_types::BottleState::Empty => engine::BottleState::Empty,
        api_types::BottleState::Comodato => engine::BottleState::Comodato,
    }
}

pub async fn product_new(
    State(state): State<ServerState>,
    Json(payload): Json<ProductNew>,
) -> Result<Json<ProductCreated>, ServerError> {
    let id = state
        .engine
        .new_product(
            &payload.name,
            to_engine_state(payload.state),
            payload.price_minor,
            payload.quantity.unwrap_or(0),
        )
        .await?;

    Ok(Json(ProductCreated { id }))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<ProductsResponse>, ServerError> {
    let products = state
        .engine
        .list_products()
        .await?
        .into_iter()
        .map(|product| ProductView {
            id: product.id,
            name: product.name,
            state: map_state(product.state),
            quantity: product.quantity,
            price_minor: product.price_minor,
        })
        .collect();

    Ok(Json(ProductsResponse { products }))
}

pub async fn update_price(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PriceUpdate>,
) -> Result<StatusCode, ServerError> {
    state.engine.set_product_price(id, payload.price_minor).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn adjust_stock(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdjust>,
) -> Result<Json<StockLevel>, ServerError> {
    let quantity = state.engine.adjust_stock(id, payload.delta).await?;
    Ok(Json(StockLevel { quantity }))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Deliveryman directory API endpoints

use api_types::deliveryman::{
    DeliverymanCreated, DeliverymanNew, DeliverymanView, DeliverymenResponse,
};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

pub async fn deliveryman_new(
    State(state): State<ServerState>,
    Json(payload): Json<DeliverymanNew>,
) -> Result<Json<DeliverymanCreated>, ServerError> {
    let id = state.engine.new_deliveryman(&payload.name).await?;
    Ok(Json(DeliverymanCreated { id }))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<DeliverymenResponse>, ServerError> {
    let deliverymen = state
        .engine
        .list_deliverymen()
        .await?
        .into_iter()
        .map(|deliveryman| DeliverymanView {
            id: deliveryman.id,
            name: deliveryman.name,
        })
        .collect();

    Ok(Json(DeliverymenResponse { deliverymen }))
}

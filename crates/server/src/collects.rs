//! Loan collection API endpoints

use api_types::collect::{CollectCreated, CollectList, CollectNew, CollectView, CollectsResponse};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{FixedOffset, Utc};
use engine::CollectCmd;

use crate::{ServerError, server::ServerState};

pub async fn collect_new(
    State(state): State<ServerState>,
    Json(payload): Json<CollectNew>,
) -> Result<Json<CollectCreated>, ServerError> {
    let cmd = CollectCmd::new(
        payload.customer_id,
        payload.product_id,
        payload.quantity,
        payload.collected_at.with_timezone(&Utc),
    );

    let id = state.engine.collect(cmd).await?;

    Ok(Json(CollectCreated { id }))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(payload): Query<CollectList>,
) -> Result<Json<CollectsResponse>, ServerError> {
    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))?;
    let collects = state
        .engine
        .list_collects(payload.customer_id)
        .await?
        .into_iter()
        .map(|event| CollectView {
            id: event.id,
            customer_id: event.customer_id,
            product_id: event.product_id,
            quantity: event.quantity,
            collected_at: event.collected_at.with_timezone(&utc),
        })
        .collect();

    Ok(Json(CollectsResponse { collects }))
}

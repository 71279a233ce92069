//! Sales API endpoints

use api_types::sale::{
    SaleCreated, SaleItemNew, SaleItemView, SaleKind as ApiKind, SaleList, SaleNew, SaleSettle,
    SaleUpdate, SaleView, SalesResponse, SettledCount,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{FixedOffset, Utc};
use engine::{RegisterSaleCmd, SaleItemInput, UpdateSaleCmd};
use uuid::Uuid;

use crate::{
    ServerError,
    bank_accounts::{map_payment_method, to_engine_payment_method},
    products::{map_state, to_engine_state},
    server::ServerState,
};

fn map_kind(kind: engine::SaleKind) -> ApiKind {
    match kind {
        engine::SaleKind::Full => ApiKind::Full,
        engine::SaleKind::Comodato => ApiKind::Comodato,
    }
}

fn to_engine_items(items: Vec<SaleItemNew>) -> Vec<SaleItemInput> {
    items
        .into_iter()
        .map(|item| {
            SaleItemInput::new(
                item.product,
                to_engine_state(item.state),
                item.quantity,
                item.unit_price_minor,
            )
        })
        .collect()
}

fn map_sale(sale: engine::Sale, utc: &FixedOffset) -> SaleView {
    SaleView {
        id: sale.id,
        customer_id: sale.customer_id,
        deliveryman_id: sale.deliveryman_id,
        payment_method: map_payment_method(sale.payment_method),
        kind: map_kind(sale.kind),
        total_minor: sale.total_minor,
        occurred_at: sale.occurred_at.with_timezone(utc),
        settled_at: sale.settled_at.map(|at| at.with_timezone(utc)),
        items: sale
            .items
            .into_iter()
            .map(|item| SaleItemView {
                product_id: item.product_id,
                state: map_state(item.state),
                quantity: item.quantity,
                unit_price_minor: item.unit_price_minor,
            })
            .collect(),
    }
}

pub async fn sale_new(
    State(state): State<ServerState>,
    Json(payload): Json<SaleNew>,
) -> Result<Json<SaleCreated>, ServerError> {
    let cmd = RegisterSaleCmd::new(
        payload.customer_id,
        payload.deliveryman_id,
        to_engine_payment_method(payload.payment_method),
        payload.occurred_at.with_timezone(&Utc),
    )
    .items(to_engine_items(payload.items));

    let id = state.engine.register_sale(cmd).await?;

    Ok(Json(SaleCreated { id }))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(payload): Query<SaleList>,
) -> Result<Json<SalesResponse>, ServerError> {
    let filter = engine::SaleListFilter {
        customer_id: payload.customer_id,
        deliveryman_id: payload.deliveryman_id,
        kind: payload.kind.map(|kind| match kind {
            ApiKind::Full => engine::SaleKind::Full,
            ApiKind::Comodato => engine::SaleKind::Comodato,
        }),
        from: payload.from.map(|dt| dt.with_timezone(&Utc)),
        to: payload.to.map(|dt| dt.with_timezone(&Utc)),
    };

    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))?;
    let sales = state
        .engine
        .list_sales(&filter)
        .await?
        .into_iter()
        .map(|sale| map_sale(sale, &utc))
        .collect();

    Ok(Json(SalesResponse { sales }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SaleView>, ServerError> {
    let sale = state.engine.sale(id).await?;

    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))?;
    Ok(Json(map_sale(sale, &utc)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaleUpdate>,
) -> Result<StatusCode, ServerError> {
    let mut cmd = UpdateSaleCmd::new(id);
    if let Some(customer_id) = payload.customer_id {
        cmd = cmd.customer_id(customer_id);
    }
    if let Some(deliveryman_id) = payload.deliveryman_id {
        cmd = cmd.deliveryman_id(deliveryman_id);
    }
    if let Some(payment_method) = payload.payment_method {
        cmd = cmd.payment_method(to_engine_payment_method(payment_method));
    }
    if let Some(occurred_at) = payload.occurred_at {
        cmd = cmd.occurred_at(occurred_at.with_timezone(&Utc));
    }
    if let Some(items) = payload.items {
        cmd = cmd.items(to_engine_items(items));
    }

    state.engine.update_sale(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_sale(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn settle(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaleSettle>,
) -> Result<StatusCode, ServerError> {
    state.engine.settle_sale(id, payload.bank_account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Settle every outstanding FIADO sale of a customer in one go.
pub async fn settle_all(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaleSettle>,
) -> Result<Json<SettledCount>, ServerError> {
    let settled = state
        .engine
        .settle_customer_sales(id, payload.bank_account_id)
        .await?;

    Ok(Json(SettledCount { settled }))
}

//! Customer directory API endpoints

use api_types::customer::{
    CustomerCreated, CustomerNew, CustomerRename, CustomerView, CustomersResponse,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_customer(customer: engine::Customer) -> CustomerView {
    CustomerView {
        id: customer.id,
        name: customer.name,
        generic: customer.generic,
        credit_balance_minor: customer.credit_balance_minor,
    }
}

pub async fn customer_new(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerNew>,
) -> Result<Json<CustomerCreated>, ServerError> {
    let id = state
        .engine
        .new_customer(&payload.name, payload.generic.unwrap_or(false))
        .await?;

    Ok(Json(CustomerCreated { id }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerView>, ServerError> {
    let customer = state.engine.customer(id).await?;
    Ok(Json(map_customer(customer)))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<CustomersResponse>, ServerError> {
    let customers = state
        .engine
        .list_customers()
        .await?
        .into_iter()
        .map(map_customer)
        .collect();

    Ok(Json(CustomersResponse { customers }))
}

/// Customers that still owe FIADO money.
pub async fn credit_list(
    State(state): State<ServerState>,
) -> Result<Json<CustomersResponse>, ServerError> {
    let customers = state
        .engine
        .credit_customers()
        .await?
        .into_iter()
        .map(map_customer)
        .collect();

    Ok(Json(CustomersResponse { customers }))
}

pub async fn rename(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerRename>,
) -> Result<StatusCode, ServerError> {
    state.engine.rename_customer(id, &payload.name).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_customer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

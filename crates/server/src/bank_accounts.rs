//! Bank account API endpoints

use api_types::bank_account::{
    BankAccountCreated, BankAccountNew, BankAccountView, BankAccountsResponse,
};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

pub(crate) fn map_payment_method(method: engine::PaymentMethod) -> api_types::PaymentMethod {
    match method {
        engine::PaymentMethod::Dinheiro => api_types::PaymentMethod::Dinheiro,
        engine::PaymentMethod::Pix => api_types::PaymentMethod::Pix,
        engine::PaymentMethod::Cartao => api_types::PaymentMethod::Cartao,
        engine::PaymentMethod::Transferencia => api_types::PaymentMethod::Transferencia,
        engine::PaymentMethod::Fiado => api_types::PaymentMethod::Fiado,
    }
}

pub(crate) fn to_engine_payment_method(method: api_types::PaymentMethod) -> engine::PaymentMethod {
    match method {
        api_types::PaymentMethod::Dinheiro => engine::PaymentMethod::Dinheiro,
        api_types::PaymentMethod::Pix => engine::PaymentMethod::Pix,
        api_types::PaymentMethod::Cartao => engine::PaymentMethod::Cartao,
        api_types::PaymentMethod::Transferencia => engine::PaymentMethod::Transferencia,
        api_types::PaymentMethod::Fiado => engine::PaymentMethod::Fiado,
    }
}

pub async fn bank_account_new(
    State(state): State<ServerState>,
    Json(payload): Json<BankAccountNew>,
) -> Result<Json<BankAccountCreated>, ServerError> {
    let id = state
        .engine
        .new_bank_account(&payload.name, to_engine_payment_method(payload.payment_method))
        .await?;

    Ok(Json(BankAccountCreated { id }))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<BankAccountsResponse>, ServerError> {
    let bank_accounts = state
        .engine
        .list_bank_accounts()
        .await?
        .into_iter()
        .map(|account| BankAccountView {
            id: account.id,
            name: account.name,
            payment_method: map_payment_method(account.payment_method),
        })
        .collect();

    Ok(Json(BankAccountsResponse { bank_accounts }))
}

//! Loan ledger API endpoints

use api_types::loan::{LoanAccountView, LoanLineView};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn get(
    State(state): State<ServerState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<LoanAccountView>, ServerError> {
    let (account, lines) = state.engine.loan_account(customer_id).await?;

    Ok(Json(LoanAccountView {
        customer_id: account.customer_id,
        total_quantity: account.total_quantity,
        lines: lines
            .into_iter()
            .map(|line| LoanLineView {
                product_id: line.product_id,
                quantity: line.quantity,
            })
            .collect(),
    }))
}

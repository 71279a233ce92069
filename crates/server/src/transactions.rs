//! Financial record API endpoints

use api_types::deliveryman::CashBalance;
use api_types::transaction::{
    DepositNew, TransactionCategory as ApiCategory, TransactionCreated,
    TransactionDirection as ApiDirection, TransactionList, TransactionView, TransactionsResponse,
};
use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::Query;
use chrono::{FixedOffset, Utc};
use engine::DepositCmd;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_direction(direction: engine::TransactionDirection) -> ApiDirection {
    match direction {
        engine::TransactionDirection::Entry => ApiDirection::Entry,
        engine::TransactionDirection::Exit => ApiDirection::Exit,
    }
}

fn map_category(category: engine::TransactionCategory) -> ApiCategory {
    match category {
        engine::TransactionCategory::Sale => ApiCategory::Sale,
        engine::TransactionCategory::Deposit => ApiCategory::Deposit,
    }
}

pub async fn deposit_new(
    State(state): State<ServerState>,
    Json(payload): Json<DepositNew>,
) -> Result<Json<TransactionCreated>, ServerError> {
    let cmd = DepositCmd::new(
        payload.deliveryman_id,
        payload.bank_account_id,
        payload.amount_minor,
        payload.occurred_at.with_timezone(&Utc),
    );

    let id = state.engine.register_deposit(cmd).await?;

    Ok(Json(TransactionCreated { id }))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(payload): Query<TransactionList>,
) -> Result<Json<TransactionsResponse>, ServerError> {
    let categories = payload.category.map(|categories| {
        categories
            .into_iter()
            .map(|category| match category {
                ApiCategory::Sale => engine::TransactionCategory::Sale,
                ApiCategory::Deposit => engine::TransactionCategory::Deposit,
            })
            .collect::<Vec<_>>()
    });

    let filter = engine::TransactionListFilter {
        deliveryman_id: payload.deliveryman_id,
        from: payload.from.map(|dt| dt.with_timezone(&Utc)),
        to: payload.to.map(|dt| dt.with_timezone(&Utc)),
        categories,
    };

    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))?;
    let transactions = state
        .engine
        .list_transactions(&filter)
        .await?
        .into_iter()
        .map(|tx| TransactionView {
            id: tx.id,
            direction: map_direction(tx.direction),
            category: map_category(tx.category),
            amount_minor: tx.amount_minor,
            deliveryman_id: tx.deliveryman_id,
            reference_id: tx.reference_id,
            bank_account_id: tx.bank_account_id,
            occurred_at: tx.occurred_at.with_timezone(&utc),
        })
        .collect();

    Ok(Json(TransactionsResponse { transactions }))
}

pub async fn cash_balance(
    State(state): State<ServerState>,
    Path(deliveryman_id): Path<Uuid>,
) -> Result<Json<CashBalance>, ServerError> {
    let balance_minor = state.engine.deliveryman_cash_balance(deliveryman_id).await?;

    Ok(Json(CashBalance {
        deliveryman_id,
        balance_minor,
    }))
}

use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod bank_accounts;
mod collects;
mod customers;
mod deliverymen;
mod loans;
mod products;
mod sales;
mod server;
mod transactions;

pub mod types {
    pub mod product {
        pub use api_types::BottleState;
        pub use api_types::product::{
            PriceUpdate, ProductCreated, ProductNew, ProductView, ProductsResponse, StockAdjust,
            StockLevel,
        };
    }

    pub mod customer {
        pub use api_types::customer::{
            CustomerCreated, CustomerNew, CustomerRename, CustomerView, CustomersResponse,
        };
    }

    pub mod deliveryman {
        pub use api_types::deliveryman::{
            CashBalance, DeliverymanCreated, DeliverymanNew, DeliverymanView, DeliverymenResponse,
        };
    }

    pub mod bank_account {
        pub use api_types::PaymentMethod;
        pub use api_types::bank_account::{
            BankAccountCreated, BankAccountNew, BankAccountView, BankAccountsResponse,
        };
    }

    pub mod sale {
        pub use api_types::sale::{
            SaleCreated, SaleItemNew, SaleItemView, SaleKind, SaleList, SaleNew, SaleSettle,
            SaleUpdate, SaleView, SalesResponse, SettledCount,
        };
    }

    pub mod collect {
        pub use api_types::collect::{
            CollectCreated, CollectList, CollectNew, CollectView, CollectsResponse,
        };
    }

    pub mod loan {
        pub use api_types::loan::{LoanAccountView, LoanLineView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            DepositNew, TransactionCategory, TransactionCreated, TransactionDirection,
            TransactionList, TransactionView, TransactionsResponse,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

//TODO: Find a better solution
#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingEntry(_)
        | EngineError::InsufficientStock(_)
        | EngineError::InsufficientLoanBalance(_) => StatusCode::CONFLICT,
        EngineError::InvalidComodatoCustomer(_)
        | EngineError::NoBankAccountConfigured(_)
        | EngineError::InvalidQuantity(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidId(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::InconsistentState(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

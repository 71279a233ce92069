//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InsufficientStock`] thrown when an adjustment would drive a stock
//!   counter negative.
//! - [`NotFound`] thrown when an item are not found.
//!
//!  [`InsufficientStock`]: EngineError::InsufficientStock
//!  [`NotFound`]: EngineError::NotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found!")]
    NotFound(String),
    #[error("{0} already present!")]
    ExistingEntry(String),
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("Insufficient loan balance: {0}")]
    InsufficientLoanBalance(String),
    #[error("Comodato sales require a named customer: {0}")]
    InvalidComodatoCustomer(String),
    #[error("No bank account configured for {0}")]
    NoBankAccountConfigured(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Inconsistent state: {0}")]
    InconsistentState(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::ExistingEntry(a), Self::ExistingEntry(b)) => a == b,
            (Self::InsufficientStock(a), Self::InsufficientStock(b)) => a == b,
            (Self::InsufficientLoanBalance(a), Self::InsufficientLoanBalance(b)) => a == b,
            (Self::InvalidComodatoCustomer(a), Self::InvalidComodatoCustomer(b)) => a == b,
            (Self::NoBankAccountConfigured(a), Self::NoBankAccountConfigured(b)) => a == b,
            (Self::InvalidQuantity(a), Self::InvalidQuantity(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::InconsistentState(a), Self::InconsistentState(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

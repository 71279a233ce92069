pub use bank_accounts::BankAccount;
pub use collects::CollectEvent;
pub use commands::{CollectCmd, DepositCmd, RegisterSaleCmd, SaleItemInput, UpdateSaleCmd};
pub use customers::Customer;
pub use deliverymen::Deliveryman;
pub use error::EngineError;
pub use loan_accounts::LoanAccount;
pub use loan_lines::LoanLine;
pub use ops::{Engine, EngineBuilder, SaleListFilter, TransactionListFilter};
pub use payment::PaymentMethod;
pub use products::{BottleState, Product};
pub use sale_items::SaleItem;
pub use sales::{Sale, SaleKind};
pub use transactions::{Transaction, TransactionCategory, TransactionDirection};

mod bank_accounts;
mod collects;
mod commands;
mod customers;
mod deliverymen;
mod error;
mod loan_accounts;
mod loan_lines;
mod ops;
mod payment;
mod products;
mod sale_items;
mod sales;
mod transactions;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

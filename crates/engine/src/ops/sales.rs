//! Sale lifecycle: registration, edit, deletion and the read surface.
//!
//! Each write runs stock, loan ledger, financial record and credit balance
//! mutations as one transaction. The edit path reconciles against the
//! stored line items instead of trusting the caller's view of them.

mod delete;
mod helpers;
mod query;
mod register;
mod update;

pub use query::SaleListFilter;

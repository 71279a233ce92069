pub use sea_orm_migration::prelude::*;

mod m20260312_090000_deliverymen;
mod m20260312_091500_customers;
mod m20260312_093000_products;
mod m20260312_094500_bank_accounts;
mod m20260313_100000_sales;
mod m20260313_101500_transactions;
mod m20260314_090000_loans;
mod m20260314_091500_collect_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260312_090000_deliverymen::Migration),
            Box::new(m20260312_091500_customers::Migration),
            Box::new(m20260312_093000_products::Migration),
            Box::new(m20260312_094500_bank_accounts::Migration),
            Box::new(m20260313_100000_sales::Migration),
            Box::new(m20260313_101500_transactions::Migration),
            Box::new(m20260314_090000_loans::Migration),
            Box::new(m20260314_091500_collect_events::Migration),
        ]
    }
}

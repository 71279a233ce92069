use sea_orm_migration::prelude::*;

use crate::m20260312_091500_customers::Customers;
use crate::m20260312_093000_products::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum LoanAccounts {
    Table,
    Id,
    CustomerId,
    TotalQuantity,
}

#[derive(Iden)]
enum LoanLines {
    Table,
    Id,
    AccountId,
    ProductId,
    Quantity,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoanAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoanAccounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LoanAccounts::CustomerId).string().not_null())
                    .col(
                        ColumnDef::new(LoanAccounts::TotalQuantity)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-loan_accounts-customer_id")
                            .from(LoanAccounts::Table, LoanAccounts::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-loan_accounts-customer_id-unique")
                    .table(LoanAccounts::Table)
                    .col(LoanAccounts::CustomerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LoanLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoanLines::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LoanLines::AccountId).string().not_null())
                    .col(ColumnDef::new(LoanLines::ProductId).string().not_null())
                    .col(
                        ColumnDef::new(LoanLines::Quantity)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-loan_lines-account_id")
                            .from(LoanLines::Table, LoanLines::AccountId)
                            .to(LoanAccounts::Table, LoanAccounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-loan_lines-product_id")
                            .from(LoanLines::Table, LoanLines::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-loan_lines-account_id-product_id-unique")
                    .table(LoanLines::Table)
                    .col(LoanLines::AccountId)
                    .col(LoanLines::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoanLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LoanAccounts::Table).to_owned())
            .await?;
        Ok(())
    }
}

use sea_orm_migration::prelude::*;

use crate::m20260312_090000_deliverymen::Deliverymen;
use crate::m20260312_094500_bank_accounts::BankAccounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    Direction,
    Category,
    AmountMinor,
    DeliverymanId,
    ReferenceId,
    BankAccountId,
    OccurredAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::Direction).string().not_null())
                    .col(ColumnDef::new(Transactions::Category).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::DeliverymanId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::ReferenceId).string())
                    .col(ColumnDef::new(Transactions::BankAccountId).string())
                    .col(
                        ColumnDef::new(Transactions::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-deliveryman_id")
                            .from(Transactions::Table, Transactions::DeliverymanId)
                            .to(Deliverymen::Table, Deliverymen::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-bank_account_id")
                            .from(Transactions::Table, Transactions::BankAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-deliveryman_id-occurred_at")
                    .table(Transactions::Table)
                    .col(Transactions::DeliverymanId)
                    .col(Transactions::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-reference_id")
                    .table(Transactions::Table)
                    .col(Transactions::ReferenceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        Ok(())
    }
}

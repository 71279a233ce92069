use sea_orm_migration::prelude::*;

use crate::m20260312_091500_customers::Customers;
use crate::m20260312_093000_products::Products;
use crate::m20260312_090000_deliverymen::Deliverymen;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Sales {
    Table,
    Id,
    CustomerId,
    DeliverymanId,
    PaymentMethod,
    Kind,
    TotalMinor,
    TransactionId,
    OccurredAt,
    SettledAt,
}

#[derive(Iden)]
enum SaleItems {
    Table,
    Id,
    SaleId,
    ProductId,
    State,
    Quantity,
    UnitPriceMinor,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sales::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Sales::CustomerId).string().not_null())
                    .col(ColumnDef::new(Sales::DeliverymanId).string().not_null())
                    .col(ColumnDef::new(Sales::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Sales::Kind).string().not_null())
                    .col(ColumnDef::new(Sales::TotalMinor).big_integer().not_null())
                    .col(ColumnDef::new(Sales::TransactionId).string())
                    .col(ColumnDef::new(Sales::OccurredAt).timestamp().not_null())
                    .col(ColumnDef::new(Sales::SettledAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sales-customer_id")
                            .from(Sales::Table, Sales::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sales-deliveryman_id")
                            .from(Sales::Table, Sales::DeliverymanId)
                            .to(Deliverymen::Table, Deliverymen::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sales-customer_id-occurred_at")
                    .table(Sales::Table)
                    .col(Sales::CustomerId)
                    .col(Sales::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sales-deliveryman_id-occurred_at")
                    .table(Sales::Table)
                    .col(Sales::DeliverymanId)
                    .col(Sales::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SaleItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SaleItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SaleItems::SaleId).string().not_null())
                    .col(ColumnDef::new(SaleItems::ProductId).string().not_null())
                    .col(ColumnDef::new(SaleItems::State).string().not_null())
                    .col(ColumnDef::new(SaleItems::Quantity).big_integer().not_null())
                    .col(
                        ColumnDef::new(SaleItems::UnitPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sale_items-sale_id")
                            .from(SaleItems::Table, SaleItems::SaleId)
                            .to(Sales::Table, Sales::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sale_items-product_id")
                            .from(SaleItems::Table, SaleItems::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sale_items-sale_id")
                    .table(SaleItems::Table)
                    .col(SaleItems::SaleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sale_items-product_id")
                    .table(SaleItems::Table)
                    .col(SaleItems::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SaleItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;
        Ok(())
    }
}

use sea_orm_migration::prelude::*;

use crate::m20260312_091500_customers::Customers;
use crate::m20260312_093000_products::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum CollectEvents {
    Table,
    Id,
    CustomerId,
    ProductId,
    Quantity,
    CollectedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CollectEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CollectEvents::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CollectEvents::CustomerId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CollectEvents::ProductId).string().not_null())
                    .col(
                        ColumnDef::new(CollectEvents::Quantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CollectEvents::CollectedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-collect_events-customer_id")
                            .from(CollectEvents::Table, CollectEvents::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-collect_events-product_id")
                            .from(CollectEvents::Table, CollectEvents::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-collect_events-customer_id-collected_at")
                    .table(CollectEvents::Table)
                    .col(CollectEvents::CustomerId)
                    .col(CollectEvents::CollectedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CollectEvents::Table).to_owned())
            .await?;
        Ok(())
    }
}

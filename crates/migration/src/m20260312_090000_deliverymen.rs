use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Deliverymen {
    Table,
    Id,
    Name,
    NameNorm,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Deliverymen::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Deliverymen::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Deliverymen::Name).string().not_null())
                    .col(ColumnDef::new(Deliverymen::NameNorm).string().not_null())
                    .col(
                        ColumnDef::new(Deliverymen::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-deliverymen-name_norm-unique")
                    .table(Deliverymen::Table)
                    .col(Deliverymen::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Deliverymen::Table).to_owned())
            .await?;
        Ok(())
    }
}

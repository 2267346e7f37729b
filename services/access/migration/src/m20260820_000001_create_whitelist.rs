use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Whitelist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Whitelist::RequesterId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Whitelist::Name).string().not_null())
                    .col(ColumnDef::new(Whitelist::Role).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Whitelist::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Whitelist {
    Table,
    RequesterId,
    Name,
    Role,
}

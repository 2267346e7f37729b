use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tokens::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tokens::Code).string().not_null())
                    .col(ColumnDef::new(Tokens::TechnicianName).string().not_null())
                    .col(ColumnDef::new(Tokens::SiteId).string().not_null())
                    .col(ColumnDef::new(Tokens::Purpose).string().not_null())
                    .col(ColumnDef::new(Tokens::RequesterId).string().not_null())
                    .col(ColumnDef::new(Tokens::Status).string().not_null())
                    .col(ColumnDef::new(Tokens::IssuedAt).string().not_null())
                    .col(ColumnDef::new(Tokens::ExpiresAt).string().not_null())
                    .col(ColumnDef::new(Tokens::UsedAt).string())
                    .to_owned(),
            )
            .await?;

        // Redemption looks rows up by (code, site); no uniqueness constraint
        // because expired and used code values are reissuable.
        manager
            .create_index(
                Index::create()
                    .table(Tokens::Table)
                    .col(Tokens::Code)
                    .col(Tokens::SiteId)
                    .name("idx_tokens_code_site_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tokens::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tokens {
    Table,
    Id,
    Code,
    TechnicianName,
    SiteId,
    Purpose,
    RequesterId,
    Status,
    IssuedAt,
    ExpiresAt,
    UsedAt,
}

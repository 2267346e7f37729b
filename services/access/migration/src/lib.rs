use sea_orm_migration::prelude::*;

mod m20260820_000001_create_whitelist;
mod m20260820_000002_create_tokens;
mod m20260820_000003_create_audit_log;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260820_000001_create_whitelist::Migration),
            Box::new(m20260820_000002_create_tokens::Migration),
            Box::new(m20260820_000003_create_audit_log::Migration),
        ]
    }
}

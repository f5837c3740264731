pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20250901_000001_users_table;
mod m20250901_000002_links_table;
mod m20250901_000003_logs_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_users_table::Migration),
            Box::new(m20250901_000002_links_table::Migration),
            Box::new(m20250901_000003_logs_table::Migration),
        ]
    }
}

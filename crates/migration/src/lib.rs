//! Migrator for the subscriptions schema.
//! Indexes are applied after the table they cover.
pub use sea_orm_migration::prelude::*;

mod m20250801_000001_create_records;
mod m20250801_000002_add_record_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_records::Migration),
            // Indexes should always be applied last
            Box::new(m20250801_000002_add_record_indexes::Migration),
        ]
    }
}

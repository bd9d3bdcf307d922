pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_portal_tables;
mod m20250915_000002_add_volunteer_password;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_portal_tables::Migration),
            Box::new(m20250915_000002_add_volunteer_password::Migration),
        ]
    }
}

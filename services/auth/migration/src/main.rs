use sea_orm_migration::prelude::*;

mod m20260815_000001_create_players;
mod m20260815_000002_create_admins;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260815_000001_create_players::Migration),
            Box::new(m20260815_000002_create_admins::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}

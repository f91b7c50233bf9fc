//! Migrate command - Schema management for the marketplace tables.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::MarketplaceConfig;
use crate::infra::Database;
use common::{AppError, AppResult};

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: MarketplaceConfig) -> AppResult<()> {
    // Manual control: nothing is applied implicitly on connect
    let db = Database::connect_without_migrations(&config.database)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            tracing::info!("Marketplace schema is up to date");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            tracing::info!("Rolled back the latest migration");
        }
        MigrateAction::Status => {
            let migrations = db.migration_status().await?;
            let pending = migrations.iter().filter(|(_, applied)| !applied).count();
            for (name, applied) in &migrations {
                println!("{:<50} {}", name, if *applied { "applied" } else { "pending" });
            }
            println!("{} of {} migrations pending", pending, migrations.len());
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping every marketplace table before re-applying migrations");
            db.fresh_migrations().await?;
            tracing::info!("Fresh schema created");
        }
    }

    Ok(())
}

//! Reconcile command - Repairs category service indexes.

use crate::config::MarketplaceConfig;
use crate::infra::Database;
use crate::service::{ServiceContainer, Services};
use common::AppResult;

/// Execute the reconcile command
pub async fn execute(config: MarketplaceConfig) -> AppResult<()> {
    let db = Database::connect(&config.database).await?;
    let services = Services::from_connection(db.get_connection(), &config);

    let report = services.categories().reconcile_index().await?;
    println!(
        "checked {} categories: {} refs added, {} refs removed",
        report.categories_checked, report.refs_added, report.refs_removed
    );

    Ok(())
}

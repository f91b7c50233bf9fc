//! Category index maintenance after service writes.
//!
//! A service write and the matching category index update are two separate
//! statements. `CategoryIndexSync` runs the second step explicitly, retrying
//! transient storage failures with a linear backoff. A step that still fails
//! is logged and dropped: the service write has already committed and
//! `reconcile_index` repairs the index later.

use std::sync::Arc;

use uuid::Uuid;

use super::CategoryService;
use crate::config::IndexSyncConfig;
use common::{AppError, AppResult};

#[derive(Debug, Clone, Copy)]
enum IndexOp {
    Add,
    Remove,
}

impl IndexOp {
    fn as_str(&self) -> &'static str {
        match self {
            IndexOp::Add => "add",
            IndexOp::Remove => "remove",
        }
    }
}

/// Runs category index updates on behalf of the service lifecycle.
pub struct CategoryIndexSync {
    categories: Arc<dyn CategoryService>,
    policy: IndexSyncConfig,
}

impl CategoryIndexSync {
    pub fn new(categories: Arc<dyn CategoryService>, policy: IndexSyncConfig) -> Self {
        Self { categories, policy }
    }

    /// Record a new service in its category. Returns whether the index was updated.
    pub async fn service_created(&self, category_id: Uuid, service_id: Uuid) -> bool {
        self.apply(IndexOp::Add, category_id, service_id).await
    }

    /// Drop a deleted service from its category.
    pub async fn service_deleted(&self, category_id: Uuid, service_id: Uuid) -> bool {
        self.apply(IndexOp::Remove, category_id, service_id).await
    }

    /// Move a service between category indexes.
    pub async fn service_moved(&self, from: Uuid, to: Uuid, service_id: Uuid) -> bool {
        let removed = self.apply(IndexOp::Remove, from, service_id).await;
        let added = self.apply(IndexOp::Add, to, service_id).await;
        removed && added
    }

    async fn apply(&self, op: IndexOp, category_id: Uuid, service_id: Uuid) -> bool {
        let attempts = self.policy.attempts.max(1);

        for attempt in 1..=attempts {
            match self.run(op, category_id, service_id).await {
                Ok(changed) => {
                    tracing::debug!(
                        op = op.as_str(),
                        %category_id,
                        %service_id,
                        changed,
                        "Category index updated"
                    );
                    return true;
                }
                Err(e) if is_transient(&e) && attempt < attempts => {
                    tracing::warn!(
                        op = op.as_str(),
                        %category_id,
                        %service_id,
                        attempt,
                        error = %e,
                        "Category index update failed, retrying"
                    );
                    tokio::time::sleep(self.policy.backoff(attempt)).await;
                }
                Err(e) => {
                    tracing::error!(
                        op = op.as_str(),
                        %category_id,
                        %service_id,
                        attempt,
                        error = %e,
                        "Category index update abandoned; run reconcile to repair"
                    );
                    return false;
                }
            }
        }

        false
    }

    async fn run(&self, op: IndexOp, category_id: Uuid, service_id: Uuid) -> AppResult<bool> {
        match op {
            IndexOp::Add => {
                self.categories
                    .increment_service_count(category_id, service_id)
                    .await
            }
            IndexOp::Remove => {
                self.categories
                    .decrement_service_count(category_id, service_id)
                    .await
            }
        }
    }
}

fn is_transient(err: &AppError) -> bool {
    matches!(err, AppError::Database(_) | AppError::ServiceUnavailable(_))
}

use std::future::Future;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::{ApiError, UserApi};
use crate::cache::CacheKey;
use crate::layer::DataLayer;
use crate::models::{UpdateUserRequest, UserStatus};

/// Outcome of one batch run. Failures never abort the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub success_count: usize,
    pub failed_count: usize,
    /// `"User <id>: <error>"` in processing order
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchStatus {
    pub loading: bool,
    /// Percentage of ids processed, 0 to 100
    pub progress: f64,
    pub results: BatchResult,
}

/// Sequential bulk mutations with progress reporting.
pub struct BatchOperations<A> {
    layer: DataLayer<A>,
    status: watch::Sender<BatchStatus>,
}

impl<A: UserApi> BatchOperations<A> {
    pub(crate) fn new(layer: DataLayer<A>) -> Self {
        let (status, _rx) = watch::channel(BatchStatus::default());
        Self { layer, status }
    }

    pub fn status(&self) -> BatchStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BatchStatus> {
        self.status.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.status.borrow().loading
    }

    pub fn progress(&self) -> f64 {
        self.status.borrow().progress
    }

    pub async fn batch_delete_users(&self, ids: &[i64]) -> BatchResult {
        let api: &A = &self.layer.api;
        self.run("delete", ids, move |id| async move { api.delete_user(id).await.map(|_| ()) })
            .await
    }

    pub async fn batch_update_user_status(&self, ids: &[i64], status: UserStatus) -> BatchResult {
        let api: &A = &self.layer.api;
        self.run("update status", ids, move |id| async move {
            api.update_user(&UpdateUserRequest::status_only(id, status))
                .await
                .map(|_| ())
        })
        .await
    }

    async fn run<F, Fut>(&self, action: &str, ids: &[i64], mut mutate: F) -> BatchResult
    where
        F: FnMut(i64) -> Fut,
        Fut: Future<Output = Result<(), ApiError>>,
    {
        info!(action, count = ids.len(), "Starting batch operation");
        self.status.send_replace(BatchStatus {
            loading: true,
            ..Default::default()
        });

        let total = ids.len();
        for (i, &id) in ids.iter().enumerate() {
            let outcome = mutate(id).await;
            self.status.send_modify(|status| {
                match outcome {
                    Ok(()) => status.results.success_count += 1,
                    Err(e) => {
                        warn!(action, id, error = %e, "Batch item failed");
                        status.results.failed_count += 1;
                        status.results.errors.push(format!("User {}: {}", id, e));
                    }
                }
                status.progress = (i + 1) as f64 / total as f64 * 100.0;
            });

            tokio::time::sleep(self.layer.settings.batch_delay).await;
        }

        self.status.send_modify(|status| status.loading = false);

        self.layer.cache.invalidate(
            [CacheKey::Users, CacheKey::UserStats]
                .into_iter()
                .chain(ids.iter().map(|&id| CacheKey::User(id))),
        );

        let results = self.status.borrow().results.clone();
        info!(
            action,
            succeeded = results.success_count,
            failed = results.failed_count,
            "Batch operation finished"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::resources::mock::{sample_user, MockApi};
    use std::time::Duration;
    use tokio::time::Instant;

    fn layer() -> DataLayer<MockApi> {
        DataLayer::new(MockApi::with_users((1..=3).map(sample_user).collect()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_failure_completes_every_item() {
        let layer = layer();
        layer.api().fail_id(2);
        let batch = layer.batch();

        let result = batch.batch_delete_users(&[1, 2, 3]).await;

        assert_eq!(result.success_count, 2);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("User 2: "));
        assert_eq!(batch.progress(), 100.0);
        assert!(!batch.is_loading());
        assert_eq!(batch.status().results, result);
        assert_eq!(layer.api().calls("delete_user"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_items_run_sequentially_with_delay() {
        let layer = layer();
        let batch = layer.batch();
        let start = Instant::now();

        batch.batch_delete_users(&[1, 2, 3]).await;

        assert_eq!(start.elapsed(), Duration::from_millis(300));
        assert_eq!(
            layer.api().call_log(),
            vec!["delete_user:1", "delete_user:2", "delete_user:3"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_reported_per_item() {
        let layer = layer();
        let batch = layer.batch();
        let mut rx = batch.subscribe();

        let run = batch.batch_update_user_status(&[1, 2, 3, 4], UserStatus::Inactive);
        let watcher = async {
            let mut seen = Vec::new();
            while rx.changed().await.is_ok() {
                let status = rx.borrow_and_update().clone();
                if !seen.contains(&status.progress) {
                    seen.push(status.progress);
                }
                if !status.loading && status.progress == 100.0 {
                    break;
                }
            }
            seen
        };

        let (result, seen) = tokio::join!(run, watcher);

        assert_eq!(seen, vec![25.0, 50.0, 75.0, 100.0]);
        // Id 4 does not exist
        assert_eq!(result.success_count, 3);
        assert_eq!(result.failed_count, 1);
        assert_eq!(layer.api().user(1).map(|u| u.status), Some(UserStatus::Inactive));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidates_list_stats_and_touched_users() {
        let layer = layer();
        let cache = layer.cache();
        cache.set("users", &Vec::<User>::new(), None);
        cache.set("user-stats", &0, None);
        cache.set("user-1", &sample_user(1), None);
        cache.set("user-3", &sample_user(3), None);

        layer.batch().batch_delete_users(&[1, 2]).await;

        assert!(!cache.has("users"));
        assert!(!cache.has("user-stats"));
        assert!(!cache.has("user-1"));
        assert!(cache.has("user-3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch() {
        let layer = layer();
        let batch = layer.batch();

        let result = batch.batch_delete_users(&[]).await;

        assert_eq!(result, BatchResult::default());
        assert_eq!(batch.progress(), 0.0);
        assert!(!batch.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_run_resets_results() {
        let layer = layer();
        layer.api().fail_id(1);
        let batch = layer.batch();

        batch.batch_delete_users(&[1]).await;
        let second = batch.batch_delete_users(&[2]).await;

        assert_eq!(second.success_count, 1);
        assert_eq!(second.failed_count, 0);
        assert!(second.errors.is_empty());
    }
}

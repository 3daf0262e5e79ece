// Health runner - bounded-concurrency execution over the target list

use crate::probe::{HealthCheck, TargetHealthChecker};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::info;

/// Runs per-target checks concurrently while preserving input order in
/// the collected results.
pub struct HealthRunner {
    checker: Arc<TargetHealthChecker>,
    max_concurrent: usize,
}

impl HealthRunner {
    pub fn new(checker: TargetHealthChecker, max_concurrent: usize) -> Self {
        Self {
            checker: Arc::new(checker),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Check every target. Each target's `HealthCheck` is owned by the
    /// task running its loop; results are re-sorted into input order
    /// before they are returned.
    pub async fn run(&self, targets: &[String]) -> Vec<HealthCheck> {
        info!(
            "checking {} target(s), up to {} concurrently",
            targets.len(),
            self.max_concurrent
        );

        let mut indexed: Vec<(usize, HealthCheck)> =
            stream::iter(targets.iter().cloned().enumerate())
                .map(|(index, target)| {
                    let checker = Arc::clone(&self.checker);
                    async move { (index, checker.check(&target).await) }
                })
                .buffer_unordered(self.max_concurrent)
                .collect()
                .await;

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, check)| check).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_empty_target_list() {
        let checker =
            TargetHealthChecker::new(1, Duration::from_secs(1), Duration::from_millis(100))
                .unwrap();
        let runner = HealthRunner::new(checker, 4);
        let checks = runner.run(&[]).await;
        assert!(checks.is_empty());
    }
}

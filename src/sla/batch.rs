//! Independent mutations issued together.
//!
//! Every task in a batch must commute with the others (removing label A does
//! not affect removing label B). All tasks run to completion even when some
//! fail; failures are collected per key.

use std::fmt::Debug;
use std::future::Future;

use futures::future::join_all;

pub struct BatchReport<K> {
    pub succeeded: Vec<K>,
    pub failed: Vec<(K, anyhow::Error)>,
}

impl<K: Debug> BatchReport<K> {
    /// Succeeded keys, or an error naming every failed key.
    pub fn into_result(self, action: &str) -> anyhow::Result<Vec<K>> {
        let mut failed = self.failed.into_iter();
        let Some((key, first)) = failed.next() else {
            return Ok(self.succeeded);
        };
        let others: Vec<String> = failed.map(|(k, e)| format!("{k:?}: {e:#}")).collect();
        if others.is_empty() {
            Err(first.context(format!("Failed to {action} {key:?}")))
        } else {
            Err(first.context(format!(
                "Failed to {action} {key:?} (also failed: {})",
                others.join("; ")
            )))
        }
    }
}

pub async fn run_batch<K, F, Fut>(keys: impl IntoIterator<Item = K>, task: F) -> BatchReport<K>
where
    K: Clone,
    F: Fn(K) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let task = &task;
    let results = join_all(keys.into_iter().map(|key| async move {
        let result = task(key.clone()).await;
        (key, result)
    }))
    .await;

    let mut report = BatchReport {
        succeeded: Vec::new(),
        failed: Vec::new(),
    };
    for (key, result) in results {
        match result {
            Ok(()) => report.succeeded.push(key),
            Err(e) => report.failed.push((key, e)),
        }
    }
    report
}

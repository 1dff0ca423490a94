//! Bounded-concurrency worker abstraction: a semaphore of configurable
//! width gates how many game-ingestion tasks run at once, spawned onto
//! the tokio runtime individually rather than processed one at a time.

use std::future::Future;
use std::sync::Arc;

use log::error;
use tokio::sync::Semaphore;

/// Runs `task` over every item in `items` with at most `concurrency`
/// tasks in flight at once. A panicking task is logged and its slot
/// contributes no result, rather than poisoning the whole batch.
pub async fn run_bounded<T, F, Fut, R>(items: Vec<T>, concurrency: usize, task: F) -> Vec<(T, R)>
where
    T: Clone + Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let task = Arc::new(task);
    let mut handles = Vec::with_capacity(items.len());

    for item in items {
        let semaphore = semaphore.clone();
        let task = task.clone();
        let item_for_result = item.clone();
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("worker semaphore is never closed");
            let result = task(item).await;
            (item_for_result, result)
        }));
    }

    let mut out = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(pair) => out.push(pair),
            Err(join_err) => error!("worker task panicked: {join_err}"),
        }
    }
    out
}

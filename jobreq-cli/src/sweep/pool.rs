//! Bounded worker pool
//!
//! Runs one task per input item with at most `concurrency` in flight. Each
//! result lands in the slot of its input index, so the output order matches
//! the input order whatever order the tasks finish in.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;

use super::cancel::CancelSignal;

/// Run `work` over `items`
///
/// A slot is `None` when its task never produced a result: the run was
/// cancelled before or while it ran, or the task panicked.
pub async fn run_bounded<T, R, F, Fut>(
    items: Vec<T>,
    concurrency: usize,
    cancel: &CancelSignal,
    work: F,
) -> Vec<Option<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let work = Arc::new(work);
    let mut slots: Vec<Option<R>> = (0..items.len()).map(|_| None).collect();
    let mut join_set = JoinSet::new();

    for (idx, item) in items.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let work = Arc::clone(&work);
        let cancel = cancel.clone();

        join_set.spawn(async move {
            let _permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => return (idx, None),
                permit = semaphore.acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => return (idx, None),
                },
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => (idx, None),
                result = work(item) => (idx, Some(result)),
            }
        });
    }

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((idx, result)) => slots[idx] = result,
            Err(e) => error!("Worker task failed: {}", e),
        }
    }

    slots
}

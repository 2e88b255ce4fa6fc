//! Short-lived bounded worker pools for fan-out steps.

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{SyncError, SyncResult};

/// Default number of concurrent workers per batch.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Build a pool of `concurrency` workers (minimum 1) named after `label`.
///
/// The pool is dropped by the caller once its batch has joined.
pub(crate) fn worker_pool(label: &'static str, concurrency: usize) -> SyncResult<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(concurrency.max(1))
        .thread_name(move |i| format!("{}-{}", label, i))
        .build()
        .map_err(|e| SyncError::Config(format!("failed to start {} workers: {}", label, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_has_requested_size() {
        let pool = worker_pool("test", 3).unwrap();
        assert_eq!(pool.current_num_threads(), 3);
    }

    #[test]
    fn test_zero_concurrency_still_has_a_worker() {
        let pool = worker_pool("test", 0).unwrap();
        assert_eq!(pool.current_num_threads(), 1);
    }
}

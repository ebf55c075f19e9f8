//! The dataset-scale worker pool.
//!
//! Work items are embarrassingly parallel: one scenario directory per
//! item, no shared mutable state. Items are fed to a fixed number of
//! worker threads over a crossbeam channel; each result returns tagged
//! with its item index so collection order never depends on scheduling.
//! A panicking worker poisons only its own item, which comes back as
//! [`PipelineError::WorkerPanicked`]; sibling items are unaffected.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crossbeam_channel::unbounded;

use crate::error::PipelineError;

/// Resolve the worker count, applying auto-detection for `None`.
///
/// Explicit values are clamped to `[1, 64]`; auto-detection uses half
/// the available parallelism, clamped to `[2, 16]`.
pub fn resolved_worker_count(requested: Option<usize>) -> usize {
    match requested {
        Some(n) => n.clamp(1, 64),
        None => {
            let cpus = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4);
            (cpus / 2).clamp(2, 16)
        }
    }
}

/// Run `job` over every item on `workers` threads.
///
/// Results come back in item order regardless of which worker finished
/// first. Each item either succeeds, fails with its own error, or
/// reports the worker's panic; no failure aborts the batch.
pub fn run_parallel<T, R, F>(items: Vec<T>, workers: usize, job: F) -> Vec<Result<R, PipelineError>>
where
    T: Send,
    R: Send,
    F: Fn(T) -> Result<R, PipelineError> + Sync,
{
    let count = items.len();
    if count == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, count);

    let (task_tx, task_rx) = unbounded::<(usize, T)>();
    let (result_tx, result_rx) = unbounded::<(usize, Result<R, PipelineError>)>();
    for pair in items.into_iter().enumerate() {
        task_tx.send(pair).expect("task channel open");
    }
    drop(task_tx);

    let job = &job;
    std::thread::scope(|scope| {
        for _ in 0..workers {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                while let Ok((index, item)) = task_rx.recv() {
                    let result = match catch_unwind(AssertUnwindSafe(|| job(item))) {
                        Ok(result) => result,
                        Err(payload) => {
                            let detail = payload
                                .downcast_ref::<&str>()
                                .map(|s| s.to_string())
                                .or_else(|| payload.downcast_ref::<String>().cloned())
                                .unwrap_or_else(|| "unknown panic".to_string());
                            Err(PipelineError::WorkerPanicked { detail })
                        }
                    };
                    if result_tx.send((index, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);
    });

    let mut slots: Vec<Option<Result<R, PipelineError>>> =
        (0..count).map(|_| None).collect();
    while let Ok((index, result)) = result_rx.recv() {
        slots[index] = Some(result);
    }
    slots
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| {
                Err(PipelineError::WorkerPanicked {
                    detail: "worker exited without reporting a result".to_string(),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_come_back_in_item_order() {
        let items: Vec<u64> = (0..32).collect();
        let results = run_parallel(items, 4, |n| {
            // Larger items finish later; order must still hold.
            std::thread::sleep(std::time::Duration::from_micros(200 - n * 5));
            Ok(n * 2)
        });
        let values: Vec<u64> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(values, (0..32).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[test]
    fn a_panicking_item_does_not_poison_siblings() {
        let items: Vec<u32> = (0..8).collect();
        let results = run_parallel(items, 3, |n| {
            if n == 3 {
                panic!("item 3 exploded");
            }
            Ok(n)
        });
        for (i, result) in results.iter().enumerate() {
            if i == 3 {
                match result {
                    Err(PipelineError::WorkerPanicked { detail }) => {
                        assert!(detail.contains("exploded"));
                    }
                    other => panic!("expected WorkerPanicked, got {other:?}"),
                }
            } else {
                assert_eq!(*result.as_ref().unwrap(), i as u32);
            }
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let results = run_parallel(Vec::<u32>::new(), 4, |n| Ok(n));
        assert!(results.is_empty());
    }

    #[test]
    fn worker_count_clamps() {
        assert_eq!(resolved_worker_count(Some(0)), 1);
        assert_eq!(resolved_worker_count(Some(500)), 64);
        let auto = resolved_worker_count(None);
        assert!((2..=16).contains(&auto));
    }
}

//! Worker pool dispatcher
//!
//! Executes boxed callables on a fixed set of worker threads. Workers
//! block on a condition variable while the queue is empty; shutdown
//! drains pending work, then joins every worker.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use tracing::info;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// State shared between the pool handle and its workers
struct PoolShared {
    queue: Mutex<VecDeque<Job>>,
    available: Condvar,
    stop: AtomicBool,
}

/// Fixed-size worker pool
///
/// Parallelism is bounded by the worker count; correctness must not rely
/// on ordering across jobs handed to different workers.
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Create a pool with `num_threads` workers (at least one)
    ///
    /// Pass 0 to size the pool to the hardware concurrency.
    pub fn new(num_threads: usize) -> Self {
        let num_threads = if num_threads == 0 {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        } else {
            num_threads
        };

        let shared = Arc::new(PoolShared {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            stop: AtomicBool::new(false),
        });

        let workers = (0..num_threads)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || worker_loop(&shared))
            })
            .collect();

        info!(workers = num_threads, "worker pool started");
        Self {
            shared,
            workers: Mutex::new(workers),
        }
    }

    /// Queue a job for execution
    ///
    /// Jobs queued after shutdown are discarded.
    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.shared.stop.load(Ordering::Relaxed) {
            return;
        }
        {
            let mut queue = self.shared.queue.lock().expect("pool queue poisoned");
            queue.push_back(Box::new(job));
        }
        self.shared.available.notify_one();
    }

    /// Drain pending work, then join every worker
    pub fn shutdown(&self) {
        self.shared.stop.store(true, Ordering::Relaxed);
        self.shared.available.notify_all();

        let mut workers = self.workers.lock().expect("pool workers poisoned");
        for handle in workers.drain(..) {
            let _ = handle.join();
        }
    }

    /// Number of workers still attached
    pub fn worker_count(&self) -> usize {
        self.workers.lock().expect("pool workers poisoned").len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: &PoolShared) {
    loop {
        let job = {
            let mut queue = shared.queue.lock().expect("pool queue poisoned");
            loop {
                if let Some(job) = queue.pop_front() {
                    break job;
                }
                if shared.stop.load(Ordering::Relaxed) {
                    return;
                }
                queue = shared
                    .available
                    .wait(queue)
                    .expect("pool queue poisoned");
            }
        };
        job();
    }
}

//! Worker pool for deferred page resource creation.
//!
//! Produce on workers, publish on the owner: jobs run on a rayon pool and
//! send their result back over a channel; the thread owning the
//! [`PageResourceCache`] drains the channel and publishes each completion,
//! which re-validates that the page is still wanted.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError, channel};
use std::time::{Duration, Instant};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{LayoutError, Result};

use super::window::{PageResourceCache, Publish, ResourceFactory, Ticket};

pub(crate) fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// A finished creation job.
pub struct Completion<R> {
    pub ticket: Ticket,
    pub result: Result<R>,
}

/// Counts of what a drain published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    pub inserted: usize,
    pub failed: usize,
    pub stale: usize,
}

impl DrainReport {
    fn record(&mut self, outcome: Publish) {
        match outcome {
            Publish::Inserted => self.inserted += 1,
            Publish::Failed => self.failed += 1,
            Publish::Stale => self.stale += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.inserted + self.failed + self.stale
    }
}

/// Rayon-backed pool producing resources of type `R`.
pub struct RenderPool<R> {
    pool: ThreadPool,
    tx: Sender<Completion<R>>,
    rx: Receiver<Completion<R>>,
    outstanding: usize,
}

impl<R: Send + 'static> RenderPool<R> {
    /// Pool with one worker per available core.
    pub fn new() -> Result<Self> {
        Self::with_threads(default_thread_count())
    }

    pub fn with_threads(threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("bookfold-render-{i}"))
            .build()
            .map_err(|e| LayoutError::ThreadPool(e.to_string()))?;
        let (tx, rx) = channel();
        Ok(Self {
            pool,
            tx,
            rx,
            outstanding: 0,
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Jobs submitted whose completion has not been drained yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Queues one creation job per ticket, in ticket order.
    pub fn submit<F>(&mut self, factory: &Arc<F>, tickets: &[Ticket])
    where
        F: ResourceFactory<Resource = R> + 'static,
    {
        for &ticket in tickets {
            let factory = Arc::clone(factory);
            let tx = self.tx.clone();
            self.pool.spawn_fifo(move || {
                let result = factory.create(ticket.index());
                // The receiver lives as long as the pool.
                let _ = tx.send(Completion { ticket, result });
            });
            self.outstanding += 1;
        }
    }

    /// Publishes every completion already received, without blocking.
    pub fn drain<F>(&mut self, cache: &mut PageResourceCache<F>) -> DrainReport
    where
        F: ResourceFactory<Resource = R>,
    {
        let mut report = DrainReport::default();
        loop {
            match self.rx.try_recv() {
                Ok(completion) => {
                    self.outstanding = self.outstanding.saturating_sub(1);
                    report.record(cache.publish(completion.ticket, completion.result));
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        report
    }

    /// Publishes completions until none are outstanding or `timeout`
    /// elapses.
    pub fn drain_blocking<F>(
        &mut self,
        cache: &mut PageResourceCache<F>,
        timeout: Duration,
    ) -> DrainReport
    where
        F: ResourceFactory<Resource = R>,
    {
        let deadline = Instant::now() + timeout;
        let mut report = DrainReport::default();
        while self.outstanding > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(completion) => {
                    self.outstanding -= 1;
                    report.record(cache.publish(completion.ticket, completion.result));
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(
                        outstanding = self.outstanding,
                        "timed out waiting for page resources"
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        report
    }
}

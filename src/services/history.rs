//! Background recording of weather searches with bounded retention.
//!
//! Searches are enqueued from the request path and written by a single
//! worker task, so the evict/insert sequence for a user never interleaves
//! with itself.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::config::HistoryConfig;
use crate::db::{RetentionOutcome, Store};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryJob {
    pub user_id: i32,
    pub city: String,
    pub country: String,
    pub region: String,
}

#[async_trait]
pub trait HistoryRecorder: Send + Sync {
    async fn record(&self, job: &HistoryJob) -> anyhow::Result<RetentionOutcome>;
}

/// Keeps at most `max_entries` rows per user, evicting the oldest first.
pub struct SearchHistoryRetention {
    store: Store,
    max_entries: u64,
}

impl SearchHistoryRetention {
    #[must_use]
    pub const fn new(store: Store, max_entries: u64) -> Self {
        Self { store, max_entries }
    }
}

#[async_trait]
impl HistoryRecorder for SearchHistoryRetention {
    async fn record(&self, job: &HistoryJob) -> anyhow::Result<RetentionOutcome> {
        self.store
            .record_search(
                job.user_id,
                &job.city,
                &job.country,
                &job.region,
                self.max_entries,
            )
            .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
}

impl From<&HistoryConfig> for RetryPolicy {
    fn from(config: &HistoryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            attempt_timeout: Duration::from_secs(config.attempt_timeout_seconds),
        }
    }
}

enum Message {
    Record(HistoryJob),
    Flush(oneshot::Sender<()>),
}

/// Handle to the history worker. Cloning shares the same worker.
#[derive(Clone)]
pub struct HistoryQueue {
    tx: mpsc::Sender<Message>,
    dead_letters: Arc<AtomicU64>,
}

impl HistoryQueue {
    /// Spawns the worker on the current runtime.
    pub fn spawn(recorder: Arc<dyn HistoryRecorder>, capacity: usize, policy: RetryPolicy) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let dead_letters = Arc::new(AtomicU64::new(0));

        tokio::spawn(run_worker(rx, recorder, policy, dead_letters.clone()));

        Self { tx, dead_letters }
    }

    /// Never blocks. A full or closed queue drops the job with a warning.
    pub fn enqueue(&self, job: HistoryJob) -> bool {
        match self.tx.try_send(Message::Record(job)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(Message::Record(job))) => {
                warn!(
                    event = "search_history_dropped",
                    user_id = job.user_id,
                    city = %job.city,
                    "History queue full, dropping search"
                );
                false
            }
            Err(_) => {
                warn!(
                    event = "search_history_dropped",
                    "History worker stopped, dropping search"
                );
                false
            }
        }
    }

    /// Resolves once every job enqueued before this call has been processed.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Message::Flush(ack_tx)).await.is_err() {
            return;
        }
        let _ = ack_rx.await;
    }

    #[must_use]
    pub fn dead_letters(&self) -> u64 {
        self.dead_letters.load(Ordering::Relaxed)
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<Message>,
    recorder: Arc<dyn HistoryRecorder>,
    policy: RetryPolicy,
    dead_letters: Arc<AtomicU64>,
) {
    while let Some(message) = rx.recv().await {
        match message {
            Message::Record(job) => {
                if !process(recorder.as_ref(), &job, policy).await {
                    dead_letter(&job, policy, &dead_letters);
                }
            }
            Message::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    debug!("History worker stopped");
}

/// Returns `false` once every attempt has failed.
async fn process(recorder: &dyn HistoryRecorder, job: &HistoryJob, policy: RetryPolicy) -> bool {
    for attempt in 1..=policy.max_attempts {
        match tokio::time::timeout(policy.attempt_timeout, recorder.record(job)).await {
            Ok(Ok(outcome)) => {
                debug!(
                    event = "search_history_recorded",
                    user_id = job.user_id,
                    city = %job.city,
                    inserted = outcome.inserted,
                    evicted = ?outcome.evicted,
                    attempt,
                    "Search history updated"
                );
                return true;
            }
            Ok(Err(e)) => {
                warn!(
                    event = "search_history_attempt_failed",
                    user_id = job.user_id,
                    attempt,
                    error = %e,
                    "Failed to record search history"
                );
            }
            Err(_) => {
                warn!(
                    event = "search_history_attempt_failed",
                    user_id = job.user_id,
                    attempt,
                    timeout_ms = u64::try_from(policy.attempt_timeout.as_millis()).unwrap_or(u64::MAX),
                    "Recording search history timed out"
                );
            }
        }
    }

    false
}

fn dead_letter(job: &HistoryJob, policy: RetryPolicy, counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
    metrics::counter!("search_history_dead_letters_total").increment(1);
    error!(
        event = "search_history_dead_letter",
        user_id = job.user_id,
        city = %job.city,
        country = %job.country,
        region = %job.region,
        attempts = policy.max_attempts,
        "Giving up on search history job"
    );
}

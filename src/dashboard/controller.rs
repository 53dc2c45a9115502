use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::Utc;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::api::FeedbackApi;

use super::{ApplyOutcome, DashboardSnapshot, DashboardState, ListStatus};

// Per-tick logging; lifecycle messages go through the same switch.
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Receives every snapshot change. The terminal front-end renders it;
/// tests record it.
pub trait DashboardSink: Send + Sync + 'static {
    fn dashboard_updated(&self, snapshot: &DashboardSnapshot);
}

struct Poller {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl Poller {
    fn stop(self) {
        self.cancel_token.cancel();
        self.handle.abort();
    }
}

/// Admin dashboard: polls the submission list while active.
pub struct DashboardController<A: FeedbackApi, S: DashboardSink> {
    state: Arc<Mutex<DashboardState>>,
    api: Arc<A>,
    sink: Arc<S>,
    poller: Arc<Mutex<Option<Poller>>>,
    next_seq: Arc<AtomicU64>,
    poll_interval: Duration,
}

impl<A: FeedbackApi, S: DashboardSink> Clone for DashboardController<A, S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            api: self.api.clone(),
            sink: self.sink.clone(),
            poller: self.poller.clone(),
            next_seq: self.next_seq.clone(),
            poll_interval: self.poll_interval,
        }
    }
}

impl<A: FeedbackApi, S: DashboardSink> DashboardController<A, S> {
    pub fn new(api: Arc<A>, sink: Arc<S>, poll_interval: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(DashboardState::new())),
            api,
            sink,
            poller: Arc::new(Mutex::new(None)),
            next_seq: Arc::new(AtomicU64::new(0)),
            poll_interval,
        }
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.state.lock().await.snapshot().clone()
    }

    /// True when the last applied fetch failed.
    pub async fn is_stale(&self) -> bool {
        matches!(
            self.state.lock().await.snapshot().status,
            ListStatus::Stale { .. }
        )
    }

    pub async fn is_active(&self) -> bool {
        self.poller.lock().await.is_some()
    }

    /// Fetches now and then every `poll_interval` until `deactivate`.
    /// Re-activating replaces the running poller, so at most one timer exists.
    pub async fn activate(&self) {
        let mut guard = self.poller.lock().await;
        if let Some(previous) = guard.take() {
            log_debug!("replacing running dashboard poller");
            previous.stop();
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(self.clone().poll_loop(cancel_token.clone()));

        log_info!(
            "dashboard polling every {}s",
            self.poll_interval.as_secs_f64()
        );
        *guard = Some(Poller {
            handle,
            cancel_token,
        });
    }

    /// Stops the timer and drops any fetch still in flight. Idempotent.
    pub async fn deactivate(&self) {
        if let Some(poller) = self.poller.lock().await.take() {
            poller.stop();
            log_info!("dashboard polling stopped");
        }
    }

    /// One fetch outside the timer, applied with the same ordering rules.
    pub async fn refresh(&self) -> ApplyOutcome {
        let seq = self.issue_seq();
        self.fetch_and_apply(seq).await
    }

    async fn poll_loop(self, cancel_token: CancellationToken) {
        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // Ticks do not wait for earlier fetches; ordering is
                    // restored by sequence numbers when results land.
                    let seq = self.issue_seq();
                    let this = self.clone();
                    let token = cancel_token.clone();
                    tokio::spawn(async move {
                        tokio::select! {
                            _ = this.fetch_and_apply(seq) => {}
                            _ = token.cancelled() => {
                                log_debug!("dropping in-flight fetch #{seq}");
                            }
                        }
                    });
                }
                _ = cancel_token.cancelled() => {
                    log_debug!("dashboard poll loop shutting down");
                    break;
                }
            }
        }
    }

    fn issue_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn fetch_and_apply(&self, seq: u64) -> ApplyOutcome {
        let result = self.api.list_submissions().await;

        match &result {
            Ok(submissions) => log_debug!("fetch #{seq}: {} submissions", submissions.len()),
            Err(err) => log_warn!("fetch #{seq} failed: {err}"),
        }

        let mut state = self.state.lock().await;
        let outcome = state.apply(seq, result, Utc::now());
        match outcome {
            ApplyOutcome::Discarded => {
                log_debug!(
                    "discarding fetch #{seq}; #{} already applied",
                    state.last_applied_seq()
                );
            }
            ApplyOutcome::Replaced | ApplyOutcome::MarkedStale => {
                self.sink.dashboard_updated(state.snapshot());
            }
        }
        outcome
    }
}

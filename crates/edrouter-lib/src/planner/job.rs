//! Submit/poll/cancel lifecycle of a remote route computation.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::route::{Route, RouteKind};

use super::client::PlannerTransport;
use super::reply::PlannerReply;
use super::request::RouteQuery;

const DELAY_PREFIX: [u64; 7] = [1, 2, 4, 4, 4, 6, 6];
const DELAY_STEADY: u64 = 10;

/// Re-poll delays: a short ramp, then a steady interval forever.
#[derive(Debug, Clone, Default)]
pub struct DelaySchedule {
    attempt: usize,
}

impl Iterator for DelaySchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let seconds = DELAY_PREFIX
            .get(self.attempt)
            .copied()
            .unwrap_or(DELAY_STEADY);
        self.attempt = self.attempt.saturating_add(1);
        Some(Duration::from_secs(seconds))
    }
}

/// Lifecycle of a job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    Submitted,
    Queued,
    Done(Route),
    Error(String),
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Done(_) | JobState::Error(_) | JobState::Cancelled
        )
    }
}

/// Transition notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Submitted { kind: RouteKind },
    Queued { job_id: String, retry_in: Duration },
    Done(Route),
    Failed(String),
    Cancelled,
}

/// Cancels a job from outside the task running it.
///
/// Cancelling is idempotent and has no effect once the job is terminal.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    signal: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            signal: Arc::new(signal),
        }
    }

    pub fn cancel(&self) {
        if !self.signal.send_replace(true) {
            debug!("route job cancellation requested");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.signal.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.signal.subscribe()
    }
}

/// Resolves once cancellation is requested.
async fn cancelled(signal: &mut watch::Receiver<bool>) {
    if signal.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// One route computation against the remote planner.
pub struct RemoteRouteJob<T> {
    transport: T,
    query: RouteQuery,
    job_id: Option<String>,
    state: JobState,
    schedule: DelaySchedule,
    cancel: CancelHandle,
    events: Option<mpsc::UnboundedSender<JobEvent>>,
}

impl<T: PlannerTransport> RemoteRouteJob<T> {
    pub fn new(transport: T, query: RouteQuery) -> Self {
        Self {
            transport,
            query,
            job_id: None,
            state: JobState::Submitted,
            schedule: DelaySchedule::default(),
            cancel: CancelHandle::new(),
            events: None,
        }
    }

    /// Report every transition on `events`.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<JobEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn kind(&self) -> RouteKind {
        self.query.kind()
    }

    /// Drive the job to a terminal state and return it.
    ///
    /// Polls are strictly sequential. A response that arrives after
    /// cancellation was requested is dropped without a transition, and the
    /// result payload is decoded exactly once.
    pub async fn run(mut self) -> JobState {
        let kind = self.query.kind();
        if let Err(err) = self.query.validate() {
            self.finish(JobState::Error(err.to_string()));
            return self.state;
        }

        self.emit(JobEvent::Submitted { kind });
        info!(kind = %kind, endpoint = kind.endpoint(), "submitting route job");

        let mut path = kind.endpoint().to_string();
        let mut params = self.query.to_pairs();

        loop {
            let Some(response) = self.request(&path, &params).await else {
                self.finish(JobState::Cancelled);
                break;
            };
            let value = match response {
                Ok(value) => value,
                Err(err) => {
                    self.finish(JobState::Error(err.to_string()));
                    break;
                }
            };

            match PlannerReply::classify(value) {
                PlannerReply::Queued(job_id) => {
                    let retry_in = self.schedule.next().unwrap_or_default();
                    debug!(job = %job_id, delay_secs = retry_in.as_secs(), "route job queued");
                    path = format!("results/{job_id}");
                    params = Vec::new();
                    self.job_id = Some(job_id.clone());
                    self.state = JobState::Queued;
                    self.emit(JobEvent::Queued { job_id, retry_in });

                    if !self.pause(retry_in).await {
                        self.finish(JobState::Cancelled);
                        break;
                    }
                }
                PlannerReply::Result(payload) => {
                    let state = self.decode(kind, &payload);
                    self.finish(state);
                    break;
                }
                PlannerReply::Failed(message) => {
                    self.finish(JobState::Error(message));
                    break;
                }
            }
        }

        self.state
    }

    /// Issue one request; `None` when cancellation won the race.
    async fn request(&self, path: &str, params: &[(String, String)]) -> Option<Result<Value>> {
        let mut signal = self.cancel.subscribe();
        if *signal.borrow() {
            return None;
        }

        let response = tokio::select! {
            biased;
            _ = cancelled(&mut signal) => return None,
            response = self.transport.fetch(path, params) => response,
        };

        if self.cancel.is_cancelled() {
            debug!(path, "discarding response to a cancelled route job");
            return None;
        }
        Some(response)
    }

    /// Sleep between polls; `false` when cancelled meanwhile.
    async fn pause(&self, delay: Duration) -> bool {
        let mut signal = self.cancel.subscribe();
        tokio::select! {
            biased;
            _ = cancelled(&mut signal) => false,
            _ = tokio::time::sleep(delay) => !self.cancel.is_cancelled(),
        }
    }

    fn decode(&self, kind: RouteKind, payload: &Value) -> JobState {
        match Route::from_remote_result(kind, payload) {
            Ok(route) => JobState::Done(route),
            Err(err) => JobState::Error(err.to_string()),
        }
    }

    fn finish(&mut self, state: JobState) {
        let event = match &state {
            JobState::Done(route) => {
                info!(
                    kind = %route.kind(),
                    waypoints = route.len(),
                    jumps = route.jumps_total(),
                    "route job finished"
                );
                JobEvent::Done(route.clone())
            }
            JobState::Error(message) => {
                warn!(job = self.job_id.as_deref().unwrap_or("-"), %message, "route job failed");
                JobEvent::Failed(message.clone())
            }
            JobState::Cancelled => {
                info!(job = self.job_id.as_deref().unwrap_or("-"), "route job cancelled");
                JobEvent::Cancelled
            }
            JobState::Submitted | JobState::Queued => {
                self.state = state;
                return;
            }
        };
        self.state = state;
        self.emit(event);
    }

    fn emit(&self, event: JobEvent) {
        if let Some(events) = &self.events {
            // A dropped receiver only means nobody is listening any more.
            let _ = events.send(event);
        }
    }
}

struct ActiveJob {
    cancel: CancelHandle,
    task: JoinHandle<JobState>,
}

/// Holds at most one running job per logical submission.
#[derive(Default)]
pub struct JobSlot {
    active: Option<ActiveJob>,
}

impl JobSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel and await any previous job, then spawn `job`.
    pub async fn start<T>(&mut self, job: RemoteRouteJob<T>) -> CancelHandle
    where
        T: PlannerTransport + 'static,
    {
        if let Some(previous) = self.cancel().await {
            debug!(?previous, "replaced previous route job");
        }
        let cancel = job.cancel_handle();
        let task = tokio::spawn(job.run());
        self.active = Some(ActiveJob {
            cancel: cancel.clone(),
            task,
        });
        cancel
    }

    /// Cancel the running job, if any, and wait for it to settle.
    pub async fn cancel(&mut self) -> Option<JobState> {
        let active = self.active.take()?;
        active.cancel.cancel();
        join(active.task).await
    }

    /// Wait for the running job to finish on its own.
    pub async fn wait(&mut self) -> Option<JobState> {
        let active = self.active.take()?;
        join(active.task).await
    }

    pub fn is_busy(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.task.is_finished())
    }
}

async fn join(task: JoinHandle<JobState>) -> Option<JobState> {
    match task.await {
        Ok(state) => Some(state),
        Err(err) => {
            warn!(error = %err, "route job task ended abnormally");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_schedule_ramps_then_holds() {
        let delays: Vec<u64> = DelaySchedule::default()
            .take(10)
            .map(|delay| delay.as_secs())
            .collect();
        assert_eq!(delays, vec![1, 2, 4, 4, 4, 6, 6, 10, 10, 10]);
    }

    #[test]
    fn cancel_is_idempotent() {
        let handle = CancelHandle::new();
        assert!(!handle.is_cancelled());
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn terminal_states() {
        assert!(!JobState::Submitted.is_terminal());
        assert!(!JobState::Queued.is_terminal());
        assert!(JobState::Cancelled.is_terminal());
        assert!(JobState::Error("x".to_string()).is_terminal());
    }
}

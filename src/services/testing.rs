//! Fakes shared by the service tests.

use std::{
    collections::VecDeque,
    sync::{atomic::AtomicUsize, atomic::Ordering, Mutex},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::time;

use crate::domain::{
    error::ScrapeError,
    scrape_job::{JobId, JobStatus},
};

use super::{Clock, SnapshotApi};

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl Default for ManualClock {
    fn default() -> Self {
        ManualClock::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

/// Replays a fixed sequence of statuses, then repeats the last one.
/// `poll_error_at` makes the n-th poll (1-based) fail with a provider 500.
pub struct ScriptedApi {
    pub statuses: Mutex<VecDeque<JobStatus>>,
    pub payload: Value,
    pub submit_delay: Duration,
    pub poll_error_at: Option<usize>,
    pub submits: AtomicUsize,
    pub polls: AtomicUsize,
    pub fetches: AtomicUsize,
}

impl ScriptedApi {
    pub fn new(statuses: Vec<JobStatus>, payload: Value) -> Self {
        ScriptedApi {
            statuses: Mutex::new(statuses.into()),
            payload,
            submit_delay: Duration::ZERO,
            poll_error_at: None,
            submits: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SnapshotApi for ScriptedApi {
    async fn submit(&self, _inputs: &[String]) -> Result<JobId, ScrapeError> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        time::sleep(self.submit_delay).await;
        Ok(JobId("s_test".to_string()))
    }

    async fn poll(&self, _job: &JobId) -> Result<JobStatus, ScrapeError> {
        let n = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.poll_error_at == Some(n) {
            return Err(ScrapeError::Provider {
                status: 500,
                body: "progress unavailable".to_string(),
            });
        }
        let mut statuses = self.statuses.lock().unwrap();
        let status = match statuses.len() {
            0 => JobStatus::Pending,
            1 => statuses[0].clone(),
            _ => statuses.pop_front().unwrap(),
        };
        Ok(status)
    }

    async fn fetch_result(&self, _job: &JobId) -> Result<Value, ScrapeError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.payload.clone())
    }
}

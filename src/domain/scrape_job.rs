use std::fmt;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status as reported by the provider's progress endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Ready,
    Failed,
    Unknown(String),
}

impl JobStatus {
    pub fn parse(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "pending" => JobStatus::Pending,
            "running" => JobStatus::Running,
            "ready" => JobStatus::Ready,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Unknown(status.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    Submitted,
    Polling,
    Ready(Value),
    Failed,
    TimedOut,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Ready(_) | JobState::Failed | JobState::TimedOut
        )
    }
}

/// One batch extraction job. State only moves forward; once terminal it stays put.
#[derive(Debug, Clone)]
pub struct ScrapeJob {
    pub id: JobId,
    pub inputs: Vec<String>,
    state: JobState,
}

impl ScrapeJob {
    pub fn submitted(id: JobId, inputs: Vec<String>) -> Self {
        ScrapeJob {
            id,
            inputs,
            state: JobState::Submitted,
        }
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// Apply a polled status. Anything other than pending/running is terminal,
    /// and an unrecognised status counts as a failure.
    pub fn observe(&mut self, status: &JobStatus) {
        if self.state.is_terminal() {
            return;
        }
        self.state = match status {
            JobStatus::Pending | JobStatus::Running => JobState::Polling,
            // Ready only becomes terminal once the snapshot is fetched
            JobStatus::Ready => JobState::Polling,
            JobStatus::Failed | JobStatus::Unknown(_) => JobState::Failed,
        };
    }

    pub fn complete(&mut self, payload: Value) {
        if !self.state.is_terminal() {
            self.state = JobState::Ready(payload);
        }
    }

    pub fn time_out(&mut self) {
        if !self.state.is_terminal() {
            self.state = JobState::TimedOut;
        }
    }
}

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::{self, Instant};

use crate::domain::{
    error::ScrapeError,
    scrape_job::{JobId, JobState, JobStatus, ScrapeJob},
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(120_000);

/// The three calls a batch extraction provider exposes.
#[async_trait]
pub trait SnapshotApi: Send + Sync {
    async fn submit(&self, inputs: &[String]) -> Result<JobId, ScrapeError>;
    async fn poll(&self, job: &JobId) -> Result<JobStatus, ScrapeError>;
    async fn fetch_result(&self, job: &JobId) -> Result<Value, ScrapeError>;
}

/// Drives one job from submission to a terminal state.
pub struct JobRunner<A> {
    api: A,
    poll_interval: Duration,
}

impl<A: SnapshotApi> JobRunner<A> {
    pub fn new(api: A, poll_interval: Duration) -> Self {
        JobRunner { api, poll_interval }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Submit `inputs` and poll until the job is ready, failed, or `max_wait`
    /// has elapsed. The budget starts before submission, so a slow submit
    /// counts against it. Provider errors on any call end the run immediately.
    pub async fn run_to_completion(
        &self,
        inputs: &[String],
        max_wait: Duration,
    ) -> Result<Value, ScrapeError> {
        let started = Instant::now();
        let deadline = started + max_wait;

        let job_id = self.api.submit(inputs).await?;
        let mut job = ScrapeJob::submitted(job_id, inputs.to_vec());
        log::info!(
            "Submitted scrape job {} with {} inputs",
            job.id,
            job.inputs.len()
        );

        while Instant::now() < deadline {
            let status = self.api.poll(&job.id).await?;
            log::debug!("Scrape job {} status: {:?}", job.id, status);
            job.observe(&status);

            match status {
                JobStatus::Ready => {
                    let payload = self.api.fetch_result(&job.id).await?;
                    job.complete(payload);
                    break;
                }
                JobStatus::Pending | JobStatus::Running => {
                    let wake = (Instant::now() + self.poll_interval).min(deadline);
                    time::sleep_until(wake).await;
                }
                JobStatus::Failed | JobStatus::Unknown(_) => break,
            }
        }
        job.time_out();

        match job.state() {
            JobState::Ready(payload) => {
                log::info!("Scrape job {} ready after {:?}", job.id, started.elapsed());
                Ok(payload.clone())
            }
            JobState::Failed => {
                log::error!("Scrape job {} failed", job.id);
                Err(ScrapeError::Failed {
                    job: job.id.clone(),
                })
            }
            _ => {
                log::error!("Scrape job {} timed out after {:?}", job.id, max_wait);
                Err(ScrapeError::TimedOut {
                    job: job.id.clone(),
                    waited: started.elapsed(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use serde_json::json;

    use super::*;
    use crate::services::testing::ScriptedApi;

    fn inputs() -> Vec<String> {
        vec!["https://www.linkedin.com/company/acme".to_string()]
    }

    #[tokio::test(start_paused = true)]
    async fn ready_after_pending_returns_payload() {
        let api = ScriptedApi::new(
            vec![JobStatus::Pending, JobStatus::Running, JobStatus::Ready],
            json!([{"name": "Acme"}]),
        );
        let runner = JobRunner::new(api, DEFAULT_POLL_INTERVAL);

        let payload = runner
            .run_to_completion(&inputs(), DEFAULT_MAX_WAIT)
            .await
            .unwrap();

        assert_eq!(payload, json!([{"name": "Acme"}]));
        assert_eq!(runner.api().polls.load(Ordering::SeqCst), 3);
        assert_eq!(runner.api().fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_status_is_terminal() {
        let api = ScriptedApi::new(vec![JobStatus::Running, JobStatus::Failed], json!([]));
        let runner = JobRunner::new(api, DEFAULT_POLL_INTERVAL);

        let err = runner
            .run_to_completion(&inputs(), DEFAULT_MAX_WAIT)
            .await
            .unwrap_err();

        assert!(matches!(err, ScrapeError::Failed { .. }));
        assert_eq!(runner.api().polls.load(Ordering::SeqCst), 2);
        assert_eq!(runner.api().fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_status_is_terminal_failure() {
        let api = ScriptedApi::new(vec![JobStatus::Unknown("canceled".to_string())], json!([]));
        let runner = JobRunner::new(api, DEFAULT_POLL_INTERVAL);

        let err = runner
            .run_to_completion(&inputs(), DEFAULT_MAX_WAIT)
            .await
            .unwrap_err();

        assert!(matches!(err, ScrapeError::Failed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn never_ready_times_out_at_budget() {
        let api = ScriptedApi::new(vec![JobStatus::Pending], json!([]));
        let runner = JobRunner::new(api, Duration::from_secs(3));
        let started = Instant::now();

        let err = runner
            .run_to_completion(&inputs(), Duration::from_secs(10))
            .await
            .unwrap_err();

        assert!(matches!(err, ScrapeError::TimedOut { .. }));
        // polls at t=0, 3, 6, 9; the last sleep is clipped to the deadline
        assert_eq!(runner.api().polls.load(Ordering::SeqCst), 4);
        assert_eq!(started.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn budget_counts_from_submission() {
        let mut api = ScriptedApi::new(vec![JobStatus::Pending], json!([]));
        api.submit_delay = Duration::from_secs(11);
        let runner = JobRunner::new(api, Duration::from_secs(3));

        let err = runner
            .run_to_completion(&inputs(), Duration::from_secs(10))
            .await
            .unwrap_err();

        assert!(matches!(err, ScrapeError::TimedOut { .. }));
        assert_eq!(runner.api().polls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_error_mid_run_is_returned() {
        let mut api = ScriptedApi::new(vec![JobStatus::Running], json!([]));
        api.poll_error_at = Some(3);
        let runner = JobRunner::new(api, DEFAULT_POLL_INTERVAL);

        let err = runner
            .run_to_completion(&inputs(), DEFAULT_MAX_WAIT)
            .await
            .unwrap_err();

        match err {
            ScrapeError::Provider { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "progress unavailable");
            }
            other => panic!("expected provider error, got {:?}", other),
        }
        assert_eq!(runner.api().polls.load(Ordering::SeqCst), 3);
        assert_eq!(runner.api().fetches.load(Ordering::SeqCst), 0);
    }
}

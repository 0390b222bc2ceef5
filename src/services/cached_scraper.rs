use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::ScrapeError;

use super::{JobRunner, ScrapeCache, SnapshotApi};

/// Where the reconciler gets live company payloads from.
#[async_trait]
pub trait LiveCompanySource: Send + Sync {
    async fn scrape_companies(&self, urls: &[String]) -> Result<Value, ScrapeError>;
}

type Gate = Arc<tokio::sync::Mutex<()>>;

/// A job runner behind the scrape cache.
///
/// Only successful runs are cached. Each cache key has its own gate, held
/// across check, run and fill, so two identical requests in flight together
/// cost one provider job while hits and other keys never wait on it.
pub struct CachedScraper<A> {
    runner: JobRunner<A>,
    cache: Arc<ScrapeCache>,
    max_wait: Duration,
    gates: Mutex<HashMap<String, Gate>>,
}

impl<A: SnapshotApi> CachedScraper<A> {
    pub fn new(runner: JobRunner<A>, cache: Arc<ScrapeCache>, max_wait: Duration) -> Self {
        CachedScraper {
            runner,
            cache,
            max_wait,
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn runner(&self) -> &JobRunner<A> {
        &self.runner
    }

    pub async fn scrape(&self, inputs: &[String]) -> Result<Value, ScrapeError> {
        let key = ScrapeCache::key_for(inputs);
        if let Some(payload) = self.cache.get(&key) {
            log::info!("Scrape cache hit for {} inputs", inputs.len());
            return Ok(payload);
        }

        let gate = self.gate_for(&key);
        let result = {
            let _guard = gate.lock().await;
            match self.cache.get(&key) {
                Some(payload) => {
                    log::info!("Scrape cache filled while waiting for {} inputs", inputs.len());
                    Ok(payload)
                }
                None => self.run_and_fill(inputs, &key).await,
            }
        };
        self.release_gate(&key, gate);
        result
    }

    async fn run_and_fill(&self, inputs: &[String], key: &str) -> Result<Value, ScrapeError> {
        let payload = self.runner.run_to_completion(inputs, self.max_wait).await?;
        self.cache.put(key.to_string(), payload.clone());
        Ok(payload)
    }

    fn gate_for(&self, key: &str) -> Gate {
        self.gates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    // Clones only happen under the map lock, so a count of two (map + ours)
    // means nobody else is waiting on this key.
    fn release_gate(&self, key: &str, gate: Gate) {
        let mut gates = self.gates.lock().unwrap_or_else(|e| e.into_inner());
        if Arc::strong_count(&gate) <= 2 {
            gates.remove(key);
        }
    }
}

#[async_trait]
impl<A: SnapshotApi> LiveCompanySource for CachedScraper<A> {
    async fn scrape_companies(&self, urls: &[String]) -> Result<Value, ScrapeError> {
        self.scrape(urls).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use serde_json::json;
    use tokio::time::Instant;

    use super::*;
    use crate::{
        domain::scrape_job::JobStatus,
        services::{
            testing::{ManualClock, ScriptedApi},
            DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL, DEFAULT_TTL,
        },
    };

    fn scraper(statuses: Vec<JobStatus>, clock: Arc<ManualClock>) -> CachedScraper<ScriptedApi> {
        let api = ScriptedApi::new(statuses, json!([{"name": "Acme"}]));
        CachedScraper::new(
            JobRunner::new(api, DEFAULT_POLL_INTERVAL),
            Arc::new(ScrapeCache::new(DEFAULT_TTL, clock)),
            DEFAULT_MAX_WAIT,
        )
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn same_inputs_in_any_order_hit_the_cache() {
        let clock = Arc::new(ManualClock::new());
        let scraper = scraper(vec![JobStatus::Ready], clock.clone());

        scraper.scrape(&urls(&["b", "a"])).await.unwrap();
        let second = scraper.scrape(&urls(&["a", "b"])).await.unwrap();

        assert_eq!(second, json!([{"name": "Acme"}]));
        assert_eq!(scraper.runner().api().submits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_triggers_a_new_job() {
        let clock = Arc::new(ManualClock::new());
        let scraper = scraper(vec![JobStatus::Ready], clock.clone());

        scraper.scrape(&urls(&["a"])).await.unwrap();
        clock.advance(DEFAULT_TTL);
        scraper.scrape(&urls(&["a"])).await.unwrap();

        assert_eq!(scraper.runner().api().submits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_not_cached() {
        let clock = Arc::new(ManualClock::new());
        let scraper = scraper(vec![JobStatus::Failed], clock.clone());

        assert!(scraper.scrape(&urls(&["a"])).await.is_err());
        assert!(scraper.scrape(&urls(&["a"])).await.is_err());

        assert_eq!(scraper.runner().api().submits.load(Ordering::SeqCst), 2);
        assert!(scraper.cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn poll_error_ends_the_run_uncached() {
        let clock = Arc::new(ManualClock::new());
        let mut api = ScriptedApi::new(vec![JobStatus::Pending], json!([]));
        api.poll_error_at = Some(2);
        let scraper = CachedScraper::new(
            JobRunner::new(api, DEFAULT_POLL_INTERVAL),
            Arc::new(ScrapeCache::new(DEFAULT_TTL, clock)),
            DEFAULT_MAX_WAIT,
        );

        let err = scraper.scrape(&urls(&["a"])).await.unwrap_err();

        assert!(matches!(err, ScrapeError::Provider { status: 500, .. }));
        assert_eq!(scraper.runner().api().polls.load(Ordering::SeqCst), 2);
        assert_eq!(scraper.runner().api().fetches.load(Ordering::SeqCst), 0);
        assert!(scraper.cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_identical_requests_share_one_job() {
        let clock = Arc::new(ManualClock::new());
        let scraper = scraper(vec![JobStatus::Pending, JobStatus::Ready], clock);

        let urls_ab = urls(&["a", "b"]);
        let urls_ba = urls(&["b", "a"]);
        let (first, second) = tokio::join!(scraper.scrape(&urls_ab), scraper.scrape(&urls_ba),);

        assert_eq!(first.unwrap(), second.unwrap());
        assert_eq!(scraper.runner().api().submits.load(Ordering::SeqCst), 1);
        assert!(scraper.gates.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn hit_for_another_key_does_not_wait_on_a_running_job() {
        let clock = Arc::new(ManualClock::new());
        let scraper = Arc::new(scraper(vec![JobStatus::Pending], clock));
        scraper
            .cache
            .put(ScrapeCache::key_for(&["b"]), json!([{"name": "Cached"}]));

        let running = tokio::spawn({
            let scraper = scraper.clone();
            async move { scraper.scrape(&urls(&["a"])).await }
        });
        while scraper.runner().api().submits.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let started = Instant::now();
        let hit = scraper.scrape(&urls(&["b"])).await.unwrap();

        assert_eq!(hit, json!([{"name": "Cached"}]));
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert!(matches!(
            running.await.unwrap(),
            Err(ScrapeError::TimedOut { .. })
        ));
    }
}

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    error::ScrapeError,
    scrape_job::{JobId, JobStatus},
};

use super::SnapshotApi;

pub const BRIGHTDATA_URL: &str = "https://api.brightdata.com/datasets/v3";
pub const COMPANY_DATASET_ID: &str = "gd_l1vikfnt1wgvvqz95w";

#[derive(Clone)]
pub struct BrightDataClient {
    client: Client,
    api_key: String,
    base_url: String,
    dataset_id: String,
}

#[derive(Serialize)]
struct TriggerInput<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct TriggerQuery<'a> {
    dataset_id: &'a str,
    format: &'static str,
    uncompressed_webhook: bool,
}

#[derive(Deserialize)]
struct TriggerResponse {
    snapshot_id: JobId,
}

#[derive(Deserialize)]
struct ProgressResponse {
    status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatus {
    pub connected: bool,
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BrightDataClient {
    pub fn new(api_key: String, base_url: String, dataset_id: String) -> Self {
        BrightDataClient {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            dataset_id,
        }
    }

    /// Credential as safe to show: only the last six characters survive.
    pub fn masked_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(6)..].iter().collect();
        format!("***{}", tail)
    }

    /// Check the provider with a dummy progress call; anything but 401 means
    /// the credential was accepted.
    pub async fn check_status(&self) -> ApiStatus {
        match self
            .client
            .get(format!("{}/progress/test", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(res) => ApiStatus {
                connected: res.status() != StatusCode::UNAUTHORIZED,
                api_key: self.masked_key(),
                error: None,
            },
            Err(e) => {
                log::error!("Got error from BrightData status check: {:?}", e);
                ApiStatus {
                    connected: false,
                    api_key: self.masked_key(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Turn a non-2xx response into a provider error carrying its body.
async fn ensure_success(res: Response) -> Result<Response, ScrapeError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    log::error!("BrightData returned {}: {}", status, body);
    Err(ScrapeError::Provider {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(res: Response) -> Result<T, ScrapeError> {
    let bytes = res.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ScrapeError::Decode(e.to_string()))
}

#[async_trait]
impl SnapshotApi for BrightDataClient {
    async fn submit(&self, inputs: &[String]) -> Result<JobId, ScrapeError> {
        let body: Vec<TriggerInput> = inputs.iter().map(|url| TriggerInput { url }).collect();

        let res = self
            .client
            .post(format!("{}/trigger", self.base_url))
            .query(&TriggerQuery {
                dataset_id: &self.dataset_id,
                format: "json",
                uncompressed_webhook: true,
            })
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let trigger: TriggerResponse = decode(ensure_success(res).await?).await?;
        Ok(trigger.snapshot_id)
    }

    async fn poll(&self, job: &JobId) -> Result<JobStatus, ScrapeError> {
        let res = self
            .client
            .get(format!("{}/progress/{}", self.base_url, job))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let progress: ProgressResponse = decode(ensure_success(res).await?).await?;
        Ok(JobStatus::parse(&progress.status))
    }

    async fn fetch_result(&self, job: &JobId) -> Result<Value, ScrapeError> {
        let res = self
            .client
            .get(format!("{}/snapshot/{}", self.base_url, job))
            .query(&[("format", "json")])
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        decode(ensure_success(res).await?).await
    }
}

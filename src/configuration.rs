use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub brightdata: BrightDataSettings,
    pub reconciler: ReconcilerSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct BrightDataSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub company_dataset_id: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub poll_interval_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_wait_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub cache_ttl_secs: u64,
}

impl BrightDataSettings {
    /// The credential, if one is actually set. An empty value counts as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[derive(Deserialize, Clone)]
pub struct ReconcilerSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub live_batch_size: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub default_page_size: usize,
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");

    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")))
        // E.g. `APP_APPLICATION__PORT=5001` would set `Settings.application.port`
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("brightdata.api_key", std::env::var("BRIGHTDATA_API_KEY").ok())?
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::BrightDataSettings;

    fn settings(api_key: Option<&str>) -> BrightDataSettings {
        BrightDataSettings {
            api_key: api_key.map(|k| k.to_string()),
            base_url: "http://localhost".to_string(),
            company_dataset_id: "gd_test".to_string(),
            poll_interval_secs: 3,
            max_wait_secs: 120,
            cache_ttl_secs: 1800,
        }
    }

    #[test]
    fn blank_api_key_is_treated_as_missing() {
        assert_eq!(settings(None).api_key(), None);
        assert_eq!(settings(Some("")).api_key(), None);
        assert_eq!(settings(Some("   ")).api_key(), None);
        assert_eq!(settings(Some("abc123")).api_key(), Some("abc123"));
    }

    #[test]
    fn durations_come_from_seconds() {
        let s = settings(None);
        assert_eq!(s.poll_interval().as_secs(), 3);
        assert_eq!(s.max_wait().as_secs(), 120);
        assert_eq!(s.cache_ttl().as_secs(), 1800);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "icp-similar")]
    IcpSimilar,
    #[serde(rename = "high-fit")]
    HighFit,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::IcpSimilar => "icp-similar",
            Category::HighFit => "high-fit",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    India,
    Global,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::India => "India",
            Region::Global => "Global",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    /// Buckets are exclusive at their lower bound: 5000 is `Medium`, 5001 is `High`.
    pub fn from_employee_count(employees: u64) -> Self {
        match employees {
            n if n > 5000 => Complexity::High,
            n if n > 1000 => Complexity::Medium,
            _ => Complexity::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "Low",
            Complexity::Medium => "Medium",
            Complexity::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Live,
    #[default]
    Static,
}

/// Provenance of a whole result page, forwarded verbatim to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Live,
    Static,
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    pub company: String,
    pub industry: String,
    pub category: Category,
    pub region: Region,
    pub hq: String,
    #[serde(default = "research_needed")]
    pub est_cloud_spend: String,
    pub cloud_complexity: Complexity,
    #[serde(default)]
    pub cloud_providers: Vec<String>,
    #[serde(default)]
    pub cloud_signals: String,
    #[serde(default)]
    pub why_fit: String,
    #[serde(default)]
    pub icp_similarity: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub employee_count: u64,
    #[serde(default)]
    pub linkedin_slug: String,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub source: Source,
}

pub(crate) fn research_needed() -> String {
    "Research needed".to_string()
}

impl CompanyRecord {
    /// Case-insensitive identity used when merging live and static sets.
    pub fn key(&self) -> String {
        self.company.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_bucket_boundaries() {
        assert_eq!(Complexity::from_employee_count(0), Complexity::Low);
        assert_eq!(Complexity::from_employee_count(1000), Complexity::Low);
        assert_eq!(Complexity::from_employee_count(1001), Complexity::Medium);
        assert_eq!(Complexity::from_employee_count(5000), Complexity::Medium);
        assert_eq!(Complexity::from_employee_count(5001), Complexity::High);
    }

    #[test]
    fn static_record_deserializes_with_defaults() {
        let json = r#"{
            "company": "Acme Foods",
            "industry": "FMCG",
            "category": "icp-similar",
            "region": "India",
            "hq": "Mumbai",
            "cloudComplexity": "Medium"
        }"#;
        let record: CompanyRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.category, Category::IcpSimilar);
        assert_eq!(record.source, Source::Static);
        assert_eq!(record.est_cloud_spend, "Research needed");
        assert!(record.cloud_providers.is_empty());
        assert_eq!(record.key(), "acme foods");
    }

    #[test]
    fn result_source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ResultSource::Hybrid).unwrap(),
            r#""hybrid""#
        );
        assert_eq!(serde_json::to_string(&Source::Live).unwrap(), r#""live""#);
    }
}

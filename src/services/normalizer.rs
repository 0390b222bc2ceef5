use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use serde_json::{Map, Value};

use crate::domain::company::{research_needed, Category, CompanyRecord, Complexity, Region, Source};

const INDIAN_CITIES: [&str; 15] = [
    "mumbai",
    "bangalore",
    "bengaluru",
    "delhi",
    "gurugram",
    "gurgaon",
    "hyderabad",
    "chennai",
    "pune",
    "kolkata",
    "noida",
    "ahmedabad",
    "jaipur",
    "kochi",
    "indore",
];

static TECH_SPECIALTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)tech|cloud|data|ai|software|saas|digital").unwrap());

static ICP_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)food|beverage|fmcg|consumer", "TCPL / Coca-Cola"),
        (r"(?i)media|publishing|entertainment", "Condé Nast"),
        (r"(?i)spirits|wine|beer|brew", "Diageo"),
        (r"(?i)ecommerce|e-commerce|retail|d2c", "Shaddu.com"),
    ]
    .into_iter()
    .map(|(pattern, label)| (Regex::new(pattern).unwrap(), label))
    .collect()
});

/// Map a provider snapshot into company records.
///
/// Anything that is not a JSON array yields no records. Each array element
/// yields exactly one record, in order; missing or mistyped fields fall back
/// to defaults instead of failing.
pub fn normalize(raw: &Value, category: Category) -> Vec<CompanyRecord> {
    let Some(items) = raw.as_array() else {
        log::warn!("Provider payload is not a list, normalizing to nothing");
        return vec![];
    };

    let empty = Map::new();
    items
        .iter()
        .map(|item| normalize_one(item.as_object().unwrap_or(&empty), category))
        .collect()
}

fn normalize_one(raw: &Map<String, Value>, category: Category) -> CompanyRecord {
    let industry = text(raw, "industry");
    let specialties = specialties(raw);
    let employees = employee_count(raw);

    CompanyRecord {
        company: text(raw, "name")
            .or_else(|| text(raw, "company_name"))
            .unwrap_or_else(unknown),
        industry: industry
            .clone()
            .or_else(|| joined_list(raw, "industries"))
            .unwrap_or_else(unknown),
        category,
        region: detect_region(raw),
        hq: headquarters(raw).unwrap_or_else(unknown),
        est_cloud_spend: research_needed(),
        cloud_complexity: Complexity::from_employee_count(employees.unwrap_or(0)),
        cloud_providers: vec![],
        cloud_signals: build_cloud_signals(employees, raw, &specialties, industry.as_deref()),
        why_fit: build_why_fit(employees.unwrap_or(0), &specialties),
        icp_similarity: match category {
            Category::IcpSimilar => match_icp(industry.as_deref().unwrap_or("")).to_string(),
            Category::HighFit => "Analyze".to_string(),
        },
        verified: false,
        employee_count: employees.unwrap_or(0),
        linkedin_slug: text(raw, "linkedin_id")
            .or_else(|| text(raw, "id"))
            .unwrap_or_default(),
        linkedin_url: text(raw, "url").unwrap_or_default(),
        followers: raw.get("followers").and_then(as_count).unwrap_or(0),
        about: text(raw, "about").unwrap_or_default(),
        specialties,
        source: Source::Live,
    }
}

/// `India` if the country code is IN or the headquarters names a major Indian city.
pub fn detect_region(raw: &Map<String, Value>) -> Region {
    let hq = headquarters(raw).unwrap_or_default().to_lowercase();
    let country = text(raw, "country_code").unwrap_or_default();

    if country.eq_ignore_ascii_case("in") || INDIAN_CITIES.iter().any(|city| hq.contains(city)) {
        Region::India
    } else {
        Region::Global
    }
}

pub fn match_icp(industry: &str) -> &'static str {
    ICP_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(industry))
        .map(|(_, label)| *label)
        .unwrap_or("Analyze similarity")
}

fn build_cloud_signals(
    employees: Option<u64>,
    raw: &Map<String, Value>,
    specialties: &[String],
    industry: Option<&str>,
) -> String {
    let mut parts = vec![];
    if let Some(n) = employees.filter(|n| *n > 0) {
        parts.push(format!("{} LinkedIn employees", n));
    }
    if let Some(n) = raw.get("followers").and_then(as_count).filter(|n| *n > 0) {
        parts.push(format!("{} followers", n));
    }
    if !specialties.is_empty() {
        parts.push(format!("Specialties: {}", specialties.join(", ")));
    }
    if let Some(industry) = industry {
        parts.push(format!("Industry: {}", industry));
    }

    match parts.is_empty() {
        true => "Scraped from LinkedIn - verify cloud stack".to_string(),
        false => parts.join(". "),
    }
}

fn build_why_fit(employees: u64, specialties: &[String]) -> String {
    let mut parts = vec![];
    match Complexity::from_employee_count(employees) {
        Complexity::High => parts.push("Large enterprise with significant cloud infrastructure."),
        Complexity::Medium => parts.push("Mid-size company likely running cloud workloads."),
        Complexity::Low => {}
    }
    if specialties.iter().any(|s| TECH_SPECIALTY.is_match(s)) {
        parts.push("Technology-oriented specialties suggest cloud dependency.");
    }

    match parts.is_empty() {
        true => "LinkedIn company - analyze cloud fit.".to_string(),
        false => parts.join(" "),
    }
}

fn unknown() -> String {
    "Unknown".to_string()
}

fn text(raw: &Map<String, Value>, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn joined_list(raw: &Map<String, Value>, key: &str) -> Option<String> {
    let joined = raw
        .get(key)?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .join(", ");
    (!joined.is_empty()).then_some(joined)
}

fn headquarters(raw: &Map<String, Value>) -> Option<String> {
    text(raw, "headquarters").or_else(|| {
        raw.get("locations")?
            .as_array()?
            .first()?
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn specialties(raw: &Map<String, Value>) -> Vec<String> {
    let items: Vec<String> = match raw.get("specialties") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => vec![],
    };

    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn employee_count(raw: &Map<String, Value>) -> Option<u64> {
    raw.get("employees_in_linkedin")
        .and_then(as_count)
        .or_else(|| raw.get("company_size").and_then(as_count))
}

/// Numbers, or strings like `"12,500"` / `"10,001+ employees"`: the leading
/// digits (thousands separators skipped) are the count.
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == ',')
                .filter(char::is_ascii_digit)
                .collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

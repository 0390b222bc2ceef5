use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::domain::error::ValidationError;

const LINKEDIN_COMPANY_URL: &str = "https://www.linkedin.com/company/";

pub const TARGET_ROLES: [&str; 10] = [
    "CTO",
    "VP Engineering",
    "Head of Technology",
    "VP DevOps",
    "Head of DevOps",
    "FinOps",
    "CISO",
    "CIO",
    "VP Infrastructure",
    "Head of SRE",
];

static NON_SLUG_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

static LINKEDIN_PEOPLE_SEARCH_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://www.linkedin.com/search/results/people/").unwrap());
static GOOGLE_SEARCH_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://www.google.com/search").unwrap());

pub fn company_slug(name: &str) -> String {
    let lower = name.to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(&lower, "");
    let dashed = WHITESPACE.replace_all(&cleaned, "-");
    DASHES.replace_all(&dashed, "-").into_owned()
}

/// LinkedIn company page URLs used as scrape inputs.
pub fn build_company_urls<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(|name| format!("{}{}", LINKEDIN_COMPANY_URL, company_slug(name.as_ref())))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct LinkedInSearchLinks {
    pub company: String,
    pub linkedin_url: String,
    pub google_fallback: String,
    pub target_roles: Vec<&'static str>,
}

pub fn linkedin_people_search(
    company: Option<&str>,
    role: Option<&str>,
) -> Result<LinkedInSearchLinks, ValidationError> {
    let company = required(company, "Company name")?;
    let role = role.map(str::trim).filter(|r| !r.is_empty());

    let role_query = role.map(str::to_string).unwrap_or_else(|| {
        TARGET_ROLES
            .iter()
            .map(|r| match r.contains(' ') {
                true => format!(r#""{}""#, r),
                false => r.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" OR ")
    });
    let linkedin_url = with_params(
        &LINKEDIN_PEOPLE_SEARCH_URL,
        &[
            ("keywords", role_query.as_str()),
            ("company", company),
            ("origin", "FACETED_SEARCH"),
        ],
    );

    let google_query = format!(
        "site:linkedin.com/in {} {}",
        company,
        role.unwrap_or("CTO OR VP Engineering OR DevOps OR CISO OR CIO")
    );

    Ok(LinkedInSearchLinks {
        company: company.to_string(),
        linkedin_url,
        google_fallback: google_search(&google_query),
        target_roles: TARGET_ROLES.to_vec(),
    })
}

#[derive(Debug, Serialize)]
pub struct ResearchLinks {
    pub revenue: String,
    pub cloud: String,
    pub devops: String,
    pub finops: String,
    pub tech: String,
    pub linkedin: String,
}

#[derive(Debug, Serialize)]
pub struct GoogleVerifyLinks {
    pub company: String,
    pub links: ResearchLinks,
}

pub fn google_verify_links(company: Option<&str>) -> Result<GoogleVerifyLinks, ValidationError> {
    let company = required(company, "Company name")?;
    let search = |suffix: &str| google_search(&format!("{} {}", company, suffix));

    Ok(GoogleVerifyLinks {
        company: company.to_string(),
        links: ResearchLinks {
            revenue: search("annual revenue financial results"),
            cloud: search("cloud infrastructure AWS Azure GCP kubernetes"),
            devops: search("DevOps SRE engineering team hiring"),
            finops: search("FinOps cloud cost optimization"),
            tech: search("technology stack engineering blog"),
            linkedin: google_search(&format!(
                "site:linkedin.com {} CTO OR VP Engineering",
                company
            )),
        },
    })
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ValidationError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

fn google_search(query: &str) -> String {
    with_params(&GOOGLE_SEARCH_URL, &[("q", query)])
}

fn with_params(base: &Url, params: &[(&str, &str)]) -> String {
    let mut url = base.clone();
    url.query_pairs_mut().extend_pairs(params);
    url.to_string()
}

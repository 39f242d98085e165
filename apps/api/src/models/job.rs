use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::evaluation::EvaluationBundle;

/// A posting as the job source provides it, before it is scored against a resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceJob {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub scraped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_fallback: bool,
}

/// A scored posting. Never mutated by the engines, only filtered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub scraped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_fallback: bool,
    /// Match percentage, 0–100.
    #[serde(rename = "match", default)]
    pub match_score: u32,
    #[serde(default)]
    pub matching_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheInfo {
    pub is_fresh: bool,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_age_minutes: Option<i64>,
}

/// Filter state owned by whoever drives the filter UI; rebuilt on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub required_skills: BTreeSet<String>,
    /// Inclusive lower bound on `JobPosting::match_score`. Valid range 0–100.
    #[serde(default)]
    pub min_match: i32,
}

/// Payload delivered after a resume upload. Every field except `filename`
/// tolerates being absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub filename: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub available_locations: Option<Vec<String>>,
    #[serde(default)]
    pub available_skills: Option<Vec<String>>,
    #[serde(default)]
    pub cache_info: Option<CacheInfo>,
    #[serde(default)]
    pub ml_analysis: Option<EvaluationBundle>,
}

//! Job board snapshot — one job pool plus its cache metadata.
//!
//! A board is immutable. A refresh produces a new board; views are always
//! recomputed from the snapshot, never patched.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::errors::EngineError;
use crate::jobs::filter::{available_locations, available_skills, display_skills, filter};
use crate::jobs::freshness::{describe, Freshness};
use crate::models::job::{CacheInfo, FilterCriteria, JobPosting, UploadResult};

#[derive(Debug, Clone, PartialEq)]
pub struct JobBoard {
    pool: Vec<JobPosting>,
    cache_info: Option<CacheInfo>,
}

/// What the results page shows for one set of criteria.
/// `jobs` is exactly the sequence handed to export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub jobs: Vec<JobPosting>,
    pub total_jobs: usize,
    pub available_locations: BTreeSet<String>,
    pub available_skills: Vec<String>,
    pub freshness: Option<Freshness>,
}

impl JobBoard {
    pub fn new(pool: Vec<JobPosting>, cache_info: Option<CacheInfo>) -> Self {
        Self { pool, cache_info }
    }

    pub fn from_upload(upload: &UploadResult) -> Self {
        Self::new(upload.jobs.clone(), upload.cache_info.clone())
    }

    pub fn pool(&self) -> &[JobPosting] {
        &self.pool
    }

    /// Facets come from the whole pool so choosing a filter never hides the
    /// other choices.
    pub fn view(&self, criteria: &FilterCriteria, skill_cap: usize) -> Result<BoardView, EngineError> {
        let jobs = filter(&self.pool, criteria)?;
        Ok(BoardView {
            total_jobs: jobs.len(),
            jobs,
            available_locations: available_locations(&self.pool),
            available_skills: display_skills(&available_skills(&self.pool), skill_cap),
            freshness: describe(self.cache_info.as_ref()),
        })
    }
}

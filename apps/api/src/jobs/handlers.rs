//! Axum route handlers for the Jobs API.

use std::collections::BTreeSet;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::jobs::board::{BoardView, JobBoard};
use crate::jobs::cache::CacheStatus;
use crate::jobs::filter::{available_locations, available_skills, display_skills};
use crate::jobs::matching::{recommend, summarize_candidates, CandidateSummary};
use crate::models::job::{CacheInfo, FilterCriteria, JobPosting, SourceJob};
use crate::state::AppState;

/// Pool size scored when deriving facets or filtering.
const FULL_POOL_TOP_N: usize = 50;
/// Number of recommendations returned after a match.
const RECOMMEND_TOP_N: usize = 20;
const RECOMMEND_MIN_MATCH: u32 = 10;

fn default_min_match() -> i32 {
    RECOMMEND_MIN_MATCH as i32
}

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub jobs_count: usize,
    pub jobs: Vec<SourceJob>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub skills: Vec<String>,
    pub jobs: Vec<JobPosting>,
    pub total_jobs: usize,
    pub available_locations: BTreeSet<String>,
    pub available_skills: Vec<String>,
    pub cache_info: Option<CacheInfo>,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skill_filters: Vec<String>,
    #[serde(default = "default_min_match")]
    pub min_match: i32,
}

#[derive(Debug, Deserialize)]
pub struct CandidateSkills {
    /// Caller-supplied tag echoed back, e.g. a file name.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkMatchRequest {
    pub candidates: Vec<CandidateSkills>,
}

#[derive(Debug, Serialize)]
pub struct CandidateResult {
    pub label: Option<String>,
    #[serde(flatten)]
    pub summary: CandidateSummary,
}

#[derive(Debug, Serialize)]
pub struct BulkMatchResponse {
    pub processed: usize,
    pub results: Vec<CandidateResult>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub jobs_count: usize,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<JobsResponse>, AppError> {
    let jobs = state.job_cache.jobs(state.job_source.as_ref(), false).await?;
    Ok(Json(JobsResponse {
        jobs_count: jobs.len(),
        jobs,
    }))
}

/// POST /api/v1/jobs/match
///
/// Scores the job pool against a skill list. Returns the top recommendations at
/// the default threshold (dropping to 0 if nothing clears it), plus facets
/// derived from the whole scored pool.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let pool = state.job_cache.jobs(state.job_source.as_ref(), false).await?;
    let scorer = state.match_scorer.as_ref();

    // sorted by descending match, so both cuts below are prefixes of it
    let scored = recommend(scorer, &request.skills, &pool, FULL_POOL_TOP_N, 0);
    let facets = available_skills(&scored);

    let mut jobs: Vec<JobPosting> = scored
        .iter()
        .filter(|j| j.match_score >= RECOMMEND_MIN_MATCH)
        .take(RECOMMEND_TOP_N)
        .cloned()
        .collect();
    if jobs.is_empty() {
        info!("No jobs with >= {RECOMMEND_MIN_MATCH}% match, lowering threshold");
        jobs = scored.iter().take(RECOMMEND_TOP_N).cloned().collect();
    }
    info!(
        "Matched {} skills against {} jobs, returning {}",
        request.skills.len(),
        pool.len(),
        jobs.len()
    );

    Ok(Json(MatchResponse {
        total_jobs: jobs.len(),
        available_locations: available_locations(&scored),
        available_skills: display_skills(&facets, state.config.skill_display_cap),
        cache_info: state.job_cache.cache_info_at(Utc::now()).await,
        skills: request.skills,
        jobs,
    }))
}

/// POST /api/v1/jobs/filter
///
/// Server-side twin of the client filter: same predicate, applied to the pool
/// scored against `skills`. Facets and freshness come back with the jobs.
pub async fn handle_filter(
    State(state): State<AppState>,
    Json(request): Json<FilterRequest>,
) -> Result<Json<BoardView>, AppError> {
    let criteria = FilterCriteria {
        location: request.location,
        required_skills: request.skill_filters.into_iter().collect(),
        min_match: request.min_match,
    };
    criteria.validate()?;

    info!(
        "Filtering: location={:?}, skills={:?}, min_match={}",
        criteria.location, criteria.required_skills, criteria.min_match
    );

    let pool = state.job_cache.jobs(state.job_source.as_ref(), false).await?;
    let scored = recommend(
        state.match_scorer.as_ref(),
        &request.skills,
        &pool,
        FULL_POOL_TOP_N,
        0,
    );
    let board = JobBoard::new(scored, state.job_cache.cache_info_at(Utc::now()).await);
    let view = board.view(&criteria, state.config.skill_display_cap)?;

    Ok(Json(view))
}

/// POST /api/v1/jobs/bulk-match
///
/// Summarizes several candidates' skill lists against the same pool.
pub async fn handle_bulk_match(
    State(state): State<AppState>,
    Json(request): Json<BulkMatchRequest>,
) -> Result<Json<BulkMatchResponse>, AppError> {
    if request.candidates.is_empty() {
        return Err(AppError::Validation("No candidates provided".to_string()));
    }

    let pool = state.job_cache.jobs(state.job_source.as_ref(), false).await?;
    let (labels, skill_lists): (Vec<_>, Vec<_>) = request
        .candidates
        .into_iter()
        .map(|c| (c.label, c.skills))
        .unzip();

    let summaries = summarize_candidates(state.match_scorer.as_ref(), &skill_lists, &pool);
    info!(
        "Bulk matched {} candidates against {} jobs",
        summaries.len(),
        pool.len()
    );

    let results: Vec<CandidateResult> = labels
        .into_iter()
        .zip(summaries)
        .map(|(label, summary)| CandidateResult { label, summary })
        .collect();

    Ok(Json(BulkMatchResponse {
        processed: results.len(),
        results,
    }))
}

/// GET /api/v1/jobs/cache-status
pub async fn handle_cache_status(State(state): State<AppState>) -> Json<CacheStatus> {
    Json(state.job_cache.status_at(Utc::now()).await)
}

/// POST /api/v1/jobs/refresh
///
/// Replaces the pool. Any view built on the previous pool is stale and must be
/// recomputed by the caller.
pub async fn handle_refresh(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, AppError> {
    info!("Force refreshing jobs");
    let now = Utc::now();
    let jobs = state
        .job_cache
        .refresh_at(state.job_source.as_ref(), now)
        .await?;

    Ok(Json(RefreshResponse {
        jobs_count: jobs.len(),
        message: format!("Refreshed {} jobs", jobs.len()),
        timestamp: now,
    }))
}

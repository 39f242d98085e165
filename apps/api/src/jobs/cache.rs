//! Server-side job pool cache.
//!
//! The pool is reused while it is younger than the cache window, and replaced
//! wholesale on expiry or on a forced refresh. The freshness decision made here is
//! the one clients see through `CacheInfo`; they never recompute it.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::jobs::source::{dedupe, fallback_catalogue, JobSource};
use crate::models::job::{CacheInfo, SourceJob};

#[derive(Debug, Default)]
struct CachedPool {
    jobs: Vec<SourceJob>,
    fetched_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatus {
    pub cache_age_minutes: i64,
    pub is_fresh: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub jobs_count: usize,
    pub cache_duration_minutes: i64,
}

pub struct JobCache {
    window: Duration,
    max_jobs: usize,
    pool: RwLock<CachedPool>,
}

/// A pool that was never fetched is not fresh.
pub fn is_fresh(fetched_at: Option<DateTime<Utc>>, now: DateTime<Utc>, window: Duration) -> bool {
    fetched_at.is_some_and(|at| now - at < window)
}

fn age_minutes(fetched_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    fetched_at.map_or(0, |at| (now - at).num_minutes().max(0))
}

impl JobCache {
    pub fn new(window: Duration, max_jobs: usize) -> Self {
        Self {
            window,
            max_jobs,
            pool: RwLock::new(CachedPool::default()),
        }
    }

    /// Cached pool if still fresh, otherwise a newly fetched one.
    pub async fn jobs(&self, source: &dyn JobSource, force: bool) -> Result<Vec<SourceJob>, AppError> {
        self.jobs_at(source, force, Utc::now()).await
    }

    pub async fn jobs_at(
        &self,
        source: &dyn JobSource,
        force: bool,
        now: DateTime<Utc>,
    ) -> Result<Vec<SourceJob>, AppError> {
        if !force {
            let pool = self.pool.read().await;
            if !pool.jobs.is_empty() && is_fresh(pool.fetched_at, now, self.window) {
                info!(
                    "Using cached jobs (cached {} min ago)",
                    age_minutes(pool.fetched_at, now)
                );
                return Ok(pool.jobs.clone());
            }
        }
        self.refresh_at(source, now).await
    }

    /// Fetches a new pool and replaces the cached one. An empty or failed fetch
    /// falls back to the built-in catalogue.
    pub async fn refresh_at(
        &self,
        source: &dyn JobSource,
        now: DateTime<Utc>,
    ) -> Result<Vec<SourceJob>, AppError> {
        info!("Fetching fresh jobs from {} source", source.name());

        let fetched = match source.fetch().await {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!("Job source {} failed: {e}", source.name());
                Vec::new()
            }
        };

        let (mut jobs, is_fallback) = if fetched.is_empty() {
            warn!("No jobs fetched, using fallback catalogue");
            (fallback_catalogue(), true)
        } else {
            (fetched, false)
        };

        jobs = dedupe(jobs, self.max_jobs);
        for job in jobs.iter_mut() {
            job.scraped_at = Some(now);
            job.is_fallback = job.is_fallback || is_fallback;
        }
        info!("Cached {} jobs", jobs.len());

        let mut pool = self.pool.write().await;
        pool.jobs = jobs.clone();
        pool.fetched_at = Some(now);
        Ok(jobs)
    }

    pub async fn status_at(&self, now: DateTime<Utc>) -> CacheStatus {
        let pool = self.pool.read().await;
        CacheStatus {
            cache_age_minutes: age_minutes(pool.fetched_at, now),
            is_fresh: is_fresh(pool.fetched_at, now, self.window),
            last_updated: pool.fetched_at,
            jobs_count: pool.jobs.len(),
            cache_duration_minutes: self.window.num_minutes(),
        }
    }

    /// What clients receive alongside the pool. `None` until the first fetch.
    pub async fn cache_info_at(&self, now: DateTime<Utc>) -> Option<CacheInfo> {
        let pool = self.pool.read().await;
        pool.fetched_at.map(|at| CacheInfo {
            is_fresh: is_fresh(Some(at), now, self.window),
            last_updated: at,
            cache_age_minutes: Some(age_minutes(Some(at), now)),
        })
    }
}

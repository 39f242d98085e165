use std::sync::Arc;

use crate::analytics::Canvas;
use crate::config::Config;
use crate::jobs::cache::JobCache;
use crate::jobs::matching::{KeywordMatchScorer, MatchScorer};
use crate::jobs::source::{FallbackJobSource, JobSource};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable match scorer. Default: KeywordMatchScorer.
    pub match_scorer: Arc<dyn MatchScorer>,
    pub job_source: Arc<dyn JobSource>,
    pub job_cache: Arc<JobCache>,
    /// Logical ROC chart area the analytics report is projected onto.
    pub canvas: Canvas,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_source(config, Arc::new(FallbackJobSource))
    }

    pub fn with_source(config: Config, job_source: Arc<dyn JobSource>) -> Self {
        let job_cache = Arc::new(JobCache::new(config.job_cache_window, config.max_pool_jobs));
        Self {
            config,
            match_scorer: Arc::new(KeywordMatchScorer),
            job_source,
            job_cache,
            canvas: Canvas::default(),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::job::CacheInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreshnessLabel {
    Fresh,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freshness {
    pub label: FreshnessLabel,
    pub last_updated: DateTime<Utc>,
}

/// Surfaces the staleness decision the job cache already made.
/// No cache info means no freshness statement at all.
pub fn describe(cache_info: Option<&CacheInfo>) -> Option<Freshness> {
    cache_info.map(|info| Freshness {
        label: if info.is_fresh {
            FreshnessLabel::Fresh
        } else {
            FreshnessLabel::Expired
        },
        last_updated: info.last_updated,
    })
}

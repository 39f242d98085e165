//! Numeric helpers shared by the evaluation engine: fold statistics,
//! max-normalization, and AUC-based model ranking.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::EngineError;
use crate::models::evaluation::{EvaluationBundle, ModelId};

/// Arithmetic mean. Fails on an empty sequence.
pub fn mean(scores: &[f64]) -> Result<f64, EngineError> {
    if scores.is_empty() {
        return Err(EngineError::EmptyInput(
            "cannot take the mean of an empty score list".to_string(),
        ));
    }
    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Population standard deviation around the unrounded mean.
///
/// Rounding is left to the caller so the reference point never carries
/// display truncation into the deviations.
pub fn std_dev(scores: &[f64]) -> Result<f64, EngineError> {
    let mu = mean(scores)?;
    // identical scores must give exactly 0, which the summed mean cannot guarantee
    if scores.iter().all(|x| *x == scores[0]) {
        return Ok(0.0);
    }
    // deviations are scaled by the largest one so tiny spreads do not square to 0
    let scale = scores.iter().map(|x| (x - mu).abs()).fold(0.0_f64, f64::max);
    if scale == 0.0 {
        return Ok(0.0);
    }
    let variance = scores
        .iter()
        .map(|x| ((x - mu) / scale).powi(2))
        .sum::<f64>()
        / scores.len() as f64;
    Ok(variance.sqrt() * scale)
}

/// Scales every value by the maximum. A zero (or absent) maximum yields all zeros.
pub fn normalize_by_max(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / max).collect()
}

/// Rounds to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// A `[0, 1]` ratio as a percentage with one decimal, e.g. `0.8734 → 87.3`.
pub fn to_percent(ratio: f64) -> f64 {
    round_to(ratio * 100.0, 1)
}

/// Model ids sorted by descending AUC. Ties keep `ModelId::ALL` order.
pub fn rank_by_auc(bundle: &EvaluationBundle) -> Result<Vec<ModelId>, EngineError> {
    let mut scored = ModelId::ALL
        .into_iter()
        .map(|id| bundle.model(id).map(|m| (id, m.auc_score)))
        .collect::<Result<Vec<_>, _>>()?;

    // sort_by is stable, so equal AUCs stay in declaration order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(scored.into_iter().map(|(id, _)| id).collect())
}

/// The model with the highest AUC.
pub fn auc_leader(bundle: &EvaluationBundle) -> Result<ModelId, EngineError> {
    rank_by_auc(bundle)?
        .first()
        .copied()
        .ok_or_else(|| EngineError::MalformedBundle("bundle has no models".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Best-model policy
// ────────────────────────────────────────────────────────────────────────────

/// How the "best model" badge is chosen.
///
/// The legacy results page always named Random Forest regardless of the data,
/// so `Fixed(RandomForest)` stays the default. `AucArgmax` picks from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "model", rename_all = "snake_case")]
pub enum BestModelPolicy {
    AucArgmax,
    Fixed(ModelId),
}

impl Default for BestModelPolicy {
    fn default() -> Self {
        BestModelPolicy::Fixed(ModelId::RandomForest)
    }
}

impl BestModelPolicy {
    /// Parses `auc` or a model key such as `random_forest`.
    pub fn parse(raw: &str) -> Option<BestModelPolicy> {
        match raw.trim().to_lowercase().as_str() {
            "auc" | "auc_argmax" => Some(BestModelPolicy::AucArgmax),
            other => ModelId::from_key(other).map(BestModelPolicy::Fixed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestModelVerdict {
    pub selected: ModelId,
    pub display_name: String,
    pub policy: BestModelPolicy,
    /// The data-driven choice, reported even when the policy overrides it.
    pub auc_leader: ModelId,
    pub agrees_with_auc: bool,
}

pub fn best_model(
    bundle: &EvaluationBundle,
    policy: BestModelPolicy,
) -> Result<BestModelVerdict, EngineError> {
    let leader = auc_leader(bundle)?;
    let selected = match policy {
        BestModelPolicy::AucArgmax => leader,
        BestModelPolicy::Fixed(id) => {
            bundle.model(id)?;
            id
        }
    };

    let agrees_with_auc = selected == leader;
    if !agrees_with_auc {
        warn!("Best-model policy selects {selected} but {leader} has the highest AUC");
    }

    Ok(BestModelVerdict {
        selected,
        display_name: selected.display_name().to_string(),
        policy,
        auc_leader: leader,
        agrees_with_auc,
    })
}

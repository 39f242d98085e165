//! Model-evaluation engine — derives every analytics panel from one `EvaluationBundle`.
//!
//! Pure: the report is a function of the bundle, the best-model policy and the
//! canvas. Nothing is cached between calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analytics::roc::{self, Canvas, PlotPoint};
use crate::analytics::stats::{self, round_to, to_percent, BestModelPolicy, BestModelVerdict};
use crate::errors::EngineError;
use crate::models::evaluation::{ConfusionMatrix, EvaluationBundle, ModelId, Support};

/// Fold count the evaluation service is expected to produce.
pub const EXPECTED_FOLDS: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Report types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparedMetric {
    Accuracy,
    Precision,
    Recall,
    F1Score,
}

impl ComparedMetric {
    pub const ALL: [ComparedMetric; 4] = [
        ComparedMetric::Accuracy,
        ComparedMetric::Precision,
        ComparedMetric::Recall,
        ComparedMetric::F1Score,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ComparedMetric::Accuracy => "Accuracy",
            ComparedMetric::Precision => "Precision",
            ComparedMetric::Recall => "Recall",
            ComparedMetric::F1Score => "F1 Score",
        }
    }
}

/// Metric card for one classifier. Percentages carry one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model: ModelId,
    pub display_name: String,
    pub accuracy_pct: f64,
    pub precision_pct: f64,
    pub recall_pct: f64,
    pub f1_score_pct: f64,
    pub auc_pct: f64,
    /// AUC to three decimals, as shown in the ROC legend.
    pub auc: f64,
    pub confusion_matrix: ConfusionMatrix,
    pub support: Support,
    pub support_total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocPath {
    pub model: ModelId,
    pub points: Vec<PlotPoint>,
    pub path_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRatio {
    pub feature: String,
    pub importance: f64,
    /// `importance / max(importance)`, 0 when every weight is 0.
    pub ratio: f64,
    pub importance_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldSummary {
    pub model: ModelId,
    pub fold_pct: Vec<f64>,
    pub mean: f64,
    pub std_dev: f64,
    pub mean_pct: f64,
    pub std_dev_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub models: Vec<ModelSummary>,
    pub roc_paths: Vec<RocPath>,
    pub roc_diagonal: [PlotPoint; 2],
    pub feature_importance: Vec<FeatureRatio>,
    pub cross_validation: Vec<FoldSummary>,
    /// metric → model → percentage
    pub comparison: BTreeMap<ComparedMetric, BTreeMap<ModelId, f64>>,
    pub auc_ranking: Vec<ModelId>,
    pub best_model: BestModelVerdict,
}

/// Everything the report holds for a single model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBreakdown {
    pub summary: ModelSummary,
    pub roc_path: RocPath,
    pub folds: FoldSummary,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

/// Builds the full analytics report. Any malformed model fails the whole call;
/// use [`evaluate_model`] per model to assemble a partial view instead.
pub fn evaluate(
    bundle: &EvaluationBundle,
    policy: BestModelPolicy,
    canvas: &Canvas,
) -> Result<EvaluationReport, EngineError> {
    let mut models = Vec::with_capacity(ModelId::ALL.len());
    let mut roc_paths = Vec::with_capacity(ModelId::ALL.len());
    let mut cross_validation = Vec::with_capacity(ModelId::ALL.len());

    for id in ModelId::ALL {
        let breakdown = evaluate_model(bundle, id, canvas)?;
        models.push(breakdown.summary);
        roc_paths.push(breakdown.roc_path);
        cross_validation.push(breakdown.folds);
    }

    let comparison = compare_metrics(bundle)?;
    let auc_ranking = stats::rank_by_auc(bundle)?;
    let best_model = stats::best_model(bundle, policy)?;

    debug!(
        "Evaluated {} models; AUC leader {}, best model {}",
        models.len(),
        best_model.auc_leader,
        best_model.selected
    );

    Ok(EvaluationReport {
        models,
        roc_paths,
        roc_diagonal: roc::diagonal(canvas),
        feature_importance: feature_ratios(bundle),
        cross_validation,
        comparison,
        auc_ranking,
        best_model,
    })
}

/// Evaluates one model in isolation.
pub fn evaluate_model(
    bundle: &EvaluationBundle,
    id: ModelId,
    canvas: &Canvas,
) -> Result<ModelBreakdown, EngineError> {
    let summary = summarize(bundle, id)?;

    let points = roc::project(&bundle.model(id)?.roc_curve, canvas).map_err(|e| match e {
        EngineError::MalformedBundle(msg) => EngineError::MalformedBundle(format!("{id}: {msg}")),
        other => other,
    })?;
    let roc_path = RocPath {
        model: id,
        path_data: roc::path_data(&points),
        points,
    };

    let folds = fold_summary(bundle, id)?;

    Ok(ModelBreakdown {
        summary,
        roc_path,
        folds,
    })
}

fn summarize(bundle: &EvaluationBundle, id: ModelId) -> Result<ModelSummary, EngineError> {
    let m = bundle.model(id)?;

    let support_total = m.support.total()?;
    let matrix_total = m.matrix_total()?;
    if support_total != matrix_total {
        return Err(EngineError::MalformedBundle(format!(
            "{id}: support totals {support_total} but confusion matrix totals {matrix_total}"
        )));
    }

    Ok(ModelSummary {
        model: id,
        display_name: id.display_name().to_string(),
        accuracy_pct: to_percent(m.accuracy),
        precision_pct: to_percent(m.precision),
        recall_pct: to_percent(m.recall),
        f1_score_pct: to_percent(m.f1_score),
        auc_pct: to_percent(m.auc_score),
        auc: round_to(m.auc_score, 3),
        confusion_matrix: m.confusion_matrix,
        support: m.support,
        support_total,
    })
}

fn fold_summary(bundle: &EvaluationBundle, id: ModelId) -> Result<FoldSummary, EngineError> {
    let scores = bundle.fold_scores(id)?;
    if scores.is_empty() {
        return Err(EngineError::EmptyInput(format!(
            "cross-validation scores for '{id}' are empty"
        )));
    }
    if scores.len() != EXPECTED_FOLDS {
        warn!(
            "{id} reports {} cross-validation folds, expected {EXPECTED_FOLDS}",
            scores.len()
        );
    }

    let mean = stats::mean(scores)?;
    let std_dev = stats::std_dev(scores)?;

    Ok(FoldSummary {
        model: id,
        fold_pct: scores.iter().copied().map(to_percent).collect(),
        mean,
        std_dev,
        mean_pct: to_percent(mean),
        std_dev_pct: to_percent(std_dev),
    })
}

fn feature_ratios(bundle: &EvaluationBundle) -> Vec<FeatureRatio> {
    let weights: Vec<f64> = bundle
        .feature_importance
        .iter()
        .map(|f| f.importance)
        .collect();
    let ratios = stats::normalize_by_max(&weights);

    bundle
        .feature_importance
        .iter()
        .zip(ratios)
        .map(|(f, ratio)| FeatureRatio {
            feature: f.feature.clone(),
            importance: f.importance,
            ratio,
            importance_pct: to_percent(f.importance),
        })
        .collect()
}

fn compare_metrics(
    bundle: &EvaluationBundle,
) -> Result<BTreeMap<ComparedMetric, BTreeMap<ModelId, f64>>, EngineError> {
    let mut table: BTreeMap<ComparedMetric, BTreeMap<ModelId, f64>> = BTreeMap::new();
    for id in ModelId::ALL {
        let m = bundle.model(id)?;
        for metric in ComparedMetric::ALL {
            let value = match metric {
                ComparedMetric::Accuracy => m.accuracy,
                ComparedMetric::Precision => m.precision,
                ComparedMetric::Recall => m.recall,
                ComparedMetric::F1Score => m.f1_score,
            };
            table.entry(metric).or_default().insert(id, to_percent(value));
        }
    }
    Ok(table)
}

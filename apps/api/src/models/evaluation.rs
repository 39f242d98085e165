use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// The closed set of classifiers the evaluation service reports on.
/// Declaration order is the canonical order used to break ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelId {
    DecisionTree,
    LogisticRegression,
    RandomForest,
}

impl ModelId {
    pub const ALL: [ModelId; 3] = [
        ModelId::DecisionTree,
        ModelId::LogisticRegression,
        ModelId::RandomForest,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ModelId::DecisionTree => "decision_tree",
            ModelId::LogisticRegression => "logistic_regression",
            ModelId::RandomForest => "random_forest",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelId::DecisionTree => "Decision Tree",
            ModelId::LogisticRegression => "Logistic Regression",
            ModelId::RandomForest => "Random Forest",
        }
    }

    pub fn from_key(key: &str) -> Option<ModelId> {
        ModelId::ALL.into_iter().find(|m| m.key() == key)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-class counts of the held-out set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    pub rejected: u64,
    pub accepted: u64,
}

impl Support {
    /// Sum of both classes. Counts arrive from the wire, so overflow is a
    /// malformed bundle rather than a panic.
    pub fn total(&self) -> Result<u64, EngineError> {
        self.rejected.checked_add(self.accepted).ok_or_else(|| {
            EngineError::MalformedBundle("support counts overflow u64".to_string())
        })
    }
}

/// Rows are the actual class, columns the predicted class,
/// both ordered `[rejected, accepted]`.
pub type ConfusionMatrix = [[u64; 2]; 2];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    /// Expected non-decreasing; the projector draws whatever order it is given.
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
}

/// Everything the evaluation service reports for one classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEvaluation {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub auc_score: f64,
    pub confusion_matrix: ConfusionMatrix,
    pub support: Support,
    #[serde(default)]
    pub roc_curve: RocCurve,
}

impl ModelEvaluation {
    pub fn matrix_total(&self) -> Result<u64, EngineError> {
        self.confusion_matrix
            .iter()
            .flatten()
            .try_fold(0u64, |acc, cell| acc.checked_add(*cell))
            .ok_or_else(|| {
                EngineError::MalformedBundle("confusion matrix counts overflow u64".to_string())
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// One analysis session's worth of evaluation results. Immutable once delivered.
///
/// Model entries are optional on the wire so that a payload missing a model
/// still deserializes; `model()` turns the absence into `MalformedBundle`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_tree: Option<ModelEvaluation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logistic_regression: Option<ModelEvaluation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_forest: Option<ModelEvaluation>,
    #[serde(default)]
    pub feature_importance: Vec<FeatureImportance>,
    #[serde(default)]
    pub cross_validation: BTreeMap<ModelId, Vec<f64>>,
}

impl EvaluationBundle {
    pub fn model(&self, id: ModelId) -> Result<&ModelEvaluation, EngineError> {
        let slot = match id {
            ModelId::DecisionTree => &self.decision_tree,
            ModelId::LogisticRegression => &self.logistic_regression,
            ModelId::RandomForest => &self.random_forest,
        };
        slot.as_ref()
            .ok_or_else(|| EngineError::MalformedBundle(format!("model '{id}' is missing")))
    }

    pub fn set_model(&mut self, id: ModelId, evaluation: ModelEvaluation) {
        let slot = match id {
            ModelId::DecisionTree => &mut self.decision_tree,
            ModelId::LogisticRegression => &mut self.logistic_regression,
            ModelId::RandomForest => &mut self.random_forest,
        };
        *slot = Some(evaluation);
    }

    pub fn fold_scores(&self, id: ModelId) -> Result<&[f64], EngineError> {
        self.cross_validation
            .get(&id)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                EngineError::MalformedBundle(format!("cross-validation scores for '{id}' are missing"))
            })
    }
}

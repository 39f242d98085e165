// Model-evaluation analytics: fold statistics, ROC projection, AUC ranking
// and the best-model verdict. Everything here is pure and synchronous.

pub mod engine;
pub mod handlers;
pub mod roc;
pub mod stats;

pub use engine::{evaluate, evaluate_model, EvaluationReport};
pub use roc::Canvas;
pub use stats::BestModelPolicy;

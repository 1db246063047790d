// src/lib.rs

//! `explain_my_model` is a lightweight, model-agnostic explainer for tabular
//! models. It binds an external SHAP engine to a trained model and its training
//! data, and turns the engine's raw attributions into ranked feature importances,
//! per-instance explanations, short text summaries and naive counterfactuals.
//!
//! ```ignore
//! let frame = TrainingFrame::new(["age", "income", "tenure"], data)?;
//! let explainer = Explainer::new(&model, &frame, |m: &MyModel, bg: &TrainingFrame| {
//!     MyShapEngine::new(m, bg.data())
//! })?;
//!
//! println!("{}", explainer.global_feature_importance(Some(5))?);
//! println!("{}", explainer.explain_instance_text(vec![42.0, 3100.0, 2.0], None)?);
//! if let Some(cf) = explainer.counterfactual(vec![42.0, 3100.0, 2.0], None, None)? {
//!     println!("{}", cf);
//! }
//! ```

pub mod algorithms;
pub mod core;
pub mod explainer;
pub mod report;
pub mod traits;
pub mod utils;

// Re-export key components for easier use by library consumers
pub use crate::core::{
    Counterfactual, Dataset, Direction, EngineOutput, ExplainError, FeatureContribution,
    FeatureImportance, ImportanceTable, Instance, InstanceExplanation, Result, Row,
    TrainingFrame,
};
pub use crate::explainer::{Explainer, ExplainerBuilder, ExplainerConfig};
pub use crate::traits::{EngineFactory, ExplanationEngine, PredictModel};

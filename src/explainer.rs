// src/explainer.rs
use crate::algorithms::counterfactual::{predict_one, CounterfactualSearch};
use crate::algorithms::normalize::{normalize_contributions, normalize_single};
use crate::algorithms::ranking::{mean_absolute, rank_contributions, rank_importances};
use crate::core::{
    Counterfactual, ExplainError, ImportanceTable, InstanceExplanation, Result, Row, TrainingFrame,
};
use crate::report::{render_summary, DEFAULT_SUMMARY_HEADER};
use crate::traits::{EngineFactory, ExplanationEngine, PredictModel};
use crate::utils::is_positive_finite;
use serde::{Deserialize, Serialize};

/// Defaults used when an operation is called without explicit parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainerConfig {
    /// Rows kept by `global_feature_importance`.
    pub max_display: usize,
    /// Lines rendered by `explain_instance_text`.
    pub top_k: usize,
    /// Perturbation size for `counterfactual`.
    pub step: f64,
    /// Outer iterations for `counterfactual`.
    pub max_iter: usize,
    /// Class slice taken from engines that report one set of values per class.
    /// The default of 1 is the positive class of a binary classifier.
    pub target_class: usize,
    pub summary_header: String,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        ExplainerConfig {
            max_display: 10,
            top_k: 5,
            step: 0.1,
            max_iter: 50,
            target_class: 1,
            summary_header: DEFAULT_SUMMARY_HEADER.to_string(),
        }
    }
}

impl ExplainerConfig {
    pub fn with_max_display(mut self, max_display: usize) -> Self {
        self.max_display = max_display;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_target_class(mut self, target_class: usize) -> Self {
        self.target_class = target_class;
        self
    }

    pub fn with_summary_header(mut self, header: impl Into<String>) -> Self {
        self.summary_header = header.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_display == 0 {
            return Err(ExplainError::invalid("max_display must be at least 1."));
        }
        if !is_positive_finite(self.step) {
            return Err(ExplainError::invalid(format!(
                "step must be a positive finite number, got {}.",
                self.step
            )));
        }
        if self.max_iter == 0 {
            return Err(ExplainError::invalid("max_iter must be at least 1."));
        }
        Ok(())
    }
}

/// Collects the explainer's inputs. Missing inputs are reported by [`build`].
///
/// [`build`]: ExplainerBuilder::build
pub struct ExplainerBuilder<'a, M: ?Sized, F> {
    model: Option<&'a M>,
    frame: Option<&'a TrainingFrame>,
    factory: F,
    config: Option<ExplainerConfig>,
}

impl<'a, M, F> ExplainerBuilder<'a, M, F>
where
    M: PredictModel + ?Sized,
    F: EngineFactory<M>,
{
    pub fn new(factory: F) -> Self {
        ExplainerBuilder {
            model: None,
            frame: None,
            factory,
            config: None,
        }
    }

    pub fn model(mut self, model: &'a M) -> Self {
        self.model = Some(model);
        self
    }

    pub fn training_frame(mut self, frame: &'a TrainingFrame) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn config(mut self, config: ExplainerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<Explainer<'a, M, F::Engine>> {
        let model = self
            .model
            .ok_or_else(|| ExplainError::invalid("A model is required."))?;
        let frame = self
            .frame
            .ok_or_else(|| ExplainError::invalid("A training frame is required."))?;
        if frame.is_empty() {
            return Err(ExplainError::invalid(format!(
                "Training frame cannot be empty (got {} rows x {} features).",
                frame.n_rows(),
                frame.n_features()
            )));
        }

        let config = self.config.unwrap_or_default();
        config.validate()?;

        let engine = self.factory.build(model, frame).map_err(|e| match e {
            ExplainError::EngineInitialization(_) => e,
            other => ExplainError::EngineInitialization(other.to_string()),
        })?;

        log::debug!(
            "explainer bound to {} features over {} background rows",
            frame.n_features(),
            frame.n_rows()
        );

        Ok(Explainer {
            model,
            frame,
            engine,
            config,
        })
    }
}

/// SHAP-backed explanations for a pre-trained tabular model.
///
/// The model and training frame are borrowed for the explainer's lifetime and
/// never modified. The training frame's column order is the feature order of
/// every result.
pub struct Explainer<'a, M: ?Sized, E> {
    model: &'a M,
    frame: &'a TrainingFrame,
    engine: E,
    config: ExplainerConfig,
}

impl<'a, M, E> Explainer<'a, M, E>
where
    M: PredictModel + ?Sized,
    E: ExplanationEngine,
{
    /// Binds an engine built by `factory` to `model` and `frame` with the
    /// default configuration.
    pub fn new<F>(model: &'a M, frame: &'a TrainingFrame, factory: F) -> Result<Self>
    where
        F: EngineFactory<M, Engine = E>,
    {
        ExplainerBuilder::new(factory)
            .model(model)
            .training_frame(frame)
            .build()
    }

    pub fn builder<F>(factory: F) -> ExplainerBuilder<'a, M, F>
    where
        F: EngineFactory<M, Engine = E>,
    {
        ExplainerBuilder::new(factory)
    }

    pub fn feature_names(&self) -> &[String] {
        self.frame.columns()
    }

    pub fn n_features(&self) -> usize {
        self.frame.n_features()
    }

    pub fn training_frame(&self) -> &TrainingFrame {
        self.frame
    }

    pub fn config(&self) -> &ExplainerConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mean absolute contribution per feature over the whole training frame,
    /// largest first, at most `max_display` rows.
    pub fn global_feature_importance(&self, max_display: Option<usize>) -> Result<ImportanceTable> {
        let max_display = max_display.unwrap_or(self.config.max_display);
        if max_display == 0 {
            return Err(ExplainError::invalid("max_display must be at least 1."));
        }

        let raw = self.engine.explain(self.frame.data())?.into_values();
        let contributions =
            normalize_contributions(raw, self.n_features(), self.config.target_class)?;
        if contributions.nrows() != self.frame.n_rows() {
            return Err(ExplainError::engine_output(format!(
                "Engine explained {} rows, but the training frame has {}.",
                contributions.nrows(),
                self.frame.n_rows()
            )));
        }

        let scores = mean_absolute(contributions.view())?;
        let table = rank_importances(self.feature_names(), scores.view(), max_display)?;
        log::debug!(
            "global importance over {} rows: top feature {:?}",
            self.frame.n_rows(),
            table.rows.first().map(|r| r.feature.as_str())
        );
        Ok(table)
    }

    /// Per-feature contributions for one instance, largest first.
    pub fn explain_instance(&self, instance: impl Into<Row>) -> Result<InstanceExplanation> {
        let aligned = self.frame.align(&instance.into())?;
        let batch = self.frame.single_row(&aligned)?;

        let raw = self.engine.explain(batch.view())?.into_values();
        let contributions = normalize_single(raw, self.n_features(), self.config.target_class)?;
        rank_contributions(self.feature_names(), aligned.view(), contributions.view())
    }

    /// Plain-text summary of the `top_k` strongest contributions.
    pub fn explain_instance_text(
        &self,
        instance: impl Into<Row>,
        top_k: Option<usize>,
    ) -> Result<String> {
        let top_k = top_k.unwrap_or(self.config.top_k);
        let explanation = self.explain_instance(instance)?;
        Ok(render_summary(&explanation, top_k, &self.config.summary_header))
    }

    /// Searches for a nearby instance with a different predicted label.
    /// `Ok(None)` means the search budget ran out.
    pub fn counterfactual(
        &self,
        instance: impl Into<Row>,
        step: Option<f64>,
        max_iter: Option<usize>,
    ) -> Result<Option<Counterfactual>> {
        let search = CounterfactualSearch::new(
            step.unwrap_or(self.config.step),
            max_iter.unwrap_or(self.config.max_iter),
        )?;
        let aligned = self.frame.align(&instance.into())?;
        search.run(self.model, self.feature_names(), &aligned)
    }

    /// The model's output for one instance.
    pub fn predict(&self, instance: impl Into<Row>) -> Result<f64> {
        let aligned = self.frame.align(&instance.into())?;
        predict_one(self.model, aligned.view())
    }
}

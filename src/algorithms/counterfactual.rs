// src/algorithms/counterfactual.rs
use crate::core::{Counterfactual, Dataset, Direction, ExplainError, Instance, Result};
use crate::traits::PredictModel;
use crate::utils::is_positive_finite;
use ndarray::{ArrayView1, Axis};

/// Greedy coordinate-wise search for a nearby instance with a different label.
///
/// Each outer iteration walks the features in canonical order. A feature is first
/// moved down by `step`, then up by `2 * step` from there (a net `+step`), and is
/// put back to its original value if neither move flips the label. The first flip
/// found is returned. This is a heuristic: the result is neither minimal nor
/// guaranteed to exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterfactualSearch {
    step: f64,
    max_iter: usize,
}

impl CounterfactualSearch {
    pub fn new(step: f64, max_iter: usize) -> Result<Self> {
        if !is_positive_finite(step) {
            return Err(ExplainError::invalid(format!(
                "step must be a positive finite number, got {}.",
                step
            )));
        }
        if max_iter == 0 {
            return Err(ExplainError::invalid("max_iter must be at least 1."));
        }
        Ok(CounterfactualSearch { step, max_iter })
    }

    /// Runs the search. `instance` must already be in canonical column order.
    ///
    /// Both candidate moves for a feature are scored in one two-row `predict`
    /// call, so the model sees at most `1 + max_iter * n_features` calls.
    pub fn run<M: PredictModel + ?Sized>(
        &self,
        model: &M,
        feature_names: &[String],
        instance: &Instance,
    ) -> Result<Option<Counterfactual>> {
        let n_features = instance.len();
        if feature_names.len() != n_features {
            return Err(ExplainError::invalid(format!(
                "Instance has {} values but {} feature names were given.",
                n_features,
                feature_names.len()
            )));
        }

        let original_label = predict_one(model, instance.view())?;
        log::debug!(
            "counterfactual search: label={}, step={}, max_iter={}, features={}",
            original_label,
            self.step,
            self.max_iter,
            n_features
        );

        // Row 0 holds the decreased candidate, row 1 the increased one. Both start
        // from the untouched snapshot for every feature.
        let mut candidates = Dataset::zeros((2, n_features));
        for iteration in 0..self.max_iter {
            for feature in 0..n_features {
                let original_value = instance[feature];
                let decreased = original_value - self.step;
                let increased = decreased + 2.0 * self.step;

                for mut row in candidates.axis_iter_mut(Axis(0)) {
                    row.assign(instance);
                }
                candidates[[0, feature]] = decreased;
                candidates[[1, feature]] = increased;

                let labels = model.predict(candidates.view())?;
                if labels.len() != 2 {
                    return Err(ExplainError::ModelPrediction(format!(
                        "Model returned {} outputs for 2 rows.",
                        labels.len()
                    )));
                }

                for (slot, direction) in [(0, Direction::Decrease), (1, Direction::Increase)] {
                    if label_changed(original_label, labels[slot]) {
                        log::debug!(
                            "counterfactual found at iteration {}: {:?} '{}' -> label {}",
                            iteration,
                            direction,
                            feature_names[feature],
                            labels[slot]
                        );
                        return Ok(Some(Counterfactual {
                            feature_names: feature_names.to_vec(),
                            values: candidates.row(slot).to_owned(),
                            original_label,
                            counterfactual_label: labels[slot],
                            feature: feature_names[feature].clone(),
                            direction,
                            iteration,
                        }));
                    }
                }
            }
            log::trace!("counterfactual iteration {} exhausted all features", iteration);
        }

        log::debug!(
            "no counterfactual within {} iterations of step {}",
            self.max_iter,
            self.step
        );
        Ok(None)
    }
}

/// Predicts a single row and insists on exactly one output.
pub(crate) fn predict_one<M: PredictModel + ?Sized>(model: &M, row: ArrayView1<'_, f64>) -> Result<f64> {
    let outputs = model.predict(row.insert_axis(Axis(0)))?;
    match outputs.len() {
        1 => Ok(outputs[0]),
        n => Err(ExplainError::ModelPrediction(format!(
            "Model returned {} outputs for a single row.",
            n
        ))),
    }
}

fn label_changed(original: f64, candidate: f64) -> bool {
    !(original == candidate || (original.is_nan() && candidate.is_nan()))
}

// src/algorithms/ranking.rs
use crate::core::{
    ExplainError, FeatureContribution, FeatureImportance, ImportanceTable, InstanceExplanation,
    Result,
};
use crate::utils::{descending, is_non_negative_finite};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

/// Mean of the absolute contribution per feature (column).
pub fn mean_absolute(contributions: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
    contributions
        .mapv(f64::abs)
        .mean_axis(Axis(0))
        .ok_or_else(|| ExplainError::engine_output("Cannot aggregate contributions over zero rows."))
}

/// Pairs scores with feature names, sorts largest first and keeps `max_display`.
pub fn rank_importances(
    feature_names: &[String],
    scores: ArrayView1<'_, f64>,
    max_display: usize,
) -> Result<ImportanceTable> {
    if scores.len() != feature_names.len() {
        return Err(ExplainError::engine_output(format!(
            "Aggregated importance has {} values for {} features.",
            scores.len(),
            feature_names.len()
        )));
    }

    if let Some((name, score)) = feature_names
        .iter()
        .zip(scores.iter())
        .find(|(_, s)| !is_non_negative_finite(**s))
    {
        return Err(ExplainError::engine_output(format!(
            "Importance for feature '{}' is {}; expected a finite, non-negative value.",
            name, score
        )));
    }

    let mut rows: Vec<FeatureImportance> = feature_names
        .iter()
        .zip(scores.iter())
        .map(|(name, &importance)| FeatureImportance {
            feature: name.clone(),
            importance,
        })
        .collect();
    // sort_by is stable, so equal scores keep column order
    rows.sort_by(|a, b| descending(a.importance, b.importance));
    rows.truncate(max_display);

    Ok(ImportanceTable { rows })
}

/// Builds a per-instance explanation sorted by contribution, largest first.
pub fn rank_contributions(
    feature_names: &[String],
    values: ArrayView1<'_, f64>,
    contributions: ArrayView1<'_, f64>,
) -> Result<InstanceExplanation> {
    if contributions.len() != feature_names.len() || values.len() != feature_names.len() {
        return Err(ExplainError::engine_output(format!(
            "Got {} contributions and {} values for {} features.",
            contributions.len(),
            values.len(),
            feature_names.len()
        )));
    }

    let mut entries: Vec<FeatureContribution> = feature_names
        .iter()
        .zip(values.iter().zip(contributions.iter()))
        .map(|(name, (&value, &contribution))| FeatureContribution {
            feature: name.clone(),
            value,
            contribution,
        })
        .collect();
    entries.sort_by(|a, b| descending(a.contribution, b.contribution));

    Ok(InstanceExplanation {
        contributions: entries,
    })
}

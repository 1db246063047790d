// src/core/data.rs
use ndarray::{Array1, Array2, Array3, ArrayD, ArrayView1};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A single data instance (a row of features) in canonical column order.
pub type Instance = Array1<f64>;

/// Multiple instances, e.g. the background data or a one-row batch.
pub type Dataset = Array2<f64>;

/// A caller-supplied instance, before it is aligned to the frame's columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// Values already in canonical column order.
    Positional(Vec<f64>),
    /// Values keyed by feature name.
    Named(HashMap<String, f64>),
}

impl From<Vec<f64>> for Row {
    fn from(values: Vec<f64>) -> Self {
        Row::Positional(values)
    }
}

impl From<&[f64]> for Row {
    fn from(values: &[f64]) -> Self {
        Row::Positional(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Row {
    fn from(values: [f64; N]) -> Self {
        Row::Positional(values.to_vec())
    }
}

impl From<Instance> for Row {
    fn from(values: Instance) -> Self {
        Row::Positional(values.to_vec())
    }
}

impl From<&Instance> for Row {
    fn from(values: &Instance) -> Self {
        Row::Positional(values.to_vec())
    }
}

impl From<ArrayView1<'_, f64>> for Row {
    fn from(values: ArrayView1<'_, f64>) -> Self {
        Row::Positional(values.to_vec())
    }
}

impl From<HashMap<String, f64>> for Row {
    fn from(values: HashMap<String, f64>) -> Self {
        Row::Named(values)
    }
}

impl From<BTreeMap<String, f64>> for Row {
    fn from(values: BTreeMap<String, f64>) -> Self {
        Row::Named(values.into_iter().collect())
    }
}

impl From<&Row> for Row {
    fn from(row: &Row) -> Self {
        row.clone()
    }
}

/// Raw result of an explanation engine call.
///
/// Engines either hand back a bare array or an explanation object that nests
/// the attribution array under `values`. The array layout is one of
/// `(features,)`, `(samples, features)`, `(samples, features, classes)` or
/// `(samples, classes, features)`.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutput {
    Values(ArrayD<f64>),
    Explanation {
        values: ArrayD<f64>,
        base_values: Option<ArrayD<f64>>,
    },
}

impl EngineOutput {
    /// Unwraps the nested `values` array if there is one.
    pub fn into_values(self) -> ArrayD<f64> {
        match self {
            EngineOutput::Values(values) => values,
            EngineOutput::Explanation { values, .. } => values,
        }
    }
}

impl From<ArrayD<f64>> for EngineOutput {
    fn from(values: ArrayD<f64>) -> Self {
        EngineOutput::Values(values)
    }
}

impl From<Array1<f64>> for EngineOutput {
    fn from(values: Array1<f64>) -> Self {
        EngineOutput::Values(values.into_dyn())
    }
}

impl From<Array2<f64>> for EngineOutput {
    fn from(values: Array2<f64>) -> Self {
        EngineOutput::Values(values.into_dyn())
    }
}

impl From<Array3<f64>> for EngineOutput {
    fn from(values: Array3<f64>) -> Self {
        EngineOutput::Values(values.into_dyn())
    }
}

/// One row of an [`ImportanceTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    /// Mean absolute contribution over the background rows.
    pub importance: f64,
}

/// Features ranked by importance, most important first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportanceTable {
    pub rows: Vec<FeatureImportance>,
}

impl ImportanceTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureImportance> {
        self.rows.iter()
    }

    pub fn features(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.feature.as_str()).collect()
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.rows.iter().find(|r| r.feature == feature).map(|r| r.importance)
    }
}

impl<'a> IntoIterator for &'a ImportanceTable {
    type Item = &'a FeatureImportance;
    type IntoIter = std::slice::Iter<'a, FeatureImportance>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for ImportanceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.rows.iter().map(|r| r.feature.len()).max().unwrap_or(0).max(7);
        writeln!(f, "{:<width$}  {:>10}", "Feature", "Importance", width = width)?;
        for row in &self.rows {
            writeln!(f, "{:<width$}  {:>10.4}", row.feature, row.importance, width = width)?;
        }
        Ok(())
    }
}

/// Contribution of one feature to one instance's prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    /// The instance's value for this feature.
    pub value: f64,
    /// SHAP value reported by the engine.
    pub contribution: f64,
}

/// Per-feature contributions for a single instance, sorted by contribution
/// (largest first, ties kept in column order).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceExplanation {
    pub contributions: Vec<FeatureContribution>,
}

impl InstanceExplanation {
    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureContribution> {
        self.contributions.iter()
    }

    pub fn top(&self, k: usize) -> &[FeatureContribution] {
        &self.contributions[..k.min(self.contributions.len())]
    }

    /// Sum of all contributions, i.e. the prediction's offset from the baseline.
    pub fn total(&self) -> f64 {
        self.contributions.iter().map(|c| c.contribution).sum()
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.contributions
            .iter()
            .find(|c| c.feature == feature)
            .map(|c| c.contribution)
    }
}

impl<'a> IntoIterator for &'a InstanceExplanation {
    type Item = &'a FeatureContribution;
    type IntoIter = std::slice::Iter<'a, FeatureContribution>;

    fn into_iter(self) -> Self::IntoIter {
        self.contributions.iter()
    }
}

impl fmt::Display for InstanceExplanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Instance Explanation:")?;
        for c in &self.contributions {
            writeln!(f, "  {}: {:+.4} (value {:.4})", c.feature, c.contribution, c.value)?;
        }
        Ok(())
    }
}

/// Which way the counterfactual search moved a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Decrease,
    Increase,
}

/// A perturbed instance whose predicted label differs from the original's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counterfactual {
    /// Feature names in canonical order.
    pub feature_names: Vec<String>,
    /// Perturbed values, aligned with `feature_names`.
    pub values: Instance,
    pub original_label: f64,
    pub counterfactual_label: f64,
    /// The feature that was moved.
    pub feature: String,
    pub direction: Direction,
    /// Zero-based outer iteration of the search that found it.
    pub iteration: usize,
}

impl Counterfactual {
    pub fn get(&self, feature: &str) -> Option<f64> {
        self.feature_names
            .iter()
            .position(|n| n == feature)
            .map(|idx| self.values[idx])
    }

    /// The perturbed instance as a feature name → value mapping.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.feature_names
            .iter()
            .cloned()
            .zip(self.values.iter().copied())
            .collect()
    }
}

impl fmt::Display for Counterfactual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Counterfactual:")?;
        writeln!(
            f,
            "  {:?} '{}' flips the label {} -> {}",
            self.direction, self.feature, self.original_label, self.counterfactual_label
        )?;
        for (name, value) in self.feature_names.iter().zip(self.values.iter()) {
            writeln!(f, "    {}: {:.4}", name, value)?;
        }
        Ok(())
    }
}

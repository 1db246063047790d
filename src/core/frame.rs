// src/core/frame.rs
use crate::core::{Dataset, ExplainError, Instance, Result, Row};
use ndarray::{ArrayView2, Axis};
use std::collections::HashSet;

/// Named-column numeric table used as the schema reference and the background
/// distribution. Column order is the canonical feature order.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingFrame {
    columns: Vec<String>,
    data: Dataset,
}

impl TrainingFrame {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>, data: Dataset) -> Result<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        if columns.len() != data.ncols() {
            return Err(ExplainError::invalid(format!(
                "Frame has {} column names but {} data columns.",
                columns.len(),
                data.ncols()
            )));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(ExplainError::invalid(format!("Duplicate column name '{}'.", name)));
            }
        }

        Ok(TrainingFrame { columns, data })
    }

    /// Builds a frame from row-major records.
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: &[Vec<f64>],
    ) -> Result<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let width = columns.len();
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(ExplainError::invalid(format!(
                "Row {} has {} values, expected {}.",
                idx,
                row.len(),
                width
            )));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let data = Dataset::from_shape_vec((rows.len(), width), flat)?;
        Self::new(columns, data)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0 || self.n_features() == 0
    }

    pub fn data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Resolves a caller row into canonical column order.
    pub fn align(&self, row: &Row) -> Result<Instance> {
        match row {
            Row::Positional(values) => {
                if values.len() != self.n_features() {
                    return Err(ExplainError::invalid(format!(
                        "Instance has {} values, but the frame has {} features.",
                        values.len(),
                        self.n_features()
                    )));
                }
                Ok(Instance::from(values.clone()))
            }
            Row::Named(map) => {
                if let Some(unknown) = map.keys().find(|k| self.position(k).is_none()) {
                    return Err(ExplainError::invalid(format!("Unknown feature '{}'.", unknown)));
                }
                self.columns
                    .iter()
                    .map(|name| {
                        map.get(name).copied().ok_or_else(|| {
                            ExplainError::invalid(format!("Instance is missing feature '{}'.", name))
                        })
                    })
                    .collect::<Result<Vec<f64>>>()
                    .map(Instance::from)
            }
        }
    }

    /// Wraps an aligned instance into a one-row dataset.
    pub fn single_row(&self, instance: &Instance) -> Result<Dataset> {
        if instance.len() != self.n_features() {
            return Err(ExplainError::invalid(format!(
                "Instance has {} values, but the frame has {} features.",
                instance.len(),
                self.n_features()
            )));
        }
        Ok(instance.view().insert_axis(Axis(0)).to_owned())
    }
}

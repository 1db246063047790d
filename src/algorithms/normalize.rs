// src/algorithms/normalize.rs

//! Reduces raw engine output to one value per (row, feature).
//!
//! Engines disagree on where the class axis goes, so a 3-D result is resolved by
//! comparing its axes against the known feature count:
//!
//! * axis 1 equals the feature count: `(rows, features, classes)`, the class
//!   slice is taken along the last axis;
//! * otherwise: `(rows, classes, features)`, the class slice is taken along the
//!   middle axis.
//!
//! When both axes equal the feature count the first rule wins.

use crate::core::{Dataset, ExplainError, Instance, Result};
use ndarray::{ArrayD, Axis, Ix1, Ix2};

/// Canonical `(rows, features)` matrix for any supported engine layout.
pub fn normalize_contributions(
    raw: ArrayD<f64>,
    n_features: usize,
    class_index: usize,
) -> Result<Dataset> {
    log::trace!(
        "normalizing engine output of shape {:?} (features={}, class={})",
        raw.shape(),
        n_features,
        class_index
    );

    let matrix = match raw.ndim() {
        1 => raw.into_dimensionality::<Ix1>()?.insert_axis(Axis(0)),
        2 => raw.into_dimensionality::<Ix2>()?,
        3 => {
            let (class_axis, n_classes) = if raw.shape()[1] == n_features {
                (Axis(2), raw.shape()[2])
            } else {
                (Axis(1), raw.shape()[1])
            };
            if class_index >= n_classes {
                return Err(ExplainError::engine_output(format!(
                    "Class index {} is out of range for engine output of shape {:?} ({} classes).",
                    class_index,
                    raw.shape(),
                    n_classes
                )));
            }
            raw.index_axis(class_axis, class_index)
                .into_dimensionality::<Ix2>()?
                .to_owned()
        }
        other => {
            return Err(ExplainError::engine_output(format!(
                "Engine output has {} dimensions (shape {:?}); expected 1, 2 or 3.",
                other,
                raw.shape()
            )))
        }
    };

    if matrix.ncols() != n_features {
        return Err(ExplainError::engine_output(format!(
            "Engine output resolves to {} values per row, but there are {} features.",
            matrix.ncols(),
            n_features
        )));
    }
    Ok(matrix)
}

/// Contributions for exactly one explained row.
pub fn normalize_single(raw: ArrayD<f64>, n_features: usize, class_index: usize) -> Result<Instance> {
    let matrix = normalize_contributions(raw, n_features, class_index)?;
    if matrix.nrows() != 1 {
        return Err(ExplainError::engine_output(format!(
            "Expected contributions for a single row, got {} rows.",
            matrix.nrows()
        )));
    }
    Ok(matrix.row(0).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array, Array3};
    use proptest::prelude::*;

    #[test]
    fn passes_two_dimensional_output_through() {
        let raw = array![[1.0, -2.0, 3.0], [0.5, 0.5, 0.5]].into_dyn();
        let out = normalize_contributions(raw, 3, 1).unwrap();
        assert_eq!(out, array![[1.0, -2.0, 3.0], [0.5, 0.5, 0.5]]);
    }

    #[test]
    fn promotes_flat_output_to_one_row() {
        let out = normalize_single(array![0.1, 0.2, 0.3].into_dyn(), 3, 1).unwrap();
        assert_eq!(out, array![0.1, 0.2, 0.3]);
    }

    #[test]
    fn selects_class_from_trailing_axis() {
        // (1, features=3, classes=2)
        let raw = array![[[-1.0, 1.0], [-2.0, 2.0], [-3.0, 3.0]]].into_dyn();
        let out = normalize_single(raw.clone(), 3, 1).unwrap();
        assert_eq!(out, array![1.0, 2.0, 3.0]);

        let out = normalize_single(raw, 3, 0).unwrap();
        assert_eq!(out, array![-1.0, -2.0, -3.0]);
    }

    #[test]
    fn selects_class_from_middle_axis() {
        // (1, classes=2, features=3)
        let raw = array![[[-1.0, -2.0, -3.0], [1.0, 2.0, 3.0]]].into_dyn();
        let out = normalize_single(raw, 3, 1).unwrap();
        assert_eq!(out, array![1.0, 2.0, 3.0]);
    }

    #[test]
    fn square_layout_prefers_trailing_class_axis() {
        // features == classes == 2: interpreted as (rows, features, classes)
        let raw = array![[[10.0, 11.0], [20.0, 21.0]]].into_dyn();
        let out = normalize_single(raw, 2, 1).unwrap();
        assert_eq!(out, array![11.0, 21.0]);
    }

    #[test]
    fn batch_with_class_axis() {
        let mut raw = Array3::<f64>::zeros((4, 3, 2));
        raw[[2, 1, 1]] = 7.0;
        let out = normalize_contributions(raw.into_dyn(), 3, 1).unwrap();
        assert_eq!(out.dim(), (4, 3));
        assert_eq!(out[[2, 1]], 7.0);
    }

    #[test]
    fn rejects_unresolvable_shapes() {
        let wrong_width = array![[1.0, 2.0]].into_dyn();
        assert!(matches!(
            normalize_contributions(wrong_width, 3, 1),
            Err(ExplainError::EngineOutput(_))
        ));

        let neither_axis = Array::<f64, _>::zeros((1, 4, 5)).into_dyn();
        assert!(matches!(
            normalize_contributions(neither_axis, 3, 1),
            Err(ExplainError::EngineOutput(_))
        ));

        let four_d = Array::<f64, _>::zeros((1, 3, 2, 2)).into_dyn();
        assert!(normalize_contributions(four_d, 3, 1).is_err());

        let scalar = Array::<f64, _>::zeros(()).into_dyn();
        assert!(normalize_contributions(scalar, 3, 1).is_err());
    }

    #[test]
    fn rejects_missing_class() {
        // single-class output cannot provide class index 1
        let raw = Array::<f64, _>::zeros((1, 3, 1)).into_dyn();
        assert!(matches!(
            normalize_single(raw, 3, 1),
            Err(ExplainError::EngineOutput(_))
        ));
    }

    #[test]
    fn single_requires_one_row() {
        let raw = Array::<f64, _>::zeros((2, 3)).into_dyn();
        assert!(normalize_single(raw, 3, 1).is_err());
    }

    proptest! {
        #[test]
        fn any_layout_resolves_to_feature_width(
            rows in 1usize..6,
            features in 1usize..6,
            classes in 2usize..4,
            class_first in any::<bool>(),
        ) {
            let raw = if class_first && classes != features {
                Array::<f64, _>::zeros((rows, classes, features)).into_dyn()
            } else {
                Array::<f64, _>::zeros((rows, features, classes)).into_dyn()
            };
            let out = normalize_contributions(raw, features, 1).unwrap();
            prop_assert_eq!(out.dim(), (rows, features));
        }
    }
}

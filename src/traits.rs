// src/traits.rs

//! Collaborator seams. The crate never computes attributions itself; it talks to
//! a prediction model and an explanation engine through these traits.

use crate::core::{EngineOutput, Result, TrainingFrame};
use ndarray::{Array1, ArrayView2};

/// A pre-trained model that produces one output (label or score) per row.
pub trait PredictModel {
    /// Rows arrive in the training frame's canonical column order.
    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<f64>>;
}

impl<F> PredictModel for F
where
    F: Fn(ArrayView2<'_, f64>) -> Result<Array1<f64>>,
{
    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        self(rows)
    }
}

/// An explanation engine already bound to a model and its background data.
pub trait ExplanationEngine {
    /// Per-feature contribution values for every row, in whatever layout the
    /// engine prefers (see [`EngineOutput`]).
    fn explain(&self, rows: ArrayView2<'_, f64>) -> Result<EngineOutput>;
}

impl<E: ExplanationEngine + ?Sized> ExplanationEngine for Box<E> {
    fn explain(&self, rows: ArrayView2<'_, f64>) -> Result<EngineOutput> {
        (**self).explain(rows)
    }
}

/// Obtains an engine compatible with a given model, e.g. a tree-optimized
/// engine for forests or a generic sampling engine for everything else.
pub trait EngineFactory<M: PredictModel + ?Sized> {
    type Engine: ExplanationEngine;

    fn build(&self, model: &M, background: &TrainingFrame) -> Result<Self::Engine>;
}

impl<M, E, F> EngineFactory<M> for F
where
    M: PredictModel + ?Sized,
    E: ExplanationEngine,
    F: Fn(&M, &TrainingFrame) -> Result<E>,
{
    type Engine = E;

    fn build(&self, model: &M, background: &TrainingFrame) -> Result<E> {
        self(model, background)
    }
}

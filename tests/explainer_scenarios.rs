// tests/explainer_scenarios.rs
use approx::assert_abs_diff_eq;
use explain_my_model::{
    Direction, EngineOutput, ExplainError, Explainer, ExplanationEngine, PredictModel, Result,
    TrainingFrame,
};
use ndarray::{array, Array1, Array2, Array3, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use std::cell::Cell;
use std::collections::HashSet;

/// Binary classifier `1[w . x + b > 0]` that counts its `predict` calls.
struct Classifier {
    weights: Array1<f64>,
    bias: f64,
    calls: Cell<usize>,
}

impl Classifier {
    fn new() -> Self {
        Classifier {
            weights: array![1.0, -3.0, 0.25],
            bias: 0.1,
            calls: Cell::new(0),
        }
    }

    fn margin(&self, rows: ArrayView2<'_, f64>) -> Array1<f64> {
        rows.dot(&self.weights) + self.bias
    }
}

impl PredictModel for Classifier {
    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.margin(rows).mapv(|m| if m > 0.0 { 1.0 } else { 0.0 }))
    }
}

/// Reports exact linear attributions as `(rows, classes, features)`.
struct ClassFirstEngine {
    weights: Array1<f64>,
    means: Array1<f64>,
}

impl ExplanationEngine for ClassFirstEngine {
    fn explain(&self, rows: ArrayView2<'_, f64>) -> Result<EngineOutput> {
        let positive: Array2<f64> = (&rows - &self.means) * &self.weights;
        let mut out = Array3::<f64>::zeros((rows.nrows(), 2, rows.ncols()));
        out.index_axis_mut(Axis(1), 0).assign(&positive.mapv(|v| -v));
        out.index_axis_mut(Axis(1), 1).assign(&positive);
        Ok(out.into())
    }
}

fn engine_for(model: &Classifier, frame: &TrainingFrame) -> Result<ClassFirstEngine> {
    let means = frame
        .data()
        .mean_axis(Axis(0))
        .ok_or_else(|| ExplainError::EngineInitialization("empty background".into()))?;
    Ok(ClassFirstEngine {
        weights: model.weights.clone(),
        means,
    })
}

fn training_frame(rows: usize) -> TrainingFrame {
    let mut rng = StdRng::seed_from_u64(7);
    let data = Array2::from_shape_fn((rows, 3), |_| {
        let z: f64 = StandardNormal.sample(&mut rng);
        z
    });
    TrainingFrame::new(["a", "b", "c"], data).unwrap()
}

#[test]
fn global_importance_returns_requested_rows() {
    let model = Classifier::new();
    let frame = training_frame(100);
    let explainer = Explainer::new(&model, &frame, engine_for).unwrap();

    let table = explainer.global_feature_importance(Some(2)).unwrap();
    assert_eq!(table.len(), 2);
    // |w_b| is the largest weight and the features share a distribution
    assert_eq!(table.rows[0].feature, "b");
    assert!(table.rows[0].importance >= table.rows[1].importance);
    assert!(table.iter().all(|r| r.importance >= 0.0));

    let all = explainer.global_feature_importance(Some(50)).unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn instance_explanation_covers_every_feature_once() {
    let model = Classifier::new();
    let frame = training_frame(100);
    let explainer = Explainer::new(&model, &frame, engine_for).unwrap();

    let instance = array![0.4, -0.3, 1.2];
    let explanation = explainer.explain_instance(&instance).unwrap();
    assert_eq!(explanation.len(), 3);
    let names: HashSet<&str> = explanation.iter().map(|c| c.feature.as_str()).collect();
    assert_eq!(names, ["a", "b", "c"].into_iter().collect());

    for pair in explanation.contributions.windows(2) {
        assert!(pair[0].contribution >= pair[1].contribution);
    }

    // the class-1 slice adds up to the margin's offset from its background mean
    let baseline = model.margin(frame.data()).mean().unwrap();
    let margin = model.margin(instance.view().insert_axis(Axis(0)))[0];
    assert_abs_diff_eq!(explanation.total(), margin - baseline, epsilon = 1e-9);
}

#[test]
fn text_summary_lines_follow_the_pattern() {
    let model = Classifier::new();
    let frame = training_frame(100);
    let explainer = Explainer::new(&model, &frame, engine_for).unwrap();

    for top_k in [1, 2, 3, 7] {
        let text = explainer
            .explain_instance_text(vec![0.4, -0.3, 1.2], Some(top_k))
            .unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Top factors influencing this prediction:"));
        let body: Vec<&str> = lines.collect();
        assert!(body.len() <= top_k);
        for line in body {
            let rest = line.strip_prefix("- ").expect("bullet");
            assert!(
                rest.ends_with(" increased the risk") || rest.ends_with(" decreased the risk"),
                "unexpected line {line:?}"
            );
        }
    }
}

#[test]
fn counterfactual_not_found_when_one_step_cannot_flip() {
    let model = Classifier::new();
    let frame = training_frame(100);
    let explainer = Explainer::new(&model, &frame, engine_for).unwrap();

    // margin 3.1, far from the boundary
    let instance = vec![3.0, 0.0, 0.0];
    model.calls.set(0);
    let result = explainer.counterfactual(instance.clone(), Some(0.1), Some(1)).unwrap();
    assert!(result.is_none());
    assert!(model.calls.get() <= 3 * 2);
    assert_eq!(instance, vec![3.0, 0.0, 0.0]);
}

#[test]
fn counterfactual_result_has_a_different_label() {
    let model = Classifier::new();
    let frame = training_frame(100);
    let explainer = Explainer::new(&model, &frame, engine_for).unwrap();

    // margin 0.04 -> label 1; lowering a by 0.1 gives -0.06
    let instance = vec![0.0, 0.02, 0.0];
    let original = explainer.predict(instance.clone()).unwrap();
    let max_iter = 5;
    model.calls.set(0);
    let cf = explainer
        .counterfactual(instance, Some(0.1), Some(max_iter))
        .unwrap()
        .expect("a single step on a flips the label");

    assert_eq!(cf.feature, "a");
    assert_eq!(cf.direction, Direction::Decrease);
    assert_ne!(explainer.predict(cf.values.clone()).unwrap(), original);
    assert_eq!(cf.counterfactual_label, 0.0);
    assert!(model.calls.get() <= max_iter * 3 * 2);
}

#[test]
fn empty_frame_is_rejected() {
    let model = Classifier::new();
    let empty = TrainingFrame::new(["a", "b", "c"], Array2::zeros((0, 3))).unwrap();
    let err = Explainer::new(&model, &empty, engine_for).err().unwrap();
    assert!(matches!(err, ExplainError::InvalidArgument(_)));
}

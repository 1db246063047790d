// src/report.rs
use crate::core::{FeatureContribution, InstanceExplanation};

pub const DEFAULT_SUMMARY_HEADER: &str = "Top factors influencing this prediction:";

/// Verb for a contribution. Zero counts as "decreased".
pub fn direction_verb(contribution: f64) -> &'static str {
    if contribution > 0.0 {
        "increased"
    } else {
        "decreased"
    }
}

pub fn summary_line(entry: &FeatureContribution) -> String {
    format!("- {} {} the risk", entry.feature, direction_verb(entry.contribution))
}

/// Header line followed by one line per top-`top_k` contribution.
pub fn render_summary(explanation: &InstanceExplanation, top_k: usize, header: &str) -> String {
    let mut lines = Vec::with_capacity(top_k.min(explanation.len()) + 1);
    lines.push(header.to_string());
    lines.extend(explanation.top(top_k).iter().map(summary_line));
    lines.join("\n")
}

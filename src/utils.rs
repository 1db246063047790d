// src/utils.rs
use std::cmp::Ordering;

/// Comparator for sorting scores largest first. NaN sorts last.
pub fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

pub fn is_positive_finite(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

pub fn is_non_negative_finite(x: f64) -> bool {
    x.is_finite() && x >= 0.0
}

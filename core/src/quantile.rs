//! Per-cohort quartile thresholds and the quartile classifier.
//!
//! Thresholds use linear interpolation between order statistics:
//! for quantile q over n sorted values, h = (n - 1) * q and the result is
//! x[floor(h)] + frac(h) * (x[floor(h) + 1] - x[floor(h)]).

use crate::{
    error::{SegError, SegResult},
    item::Item,
    types::{QuartileRank, PERCENTILES},
};

/// The 25th, 50th and 75th percentile of one measure in one cohort.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
}

impl Thresholds {
    /// Compute thresholds over an arbitrary (unsorted) set of values.
    pub fn from_values(values: &[f64]) -> SegResult<Self> {
        if values.is_empty() {
            return Err(SegError::EmptyCohort);
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let [q25, q50, q75] = PERCENTILES.map(|q| linear_quantile(&sorted, q));
        Ok(Self { q25, q50, q75 })
    }

    /// Classify a value against these thresholds.
    ///
    /// Inverted scale: 4 for the bottom quartile, 1 for the top. Every
    /// comparison is `<=`, so a value sitting exactly on a cut point goes
    /// to the larger rank number.
    pub fn rank(&self, value: f64) -> QuartileRank {
        if value <= self.q25 {
            4
        } else if value <= self.q50 {
            3
        } else if value <= self.q75 {
            2
        } else {
            1
        }
    }

    /// Cut points paired with their percentile, in output order.
    pub fn points(&self) -> [(f64, f64); 3] {
        [
            (PERCENTILES[0], self.q25),
            (PERCENTILES[1], self.q50),
            (PERCENTILES[2], self.q75),
        ]
    }
}

/// `sorted` must be non-empty and ascending.
fn linear_quantile(sorted: &[f64], q: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Thresholds for both measures of a single cohort. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohortThresholds {
    pub volume:   Thresholds,
    pub monetary: Thresholds,
}

impl CohortThresholds {
    pub fn compute(cohort: &[&Item]) -> SegResult<Self> {
        let volumes: Vec<f64> = cohort.iter().map(|i| i.volume).collect();
        let monetary: Vec<f64> = cohort.iter().map(|i| i.monetary_value).collect();
        Ok(Self {
            volume:   Thresholds::from_values(&volumes)?,
            monetary: Thresholds::from_values(&monetary)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_ranks() {
        let t = Thresholds::from_values(&[40.0, 10.0, 30.0, 20.0]).unwrap();
        assert_eq!(t, Thresholds { q25: 17.5, q50: 25.0, q75: 32.5 });
    }

    #[test]
    fn boundary_values_fall_to_the_larger_rank() {
        let t = Thresholds::from_values(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert_eq!(t.rank(15.0), 4);
        assert_eq!(t.rank(17.5), 4);
        assert_eq!(t.rank(25.0), 3);
        assert_eq!(t.rank(32.5), 2);
        assert_eq!(t.rank(40.0), 1);
    }

    #[test]
    fn single_value_collapses_all_cut_points() {
        let t = Thresholds::from_values(&[-3.25]).unwrap();
        assert_eq!(t, Thresholds { q25: -3.25, q50: -3.25, q75: -3.25 });
        assert_eq!(t.rank(-3.25), 4);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(Thresholds::from_values(&[]), Err(SegError::EmptyCohort)));
    }
}

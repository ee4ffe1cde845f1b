//! Shared primitive types used across the segmentation job.

/// A stable SKU identifier, unique within one run.
pub type ItemId = String;

/// Quartile rank on a single measure. 1 = top quartile, 4 = bottom.
pub type QuartileRank = u8;

/// A code fed to the label resolver: either a composite score (11..=44)
/// or one of a variant's reserved inactive codes.
pub type SegmentCode = u8;

/// The three cut points computed for every cohort, in output order.
pub const PERCENTILES: [f64; 3] = [0.25, 0.5, 0.75];

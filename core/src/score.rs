//! Composite QM score.
//!
//! score = volume_rank * 10 + monetary_rank. The tens digit is always the
//! volume rank and the units digit the monetary rank, so both can be read
//! back from the score alone.

use crate::types::{QuartileRank, SegmentCode};

pub fn composite(volume_rank: QuartileRank, monetary_rank: QuartileRank) -> SegmentCode {
    debug_assert!((1..=4).contains(&volume_rank), "volume rank out of range");
    debug_assert!((1..=4).contains(&monetary_rank), "monetary rank out of range");
    volume_rank * 10 + monetary_rank
}

/// Split a composite score into (volume_rank, monetary_rank).
pub fn decompose(score: SegmentCode) -> (QuartileRank, QuartileRank) {
    (score / 10, score % 10)
}

/// All sixteen composite scores, best (11) first.
pub fn all_composites() -> impl Iterator<Item = SegmentCode> {
    (1..=4).flat_map(|v| (1..=4).map(move |m| composite(v, m)))
}

use crate::errors::DecombineError;
use crate::tag_match::MatchTier;
use serde::{Deserialize, Serialize};
use tcr_types::Segment;

/// Per-segment outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideCounts {
    pub multiple_matches: u64,
    pub half1_corrected: u64,
    pub half2_corrected: u64,
    pub tag_at_read_end: u64,
    pub deletions_undetermined: u64,
    pub no_tag_found: u64,
}

impl SideCounts {
    pub fn record_tier(&mut self, tier: MatchTier) {
        match tier {
            MatchTier::Exact => {}
            MatchTier::Half1Corrected => self.half1_corrected += 1,
            MatchTier::Half2Corrected => self.half2_corrected += 1,
        }
    }

    pub fn record_error(&mut self, error: DecombineError) {
        match error {
            DecombineError::MultipleMatches(_) => self.multiple_matches += 1,
            DecombineError::NoTagFound(_) => self.no_tag_found += 1,
            DecombineError::TagAtReadEnd(_) => self.tag_at_read_end += 1,
            DecombineError::DeletionUndetermined(_) => self.deletions_undetermined += 1,
            DecombineError::AssignmentFailed => {}
        }
    }

    pub fn merge(&mut self, other: &SideCounts) {
        self.multiple_matches += other.multiple_matches;
        self.half1_corrected += other.half1_corrected;
        self.half2_corrected += other.half2_corrected;
        self.tag_at_read_end += other.tag_at_read_end;
        self.deletions_undetermined += other.deletions_undetermined;
        self.no_tag_found += other.no_tag_found;
    }
}

/// Counters for a decombination run. Two runs over disjoint inputs can be
/// merged into the counters of the combined run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecombineCounts {
    pub reads: u64,
    pub records: u64,
    /// Sequence and quality of different lengths, or shorter than the barcode.
    pub malformed_reads: u64,
    pub assignment_failed: u64,
    pub barcode_contains_n: u64,
    pub inter_tag_contains_n: u64,
    pub inter_tag_too_long: u64,
    pub v: SideCounts,
    pub j: SideCounts,
}

impl DecombineCounts {
    pub fn side_mut(&mut self, segment: Segment) -> &mut SideCounts {
        match segment {
            Segment::V => &mut self.v,
            Segment::J => &mut self.j,
        }
    }

    pub fn record_error(&mut self, error: DecombineError) {
        match error {
            DecombineError::MultipleMatches(segment)
            | DecombineError::NoTagFound(segment)
            | DecombineError::TagAtReadEnd(segment)
            | DecombineError::DeletionUndetermined(segment) => {
                self.side_mut(segment).record_error(error)
            }
            DecombineError::AssignmentFailed => self.assignment_failed += 1,
        }
    }

    pub fn merge(&mut self, other: &DecombineCounts) {
        self.reads += other.reads;
        self.records += other.records;
        self.malformed_reads += other.malformed_reads;
        self.assignment_failed += other.assignment_failed;
        self.barcode_contains_n += other.barcode_contains_n;
        self.inter_tag_contains_n += other.inter_tag_contains_n;
        self.inter_tag_too_long += other.inter_tag_too_long;
        self.v.merge(&other.v);
        self.j.merge(&other.j);
    }

    /// Fraction of input reads that produced a record.
    pub fn fraction_decombined(&self) -> f64 {
        if self.reads == 0 {
            return 0.0;
        }
        self.records as f64 / self.reads as f64
    }
}

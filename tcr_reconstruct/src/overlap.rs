//! Finding overlaps between the 3' end of a V-only read and the 5' region of a
//! J-only read.
//!
//! Scores are kept in tenths so that every comparison is exact: a match is
//! worth 10, a mismatch 0, and a gap of length k costs 4 + k.

use crate::config::ReconstructConfig;
use crate::pool::PartialRead;
use bio::alignment::pairwise::Aligner;
use bio::alignment::AlignmentOperation;
use std::collections::BTreeSet;

pub const MATCH_SCORE: i32 = 10;
pub const MISMATCH_SCORE: i32 = 0;
pub const GAP_OPEN: i32 = -4;
pub const GAP_EXTEND: i32 = -1;

/// An alignment is accepted while `10 * columns - score` stays below this, or
/// equals it and contains a gap.
const MAX_COST: i32 = 30;

pub const GAP_CHAR: u8 = b'-';

fn match_score(a: u8, b: u8) -> i32 {
    if a == b {
        MATCH_SCORE
    } else {
        MISMATCH_SCORE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GlobalAlignment {
    x_row: Vec<u8>,
    y_row: Vec<u8>,
    score: i32,
    has_gap: bool,
}

impl GlobalAlignment {
    fn new(x: &[u8], y: &[u8]) -> Self {
        let mut aligner = Aligner::new(GAP_OPEN, GAP_EXTEND, &match_score);
        let alignment = aligner.global(x, y);
        let mut x_row = Vec::with_capacity(alignment.operations.len());
        let mut y_row = Vec::with_capacity(alignment.operations.len());
        let (mut xi, mut yi) = (alignment.xstart, alignment.ystart);
        let mut has_gap = false;
        for op in &alignment.operations {
            match op {
                AlignmentOperation::Match | AlignmentOperation::Subst => {
                    x_row.push(x[xi]);
                    y_row.push(y[yi]);
                    xi += 1;
                    yi += 1;
                }
                AlignmentOperation::Ins => {
                    x_row.push(x[xi]);
                    y_row.push(GAP_CHAR);
                    xi += 1;
                    has_gap = true;
                }
                AlignmentOperation::Del => {
                    x_row.push(GAP_CHAR);
                    y_row.push(y[yi]);
                    yi += 1;
                    has_gap = true;
                }
                AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => {}
            }
        }
        GlobalAlignment {
            x_row,
            y_row,
            score: alignment.score,
            has_gap,
        }
    }

    fn columns(&self) -> usize {
        self.x_row.len()
    }

    fn accepted(&self) -> bool {
        is_accepted(self.columns(), self.score, self.has_gap)
    }
}

fn is_accepted(columns: usize, score: i32, has_gap: bool) -> bool {
    let cost = MATCH_SCORE * columns as i32 - score;
    cost < MAX_COST || (cost == MAX_COST && has_gap)
}

/// An accepted overlap between one V-only and one J-only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateAlignment {
    pub v_id: String,
    pub j_id: String,
    /// Position of the J read in the J-only pool.
    pub j_index: usize,
    /// V suffix row, `-` for gaps.
    pub aligned_v: Vec<u8>,
    /// J prefix row, `-` for gaps.
    pub aligned_j: Vec<u8>,
    /// Alignment columns.
    pub length: usize,
    /// In tenths.
    pub score: i32,
    /// Where the overlap starts in the V read.
    pub v_overlap_start: usize,
    /// Where the overlap ends in the J read.
    pub j_overlap_end: usize,
}

impl CandidateAlignment {
    pub fn edit_score(&self) -> f64 {
        self.length as f64 - self.score as f64 / MATCH_SCORE as f64
    }

    pub fn purity(&self) -> f64 {
        self.length as f64 - self.edit_score()
    }
}

#[derive(Debug, Clone)]
pub struct OverlapAligner {
    min_overlap: usize,
    j_tail_trim: usize,
}

impl OverlapAligner {
    pub fn new(config: &ReconstructConfig) -> Self {
        OverlapAligner {
            min_overlap: config.min_overlap,
            j_tail_trim: config.j_tail_trim,
        }
    }

    /// Offsets into `j` at which `anchor` could start, seeded by exact
    /// occurrences of either half of the anchor.
    pub fn candidate_offsets(&self, anchor: &[u8], j: &[u8]) -> BTreeSet<usize> {
        let half = anchor.len() / 2;
        let mut offsets = BTreeSet::new();
        if half == 0 {
            return offsets;
        }
        let (first, second) = anchor.split_at(half);
        for (pos, window) in j.windows(first.len()).enumerate() {
            if window == first {
                offsets.insert(pos);
            }
        }
        for (pos, window) in j.windows(second.len()).enumerate() {
            if window == second {
                if let Some(offset) = pos.checked_sub(half) {
                    offsets.insert(offset);
                }
            }
        }
        offsets
    }

    pub fn align(&self, v: &PartialRead, j: &PartialRead, j_index: usize) -> Vec<CandidateAlignment> {
        let v_seq = v.sequence.as_slice();
        if v_seq.len() < self.min_overlap {
            return Vec::new();
        }
        let trimmed = &j.sequence[..j.sequence.len().saturating_sub(self.j_tail_trim)];
        let anchor = &v_seq[v_seq.len() - self.min_overlap..];

        self.candidate_offsets(anchor, trimmed)
            .into_iter()
            .filter_map(|offset| {
                let j_end = (offset + self.min_overlap).min(trimmed.len());
                if !GlobalAlignment::new(anchor, &trimmed[offset..j_end]).accepted() {
                    return None;
                }
                let v_start = v_seq.len() - (offset + self.min_overlap).min(v_seq.len());
                let overlap = GlobalAlignment::new(&v_seq[v_start..], &trimmed[..j_end]);
                if !overlap.accepted() {
                    return None;
                }
                Some(CandidateAlignment {
                    v_id: v.id.clone(),
                    j_id: j.id.clone(),
                    j_index,
                    length: overlap.columns(),
                    score: overlap.score,
                    aligned_v: overlap.x_row,
                    aligned_j: overlap.y_row,
                    v_overlap_start: v_start,
                    j_overlap_end: j_end,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tcr_types::TcrLocus;

    fn partial(id: &str, seq: &[u8]) -> PartialRead {
        PartialRead {
            id: id.to_string(),
            locus: TcrLocus::TRB,
            sequence: seq.to_vec(),
            quality: vec![b'I'; seq.len()],
        }
    }

    fn aligner() -> OverlapAligner {
        OverlapAligner::new(&ReconstructConfig::default())
    }

    #[test]
    fn test_exact_eight_base_overlap() {
        let v = partial("v", b"ACGTTTGCAAGTGATCCTAG");
        let j = partial("j", b"GATCCTAGAAAAAAAAAAAAAAAAAAAAAAAA");
        let found = aligner().align(&v, &j, 3);
        assert_eq!(found.len(), 1);
        let aln = &found[0];
        assert_eq!(aln.length, 8);
        assert_eq!(aln.score, 80);
        assert_eq!(aln.edit_score(), 0.0);
        assert_eq!(aln.purity(), aln.length as f64);
        assert_eq!(aln.aligned_v, b"GATCCTAG".to_vec());
        assert_eq!(aln.aligned_j, b"GATCCTAG".to_vec());
        assert_eq!(aln.v_overlap_start, 12);
        assert_eq!(aln.j_overlap_end, 8);
        assert_eq!(aln.j_index, 3);
    }

    #[test]
    fn test_longer_overlap_extends_past_anchor() {
        // The V read ends with the first 16 bases of the J read.
        let v = partial("v", b"TTTTTTCAGGCATTGATCCTAG");
        let j = partial("j", b"CAGGCATTGATCCTAGCCCAAAAAAAAAAAAAAAAAAAA");
        let found = aligner().align(&v, &j, 0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].length, 16);
        assert_eq!(found[0].v_overlap_start, 6);
        assert_eq!(found[0].j_overlap_end, 16);
    }

    #[test]
    fn test_anchor_only_in_j_tail_is_ignored() {
        let v = partial("v", b"ACGTTTGCAAGTGATCCTAG");
        let mut j = b"CCCCCCCCCCCC".to_vec();
        j.extend_from_slice(b"GATCCTAGAAAAAAAAAAAA");
        assert!(aligner().align(&v, &partial("j", &j), 0).is_empty());
    }

    #[test]
    fn test_short_reads() {
        let j = partial("j", b"GATCCTAGAAAAAAAAAAAAAAAAAAAAAAAA");
        assert!(aligner().align(&partial("v", b"TCCTAG"), &j, 0).is_empty());
        assert!(aligner()
            .align(&partial("v", b"ACGTGATCCTAG"), &partial("j", b"GATC"), 0)
            .is_empty());
    }

    #[test]
    fn test_candidate_offsets() {
        let offsets = aligner().candidate_offsets(b"GATCCTAG", b"CTAGGATCTTCTAGAA");
        // GATC at 4; CTAG at 0 (negative offset, skipped) and 10.
        assert_eq!(offsets.into_iter().collect::<Vec<_>>(), vec![4, 6]);
    }

    #[test]
    fn test_gapped_alignment_rows() {
        let aln = GlobalAlignment::new(b"ACGTACGT", b"ACGACGT");
        assert_eq!(aln.x_row, b"ACGTACGT".to_vec());
        assert_eq!(aln.y_row, b"ACG-ACGT".to_vec());
        assert_eq!(aln.score, 65);
        assert!(aln.has_gap);
        assert!(aln.accepted());
    }

    #[test]
    fn test_acceptance_threshold() {
        assert!(is_accepted(8, 80, false));
        assert!(is_accepted(10, 80, false));
        assert!(!is_accepted(10, 70, false));
        assert!(is_accepted(10, 70, true));
        assert!(!is_accepted(10, 65, true));
    }
}

use crate::overlap::{CandidateAlignment, GAP_CHAR};
use crate::pool::{PartialPools, PartialRead};
use bio::io::fastq;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Placeholder quality for reconstructed reads. The bases come from two reads
/// and no meaningful per-base quality is carried over.
pub const PLACEHOLDER_QUAL: u8 = b'~';

/// A V-only read and every overlap found for it, best first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcrCandidate {
    /// Position of the V read in the V-only pool.
    pub v_index: usize,
    pub alignments: Vec<CandidateAlignment>,
    /// Length of the best alignment, 0 if there is none.
    pub best_overlap: usize,
}

impl TcrCandidate {
    pub fn new(v_index: usize, mut alignments: Vec<CandidateAlignment>) -> Self {
        // Stable: equal keys keep the order the aligner produced them in.
        alignments.sort_by_key(|a| (Reverse(a.length), Reverse(a.score)));
        let best_overlap = alignments.first().map_or(0, |a| a.length);
        TcrCandidate {
            v_index,
            alignments,
            best_overlap,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment<'a> {
    pub v_read: &'a PartialRead,
    pub j_read: &'a PartialRead,
    pub alignment: CandidateAlignment,
    pub sequence: Vec<u8>,
}

impl<'a> Assignment<'a> {
    pub fn to_fastq(&self) -> fastq::Record {
        let qual = vec![PLACEHOLDER_QUAL; self.sequence.len()];
        fastq::Record::with_attrs(&self.v_read.id, None, &self.sequence, &qual)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking<'a> {
    pub assignments: Vec<Assignment<'a>>,
    /// V read ids left without an unclaimed J read.
    pub unreconstructable: Vec<String>,
}

/// The V read up to the overlap, the overlap itself (V bases, falling back to
/// J bases where V has a gap), then the untrimmed J read after the overlap.
pub fn synthesize(v: &PartialRead, j: &PartialRead, alignment: &CandidateAlignment) -> Vec<u8> {
    let mut sequence = v.sequence[..alignment.v_overlap_start].to_vec();
    sequence.extend(
        alignment
            .aligned_v
            .iter()
            .zip(&alignment.aligned_j)
            .filter_map(|(&v_base, &j_base)| match (v_base, j_base) {
                (GAP_CHAR, GAP_CHAR) => None,
                (GAP_CHAR, j_base) => Some(j_base),
                (v_base, _) => Some(v_base),
            }),
    );
    sequence.extend_from_slice(&j.sequence[alignment.j_overlap_end..]);
    sequence
}

/// Greedily pair V reads with J reads. Candidates with longer best overlaps
/// choose first, and each J read is used at most once.
pub fn assign<'a>(pools: &'a PartialPools, mut candidates: Vec<TcrCandidate>) -> Ranking<'a> {
    candidates.sort_by_key(|c| Reverse(c.best_overlap));

    let mut claimed: HashSet<&'a str> = HashSet::new();
    let mut ranking = Ranking::default();
    for candidate in candidates {
        let v_read = &pools.v_only[candidate.v_index];
        let choice = candidate
            .alignments
            .into_iter()
            .find(|a| !claimed.contains(pools.j_only[a.j_index].id.as_str()));
        match choice {
            Some(alignment) => {
                let j_read = &pools.j_only[alignment.j_index];
                claimed.insert(j_read.id.as_str());
                ranking.assignments.push(Assignment {
                    v_read,
                    j_read,
                    sequence: synthesize(v_read, j_read, &alignment),
                    alignment,
                });
            }
            None => ranking.unreconstructable.push(v_read.id.clone()),
        }
    }
    ranking
}

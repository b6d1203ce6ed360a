use crate::errors::DecombineError;
use crate::tag_match::TagMatch;
use tcr_reference::GermlineGene;
use tcr_types::Segment;

/// Number of germline bases that must match the read exactly to fix the
/// position of the V end or the J start.
pub const ANCHOR_LEN: usize = 10;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeletionResult {
    /// V: exclusive end of the germline V in the read.
    /// J: start of the germline J in the read.
    pub junction: usize,
    pub deletions: usize,
}

/// Walk the germline boundary inwards one base at a time, starting from the
/// position implied by the tag and its jump, until a 10 base anchor of the
/// reference matches the read.
pub fn resolve_deletions(
    tag_match: &TagMatch,
    gene: &GermlineGene,
    read: &[u8],
) -> Result<DeletionResult, DecombineError> {
    match gene.segment {
        Segment::V => v_deletions(tag_match.position, gene, read),
        Segment::J => j_deletions(tag_match.position, gene, read),
    }
}

fn v_deletions(
    tag_start: usize,
    gene: &GermlineGene,
    read: &[u8],
) -> Result<DeletionResult, DecombineError> {
    let reference = &gene.sequence;
    let end = tag_start + gene.jump;
    if end > read.len() {
        return Err(DecombineError::TagAtReadEnd(Segment::V));
    }
    if reference.len() < ANCHOR_LEN || end < ANCHOR_LEN {
        return Err(DecombineError::DeletionUndetermined(Segment::V));
    }
    let max_deletions = (reference.len() - ANCHOR_LEN).min(end - ANCHOR_LEN);
    let ref_end = reference.len();
    (0..=max_deletions)
        .find(|&d| {
            reference[ref_end - ANCHOR_LEN - d..ref_end - d] == read[end - ANCHOR_LEN - d..end - d]
        })
        .map(|d| DeletionResult {
            junction: end - d,
            deletions: d,
        })
        .ok_or(DecombineError::DeletionUndetermined(Segment::V))
}

fn j_deletions(
    tag_start: usize,
    gene: &GermlineGene,
    read: &[u8],
) -> Result<DeletionResult, DecombineError> {
    let reference = &gene.sequence;
    let start = tag_start
        .checked_sub(gene.jump)
        .ok_or(DecombineError::TagAtReadEnd(Segment::J))?;
    if reference.len() < ANCHOR_LEN || read.len() < start + ANCHOR_LEN {
        return Err(DecombineError::DeletionUndetermined(Segment::J));
    }
    let max_deletions = (reference.len() - ANCHOR_LEN).min(read.len() - start - ANCHOR_LEN);
    (0..=max_deletions)
        .find(|&d| reference[d..d + ANCHOR_LEN] == read[start + d..start + d + ANCHOR_LEN])
        .map(|d| DeletionResult {
            junction: start + d,
            deletions: d,
        })
        .ok_or(DecombineError::DeletionUndetermined(Segment::J))
}

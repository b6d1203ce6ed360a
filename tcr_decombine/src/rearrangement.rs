use crate::deletion::DeletionResult;
use crate::errors::DecombineError;
use crate::tag_match::{MatchTier, TagMatch};
use std::ops::Range;
use tcr_reference::GermlineCatalog;
use tcr_types::{ReadFrame, Segment, TcrLocus};

/// A resolved tag on one side of a read.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SideCall {
    pub segment: Segment,
    pub tag: TagMatch,
    pub tag_len: usize,
    pub deletion: DeletionResult,
}

impl SideCall {
    pub fn tag_bounds(&self) -> Range<usize> {
        self.tag.position..self.tag.position + self.tag_len
    }

    pub fn tier(&self) -> MatchTier {
        self.tag.tier
    }
}

/// The outcome of decombining one read in one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RearrangementRecord {
    pub locus: TcrLocus,
    /// Local to `locus`.
    pub v_index: Option<usize>,
    pub j_index: Option<usize>,
    pub anchor: Segment,
    /// Deletions on the anchoring side.
    pub deletions: usize,
    pub frame: ReadFrame,
    /// Span of the read copied into `sequence`.
    pub bounds: Range<usize>,
    pub v_tag: Option<Range<usize>>,
    pub j_tag: Option<Range<usize>>,
    pub sequence: Vec<u8>,
}

impl RearrangementRecord {
    pub fn is_complete(&self) -> bool {
        self.v_index.is_some() && self.j_index.is_some()
    }

    /// Bases between the V tag end and the J tag start. A missing V tag reads
    /// from the start of the read, a missing J tag to its end.
    pub fn inter_tag(&self) -> &[u8] {
        let end = self
            .j_tag
            .as_ref()
            .map_or(self.bounds.end, |tag| tag.start);
        let start = self
            .v_tag
            .as_ref()
            .map_or(self.bounds.start, |tag| tag.end)
            .min(end);
        &self.sequence[start - self.bounds.start..end - self.bounds.start]
    }
}

/// Combine the two sides of a read into a record.
///
/// A J call always anchors the record, even when V was found as well: the V
/// index is then carried along but the two sides are not merged into a single
/// junction.
pub fn resolve_rearrangement(
    catalog: &GermlineCatalog,
    read: &[u8],
    frame: ReadFrame,
    v: Option<&SideCall>,
    j: Option<&SideCall>,
) -> Result<RearrangementRecord, DecombineError> {
    let locate = |call: &SideCall| {
        catalog
            .segment(call.segment)
            .offsets
            .locate(call.tag.gene)
            .ok_or(DecombineError::AssignmentFailed)
    };

    match (v, j) {
        (v, Some(j)) => {
            let (locus, j_index) = locate(j)?;
            // A V tag from another locus cannot belong to this rearrangement.
            let v = match v {
                Some(v) => match locate(v)? {
                    (v_locus, v_index) if v_locus == locus => Some((v, v_index)),
                    _ => None,
                },
                None => None,
            };
            let j_tag = j.tag_bounds();
            let bounds = 0..j_tag.end;
            Ok(RearrangementRecord {
                locus,
                v_index: v.map(|(_, index)| index),
                j_index: Some(j_index),
                anchor: Segment::J,
                deletions: j.deletion.deletions,
                frame,
                sequence: read[bounds.clone()].to_vec(),
                bounds,
                v_tag: v.map(|(call, _)| call.tag_bounds()),
                j_tag: Some(j_tag),
            })
        }
        (Some(v), None) => {
            let (locus, v_index) = locate(v)?;
            let v_tag = v.tag_bounds();
            let bounds = v_tag.start..read.len();
            Ok(RearrangementRecord {
                locus,
                v_index: Some(v_index),
                j_index: None,
                anchor: Segment::V,
                deletions: v.deletion.deletions,
                frame,
                sequence: read[bounds.clone()].to_vec(),
                bounds,
                v_tag: Some(v_tag),
                j_tag: None,
            })
        }
        (None, None) => Err(DecombineError::AssignmentFailed),
    }
}

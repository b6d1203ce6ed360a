//! Locating a single V or J tag in a read.
//!
//! Exact full-tag hits are tried first. If there is none, a read with a single
//! substitution inside the tag is still recovered via one of the two
//! half-tags: the intact half pins the tag position and the full tag is then
//! checked at Hamming distance one.

use crate::errors::DecombineError;
use bio::alignment::distance::hamming;
use serde::{Deserialize, Serialize};
use tcr_reference::{SegmentTable, TagPatterns};
use tcr_types::Segment;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Half1Corrected,
    Half2Corrected,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// Flat gene index across all loci of the segment table.
    pub gene: usize,
    /// Start of the tag in the read.
    pub position: usize,
    pub tier: MatchTier,
}

pub struct TagMatcher<'a> {
    table: &'a SegmentTable,
}

impl<'a> TagMatcher<'a> {
    pub fn new(table: &'a SegmentTable) -> Self {
        TagMatcher { table }
    }

    pub fn segment(&self) -> Segment {
        self.table.segment
    }

    pub fn find(&self, read: &[u8]) -> Result<TagMatch, DecombineError> {
        let segment = self.segment();
        let lookups = &self.table.lookups;

        match lookups.full.find_all(read).as_slice() {
            [] => {}
            // Full tags are unique within a locus; across loci the first gene
            // in load order wins.
            [hit] => {
                return Ok(TagMatch {
                    gene: hit.genes[0],
                    position: hit.start,
                    tier: MatchTier::Exact,
                })
            }
            _ => return Err(DecombineError::MultipleMatches(segment)),
        }

        if let Some(m) = self.half_match(read, &lookups.half1, 0, MatchTier::Half1Corrected) {
            return Ok(m);
        }
        if let Some(m) = self.half_match(
            read,
            &lookups.half2,
            self.table.half_split,
            MatchTier::Half2Corrected,
        ) {
            return Ok(m);
        }
        Err(DecombineError::NoTagFound(segment))
    }

    /// First gene, in read order then catalog order, whose half-tag occurs in
    /// the read and whose full tag sits within one substitution of the read at
    /// the implied position.
    fn half_match(
        &self,
        read: &[u8],
        patterns: &TagPatterns,
        offset_in_tag: usize,
        tier: MatchTier,
    ) -> Option<TagMatch> {
        for hit in patterns.find_all(read) {
            let Some(start) = hit.start.checked_sub(offset_in_tag) else {
                continue;
            };
            for &gene in hit.genes {
                let tag = &self.table.gene(gene).tag;
                let Some(window) = read.get(start..start + tag.len()) else {
                    continue;
                };
                if hamming(tag, window) <= 1 {
                    return Some(TagMatch {
                        gene,
                        position: start,
                        tier,
                    });
                }
            }
        }
        None
    }
}

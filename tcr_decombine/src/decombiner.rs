use crate::config::DecombineConfig;
use crate::counts::DecombineCounts;
use crate::deletion::resolve_deletions;
use crate::errors::DecombineError;
use crate::read::{reverse_strand, SeqRead};
use crate::rearrangement::{resolve_rearrangement, RearrangementRecord, SideCall};
use crate::record::{Barcode, DcrRecord};
use crate::tag_match::TagMatcher;
use std::borrow::Cow;
use tcr_reference::GermlineCatalog;
use tcr_types::{ReadFrame, Segment};

/// Turns reads into `DcrRecord`s against a fixed catalog and configuration.
pub struct Decombiner<'a> {
    catalog: &'a GermlineCatalog,
    config: DecombineConfig,
    v: TagMatcher<'a>,
    j: TagMatcher<'a>,
}

impl<'a> Decombiner<'a> {
    pub fn new(catalog: &'a GermlineCatalog, config: DecombineConfig) -> Self {
        Decombiner {
            catalog,
            config,
            v: TagMatcher::new(catalog.segment(Segment::V)),
            j: TagMatcher::new(catalog.segment(Segment::J)),
        }
    }

    pub fn config(&self) -> &DecombineConfig {
        &self.config
    }

    /// All records for one read: none, or one per frame searched.
    pub fn decombine(&self, read: &SeqRead, counts: &mut DecombineCounts) -> Vec<DcrRecord> {
        counts.reads += 1;
        if !read.is_well_formed() {
            counts.malformed_reads += 1;
            return Vec::new();
        }

        let (barcode, seq, qual) = match self.config.barcode_len {
            Some(len) => {
                if read.seq.len() < len {
                    counts.malformed_reads += 1;
                    return Vec::new();
                }
                let barcode = Barcode {
                    sequence: read.seq[..len].to_vec(),
                    quality: read.qual[..len].to_vec(),
                };
                if barcode.sequence.contains(&b'N') {
                    counts.barcode_contains_n += 1;
                }
                (Some(barcode), &read.seq[len..], &read.qual[len..])
            }
            None => (None, read.seq.as_slice(), read.qual.as_slice()),
        };

        let mut records = Vec::new();
        for &frame in self.config.orientation.frames() {
            let (seq, qual): (Cow<'_, [u8]>, Cow<'_, [u8]>) = match frame {
                ReadFrame::Forward => (Cow::Borrowed(seq), Cow::Borrowed(qual)),
                ReadFrame::Reverse => {
                    let (s, q) = reverse_strand(seq, qual);
                    (Cow::Owned(s), Cow::Owned(q))
                }
            };
            let Some(rearrangement) = self.decombine_frame(&seq, frame, counts) else {
                continue;
            };
            if self.passes_filters(&rearrangement, counts) {
                counts.records += 1;
                records.push(DcrRecord::new(
                    rearrangement,
                    &read.id,
                    &qual,
                    barcode.clone(),
                ));
            }
            if self.config.orientation.first_hit_only() {
                break;
            }
        }
        records
    }

    /// Search one strand of a read for V and J tags and combine the results.
    pub fn decombine_frame(
        &self,
        seq: &[u8],
        frame: ReadFrame,
        counts: &mut DecombineCounts,
    ) -> Option<RearrangementRecord> {
        let v = self.call_side(&self.v, seq, counts);
        let j = self.call_side(&self.j, seq, counts);
        match resolve_rearrangement(self.catalog, seq, frame, v.as_ref(), j.as_ref()) {
            Ok(record) => Some(record),
            Err(err) => {
                counts.record_error(err);
                None
            }
        }
    }

    fn call_side(
        &self,
        matcher: &TagMatcher<'_>,
        seq: &[u8],
        counts: &mut DecombineCounts,
    ) -> Option<SideCall> {
        match self.try_call_side(matcher, seq, counts) {
            Ok(side) => Some(side),
            Err(err) => {
                counts.record_error(err);
                None
            }
        }
    }

    fn try_call_side(
        &self,
        matcher: &TagMatcher<'_>,
        seq: &[u8],
        counts: &mut DecombineCounts,
    ) -> Result<SideCall, DecombineError> {
        let segment = matcher.segment();
        let tag = matcher.find(seq)?;
        counts.side_mut(segment).record_tier(tag.tier);
        let gene = self.catalog.segment(segment).gene(tag.gene);
        let deletion = resolve_deletions(&tag, gene, seq)?;
        Ok(SideCall {
            segment,
            tag,
            tag_len: gene.tag.len(),
            deletion,
        })
    }

    fn passes_filters(&self, record: &RearrangementRecord, counts: &mut DecombineCounts) -> bool {
        if !self.config.allow_ns && record.sequence.contains(&b'N') {
            counts.inter_tag_contains_n += 1;
            return false;
        }
        if record.inter_tag().len() > self.config.len_threshold {
            counts.inter_tag_too_long += 1;
            return false;
        }
        true
    }
}

//! A small two-locus catalog shared by the unit tests.

use tcr_reference::{GermlineCatalog, LocusReference, SegmentReference, TagEntry, TagSet};
use tcr_types::TcrLocus;

pub(crate) const TAG_LEN: usize = 20;
pub(crate) const V0_TAG_POS: usize = 20;
pub(crate) const J0_TAG_POS: usize = 10;

pub(crate) const V0_SEQ: &[u8] = b"ACACACCCGCAAAAACCTGAGGGTTGGAAGCGAAAGCGGTCCACTTGACG";
pub(crate) const V1_SEQ: &[u8] = b"ATAACCTTCATTCACCATCGTGAACACGCTCCCGGCCACTGGTGGAGAGA";
pub(crate) const TRB_V_SEQ: &[u8] = b"GCCCCTACGAGTGAAATTTAGCTGTTGTGAATAGCACATAGAGTACTAAA";
pub(crate) const J0_SEQ: &[u8] = b"GCAAGCTCCCTTGGACTAAGTTCCGTTCCCTAGCAGTCGG";
pub(crate) const TRB_J_SEQ: &[u8] = b"CGCTAACGAGAAGCGGGGGGTTGACATCACCGGGTTGCCG";

fn v_reference(seqs: &[&[u8]]) -> SegmentReference {
    SegmentReference {
        sequences: seqs.iter().map(|s| s.to_vec()).collect(),
        tags: seqs
            .iter()
            .map(|s| TagEntry {
                tag: s[V0_TAG_POS..V0_TAG_POS + TAG_LEN].to_vec(),
                jump: s.len() - V0_TAG_POS,
            })
            .collect(),
    }
}

fn j_reference(seqs: &[&[u8]]) -> SegmentReference {
    SegmentReference {
        sequences: seqs.iter().map(|s| s.to_vec()).collect(),
        tags: seqs
            .iter()
            .map(|s| TagEntry {
                tag: s[J0_TAG_POS..J0_TAG_POS + TAG_LEN].to_vec(),
                jump: J0_TAG_POS,
            })
            .collect(),
    }
}

/// TRA: V genes 0 and 1, J gene 0. TRB: V gene 2 (local 0), J gene 1 (local 0).
pub(crate) fn fixture_catalog() -> GermlineCatalog {
    GermlineCatalog::new(
        TagSet::Extended,
        &[
            LocusReference {
                locus: TcrLocus::TRA,
                v: v_reference(&[V0_SEQ, V1_SEQ]),
                j: j_reference(&[J0_SEQ]),
            },
            LocusReference {
                locus: TcrLocus::TRB,
                v: v_reference(&[TRB_V_SEQ]),
                j: j_reference(&[TRB_J_SEQ]),
            },
        ],
    )
    .unwrap()
}

/// `v` followed by `insert` followed by `j`.
pub(crate) fn rearranged(v: &[u8], insert: &[u8], j: &[u8]) -> Vec<u8> {
    [v, insert, j].concat()
}

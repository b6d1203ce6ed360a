//!
//! Germline reference data for tag-based TCR decombination: reference
//! sequences, Decombinator tags and the k-mer lookups built over them.
//!
// Warning groups (as of rust 1.55)
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_compatibility,
    rust_2021_compatibility,
    rust_2018_idioms,
    unused
)]

use bio::io::fasta;
use itertools::Itertools;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use strum_macros::{Display, EnumIter, EnumString};

pub mod errors;
pub mod lookup;
pub mod tags;

pub use errors::CatalogError;
pub use lookup::{TagLookups, TagHit, TagPatterns};
pub use tags::{read_tag_table, TagEntry};
pub use tcr_types::{Segment, TcrLocus};

pub(crate) const ALLOWED_NUCLEOTIDES: &[u8] = b"ACGTN";

/// Which published Decombinator tag set to use.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TagSet {
    #[default]
    Extended,
    Original,
}

impl TagSet {
    /// Position at which tags are cut into half-tags. The original tag set
    /// has shorter J tags and therefore a shorter J first half.
    pub fn half_split(self, segment: Segment) -> usize {
        match (self, segment) {
            (TagSet::Extended, _) => 10,
            (TagSet::Original, Segment::V) => 10,
            (TagSet::Original, Segment::J) => 6,
        }
    }

    /// The extended set only exists for human alpha/beta. Fall back to the
    /// original set for anything else.
    pub fn resolve(self, species: Species, loci: &[TcrLocus]) -> TagSet {
        if self != TagSet::Extended {
            return self;
        }
        if species == Species::Mouse {
            warn!("There is no extended tag set for mouse TCR genes, using the original tag set");
            return TagSet::Original;
        }
        if loci.iter().any(|l| matches!(l, TcrLocus::TRG | TcrLocus::TRD)) {
            warn!("There is no extended tag set for gamma/delta TCR genes, using the original tag set");
            return TagSet::Original;
        }
        self
    }
}

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Species {
    #[default]
    Human,
    Mouse,
}

/// One reference gene together with its tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GermlineGene {
    pub locus: TcrLocus,
    pub segment: Segment,
    /// Index of the gene within its (locus, segment) table.
    pub index: usize,
    pub sequence: Vec<u8>,
    pub tag: Vec<u8>,
    pub half1: Vec<u8>,
    pub half2: Vec<u8>,
    /// Distance from the tag start to the end of the germline V (V genes), or
    /// from the germline J start to the tag start (J genes).
    pub jump: usize,
}

/// Reference sequences and tags for one segment of one locus, in file order.
#[derive(Debug, Clone, Default)]
pub struct SegmentReference {
    pub sequences: Vec<Vec<u8>>,
    pub tags: Vec<TagEntry>,
}

#[derive(Debug, Clone)]
pub struct LocusReference {
    pub locus: TcrLocus,
    pub v: SegmentReference,
    pub j: SegmentReference,
}

/// Maps a flat gene index (genes of all loci concatenated in load order) back
/// to a locus and the gene index within that locus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocusOffsets {
    blocks: Vec<(TcrLocus, usize)>,
}

impl LocusOffsets {
    fn push(&mut self, locus: TcrLocus, num_genes: usize) {
        self.blocks.push((locus, num_genes));
    }

    pub fn locate(&self, flat_index: usize) -> Option<(TcrLocus, usize)> {
        let mut start = 0;
        for &(locus, len) in &self.blocks {
            if flat_index < start + len {
                return Some((locus, flat_index - start));
            }
            start += len;
        }
        None
    }
}

/// All genes of one segment type, across loci.
#[derive(Debug, Clone)]
pub struct SegmentTable {
    pub segment: Segment,
    pub half_split: usize,
    pub genes: Vec<GermlineGene>,
    pub offsets: LocusOffsets,
    pub lookups: TagLookups,
}

impl SegmentTable {
    fn build(
        segment: Segment,
        half_split: usize,
        loci: &[(TcrLocus, &SegmentReference)],
    ) -> Result<Self, CatalogError> {
        let mut genes = Vec::new();
        let mut offsets = LocusOffsets::default();
        for &(locus, reference) in loci {
            if reference.sequences.len() != reference.tags.len() {
                return Err(CatalogError::CountMismatch {
                    locus,
                    segment,
                    num_sequences: reference.sequences.len(),
                    num_tags: reference.tags.len(),
                });
            }
            for (index, (sequence, entry)) in
                reference.sequences.iter().zip(&reference.tags).enumerate()
            {
                if half_split == 0 || half_split >= entry.tag.len() {
                    return Err(CatalogError::HalfSplitOutOfRange {
                        segment,
                        half_split,
                        tag_len: entry.tag.len(),
                    });
                }
                let sequence = sequence.to_ascii_uppercase();
                let tag = entry.tag.to_ascii_uppercase();
                for seq in [&sequence, &tag] {
                    if let Some((position, &base)) = seq
                        .iter()
                        .find_position(|&&b| !ALLOWED_NUCLEOTIDES.contains(&b))
                    {
                        return Err(CatalogError::InvalidBase {
                            locus,
                            segment,
                            index,
                            base: base as char,
                            position,
                        });
                    }
                }
                genes.push(GermlineGene {
                    locus,
                    segment,
                    index,
                    half1: tag[..half_split].to_vec(),
                    half2: tag[half_split..].to_vec(),
                    tag,
                    sequence,
                    jump: entry.jump,
                });
            }
            offsets.push(locus, reference.tags.len());
        }

        let lookups = TagLookups {
            full: TagPatterns::new(genes.iter().map(|g| g.tag.as_slice())),
            half1: TagPatterns::new(genes.iter().map(|g| g.half1.as_slice())),
            half2: TagPatterns::new(genes.iter().map(|g| g.half2.as_slice())),
        };

        Ok(SegmentTable {
            segment,
            half_split,
            genes,
            offsets,
            lookups,
        })
    }

    pub fn gene(&self, flat_index: usize) -> &GermlineGene {
        &self.genes[flat_index]
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

/// Immutable germline catalog, built once per run and shared by reference.
#[derive(Debug, Clone)]
pub struct GermlineCatalog {
    tag_set: TagSet,
    loci: Vec<TcrLocus>,
    v: SegmentTable,
    j: SegmentTable,
}

impl GermlineCatalog {
    pub fn new(tag_set: TagSet, references: &[LocusReference]) -> Result<Self, CatalogError> {
        if references.is_empty() {
            return Err(CatalogError::NoLoci);
        }
        let v_refs = references.iter().map(|r| (r.locus, &r.v)).collect_vec();
        let j_refs = references.iter().map(|r| (r.locus, &r.j)).collect_vec();
        Ok(GermlineCatalog {
            tag_set,
            loci: references.iter().map(|r| r.locus).collect(),
            v: SegmentTable::build(Segment::V, tag_set.half_split(Segment::V), &v_refs)?,
            j: SegmentTable::build(Segment::J, tag_set.half_split(Segment::J), &j_refs)?,
        })
    }

    /// Load `<species>_<tagset>_TR<X><V|J>.<fasta|tags>` for every requested
    /// locus. Each file is looked up in the working directory first, then in
    /// `dir`.
    pub fn from_dir(
        dir: &Path,
        species: Species,
        tag_set: TagSet,
        loci: &[TcrLocus],
    ) -> Result<Self, CatalogError> {
        let tag_set = tag_set.resolve(species, loci);
        let mut references = Vec::with_capacity(loci.len());
        for &locus in loci {
            let load = |segment: Segment| -> Result<SegmentReference, CatalogError> {
                let stem = format!("{species}_{tag_set}_TR{}{segment}", locus.letter());
                let fasta_path = find_reference_file(dir, &format!("{stem}.fasta"))?;
                let tags_path = find_reference_file(dir, &format!("{stem}.tags"))?;
                Ok(SegmentReference {
                    sequences: read_fasta_sequences(open(&fasta_path)?, &fasta_path)?,
                    tags: read_tag_table(BufReader::new(open(&tags_path)?), &tags_path)?,
                })
            };
            references.push(LocusReference {
                locus,
                v: load(Segment::V)?,
                j: load(Segment::J)?,
            });
        }
        let catalog = GermlineCatalog::new(tag_set, &references)?;
        info!(
            "Loaded {} V and {} J genes for {} ({} tags)",
            catalog.v.len(),
            catalog.j.len(),
            loci.iter().map(|l| l.long_name()).join(", "),
            tag_set
        );
        Ok(catalog)
    }

    pub fn tag_set(&self) -> TagSet {
        self.tag_set
    }

    pub fn loci(&self) -> &[TcrLocus] {
        &self.loci
    }

    pub fn segment(&self, segment: Segment) -> &SegmentTable {
        match segment {
            Segment::V => &self.v,
            Segment::J => &self.j,
        }
    }
}

fn find_reference_file(dir: &Path, file_name: &str) -> Result<PathBuf, CatalogError> {
    let local = PathBuf::from(file_name);
    if local.is_file() {
        return Ok(local);
    }
    let bundled = dir.join(file_name);
    if bundled.is_file() {
        return Ok(bundled);
    }
    Err(CatalogError::MissingFile {
        file_name: file_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

fn open(path: &Path) -> Result<File, CatalogError> {
    File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Upper-cased sequences of every record in a FASTA stream, in file order.
pub fn read_fasta_sequences<R: Read>(reader: R, path: &Path) -> Result<Vec<Vec<u8>>, CatalogError> {
    fasta::Reader::new(reader)
        .records()
        .map(|record| {
            record
                .map(|r| r.seq().to_ascii_uppercase())
                .map_err(|source| CatalogError::Io {
                    path: path.to_path_buf(),
                    source,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const V_FASTA: &str = ">TRAV1\nggacaaagcctt\nGAGCAGCCCTCAGCAGCATT\n>TRAV2\nTTTGGACCAAGTCACATCTAGGAACAGTG\n";
    const V_TAGS: &str = "GAGCAGCCCTCAGCAGCATT 20\nAGTCACATCTAGGAACAGTG 19\n";
    const J_FASTA: &str = ">TRAJ1\nTGAACTCGGATCACCATTGGAGACAGG\n";
    const J_TAGS: &str = "CGGATCACCATTGGAGACAG 5\n";

    fn write(dir: &Path, name: &str, contents: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn test_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "human_extended_TRAV.fasta", V_FASTA);
        write(dir.path(), "human_extended_TRAV.tags", V_TAGS);
        write(dir.path(), "human_extended_TRAJ.fasta", J_FASTA);
        write(dir.path(), "human_extended_TRAJ.tags", J_TAGS);

        let catalog =
            GermlineCatalog::from_dir(dir.path(), Species::Human, TagSet::Extended, &[TcrLocus::TRA])
                .unwrap();
        assert_eq!(catalog.tag_set(), TagSet::Extended);
        let v = catalog.segment(Segment::V);
        assert_eq!(v.len(), 2);
        assert_eq!(v.gene(0).sequence, b"GGACAAAGCCTTGAGCAGCCCTCAGCAGCATT".to_vec());
        assert_eq!(v.gene(1).half1, b"AGTCACATCT".to_vec());
        assert_eq!(v.gene(1).half2, b"AGGAACAGTG".to_vec());
        assert_eq!(v.gene(1).jump, 19);
        assert_eq!(catalog.segment(Segment::J).gene(0).locus, TcrLocus::TRA);

        let err = GermlineCatalog::from_dir(dir.path(), Species::Human, TagSet::Extended, &[TcrLocus::TRB])
            .unwrap_err();
        assert!(matches!(err, CatalogError::MissingFile { .. }));
    }

    #[test]
    fn test_tag_set_resolution() {
        assert_eq!(
            TagSet::Extended.resolve(Species::Human, &[TcrLocus::TRA, TcrLocus::TRB]),
            TagSet::Extended
        );
        assert_eq!(
            TagSet::Extended.resolve(Species::Mouse, &[TcrLocus::TRB]),
            TagSet::Original
        );
        assert_eq!(
            TagSet::Extended.resolve(Species::Human, &[TcrLocus::TRG]),
            TagSet::Original
        );
        assert_eq!(TagSet::Original.half_split(Segment::J), 6);
        assert_eq!("original".parse::<TagSet>().unwrap(), TagSet::Original);
        assert_eq!(Species::Mouse.to_string(), "mouse");
    }

    fn segment(seqs: &[&str], tags: &[(&str, usize)]) -> SegmentReference {
        SegmentReference {
            sequences: seqs.iter().map(|s| s.as_bytes().to_vec()).collect(),
            tags: tags
                .iter()
                .map(|&(t, jump)| TagEntry {
                    tag: t.as_bytes().to_vec(),
                    jump,
                })
                .collect(),
        }
    }

    #[test]
    fn test_locus_offsets() {
        let tra = LocusReference {
            locus: TcrLocus::TRA,
            v: segment(
                &["AAAAACCCCCGGGGGTTTTT", "CCCCCAAAAAGGGGGTTTTT"],
                &[("AAAAACCCCCGGGGGTTTTT", 20), ("CCCCCAAAAAGGGGGTTTTT", 20)],
            ),
            j: segment(&["ACGTACGTACGTACGTACGT"], &[("ACGTACGTACGTACGTACGT", 0)]),
        };
        let trb = LocusReference {
            locus: TcrLocus::TRB,
            v: segment(&["GGGGGAAAAACCCCCTTTTT"], &[("GGGGGAAAAACCCCCTTTTT", 20)]),
            j: segment(&["TGCATGCATGCATGCATGCA"], &[("TGCATGCATGCATGCATGCA", 0)]),
        };
        let catalog = GermlineCatalog::new(TagSet::Extended, &[tra, trb]).unwrap();
        let offsets = &catalog.segment(Segment::V).offsets;
        assert_eq!(offsets.locate(0), Some((TcrLocus::TRA, 0)));
        assert_eq!(offsets.locate(1), Some((TcrLocus::TRA, 1)));
        assert_eq!(offsets.locate(2), Some((TcrLocus::TRB, 0)));
        assert_eq!(offsets.locate(3), None);
        assert_eq!(catalog.segment(Segment::V).gene(2).index, 0);
        assert_eq!(catalog.loci(), &[TcrLocus::TRA, TcrLocus::TRB]);
    }

    #[test]
    fn test_catalog_validation() {
        let bad_count = LocusReference {
            locus: TcrLocus::TRA,
            v: segment(&["ACGTACGTACGTACGTACGT"], &[]),
            j: segment(&[], &[]),
        };
        assert!(matches!(
            GermlineCatalog::new(TagSet::Extended, &[bad_count]),
            Err(CatalogError::CountMismatch { num_sequences: 1, num_tags: 0, .. })
        ));

        let bad_base = LocusReference {
            locus: TcrLocus::TRA,
            v: segment(&["ACGTACGTXCGTACGTACGT"], &[("ACGTACGTACGTACGTACGT", 20)]),
            j: segment(&[], &[]),
        };
        assert!(matches!(
            GermlineCatalog::new(TagSet::Extended, &[bad_base]),
            Err(CatalogError::InvalidBase { base: 'X', position: 8, .. })
        ));

        let short_tag = LocusReference {
            locus: TcrLocus::TRA,
            v: segment(&["ACGTACGTAC"], &[("ACGTACGTAC", 10)]),
            j: segment(&[], &[]),
        };
        assert!(matches!(
            GermlineCatalog::new(TagSet::Extended, &[short_tag]),
            Err(CatalogError::HalfSplitOutOfRange { half_split: 10, tag_len: 10, .. })
        ));
        assert!(matches!(
            GermlineCatalog::new(TagSet::Extended, &[]),
            Err(CatalogError::NoLoci)
        ));
    }
}

use std::path::PathBuf;
use tcr_types::{Segment, TcrLocus};
use thiserror::Error;

/// Problems found while loading the germline reference. All of these are fatal
/// for a run: there is no meaningful way to decombine reads against a
/// partially loaded catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Cannot find reference file {file_name} in the working directory or in {dir}")]
    MissingFile { file_name: String, dir: PathBuf },

    #[error("Error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed tag line {line_num} (expected '<tag> <jump>'): {line:?}")]
    MalformedTagLine { line_num: usize, line: String },

    #[error(
        "Tag on line {line_num} has length {found}, but earlier tags in the same table have length {expected}"
    )]
    InconsistentTagLength {
        line_num: usize,
        expected: usize,
        found: usize,
    },

    #[error("{locus} {segment}: {num_sequences} reference sequences but {num_tags} tags")]
    CountMismatch {
        locus: TcrLocus,
        segment: Segment,
        num_sequences: usize,
        num_tags: usize,
    },

    #[error(
        "Invalid character '{base}' at position {position} of {locus}{segment} entry {index}. Only ACGTN are allowed."
    )]
    InvalidBase {
        locus: TcrLocus,
        segment: Segment,
        index: usize,
        base: char,
        position: usize,
    },

    #[error("Half-tag split {half_split} does not fit {segment} tags of length {tag_len}")]
    HalfSplitOutOfRange {
        segment: Segment,
        half_split: usize,
        tag_len: usize,
    },

    #[error("No loci were requested")]
    NoLoci,
}

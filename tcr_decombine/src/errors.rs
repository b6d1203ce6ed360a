use tcr_types::Segment;
use thiserror::Error;

/// Why a read (or one side of a read) could not be decombined. None of these
/// are fatal; each is counted and the read is discarded for that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecombineError {
    #[error("more than one {0} tag found in the read")]
    MultipleMatches(Segment),
    #[error("no {0} tag found at any tier")]
    NoTagFound(Segment),
    #[error("the {0} germline boundary falls outside the read")]
    TagAtReadEnd(Segment),
    #[error("no exact {0} anchor found, deletions undetermined")]
    DeletionUndetermined(Segment),
    #[error("neither a V nor a J gene could be assigned")]
    AssignmentFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    #[error("expected at least {expected} fields, found {found} in {line:?}")]
    TooFewFields {
        expected: usize,
        found: usize,
        line: String,
    },
    #[error("unexpected trailing fields in {line:?}")]
    TrailingFields { line: String },
    #[error("invalid {field} {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[error("record has neither a V nor a J index: {line:?}")]
    NoGene { line: String },
}

//!
//! Tag-based decombination of TCR reads: find the V and J tags in a read,
//! infer germline deletions from them and turn the result into a record.
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

pub mod config;
pub mod counts;
pub mod decombiner;
pub mod deletion;
pub mod errors;
pub mod read;
pub mod rearrangement;
pub mod record;
pub mod tag_match;

#[cfg(test)]
mod test_catalog;

pub use config::DecombineConfig;
pub use counts::{DecombineCounts, SideCounts};
pub use decombiner::Decombiner;
pub use deletion::{resolve_deletions, DeletionResult, ANCHOR_LEN};
pub use errors::{DecombineError, RecordParseError};
pub use read::SeqRead;
pub use rearrangement::{resolve_rearrangement, RearrangementRecord, SideCall};
pub use record::{Barcode, DcrRecord};
pub use tag_match::{MatchTier, TagMatch, TagMatcher};

//!
//! End-to-end single-tag TCR analysis: decombine a FASTQ, rebuild reads from
//! V-only/J-only pairs and decombine the rebuilt reads.
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

pub mod args;
pub mod io_utils;
pub mod naming;
pub mod pipeline;
pub mod summary;

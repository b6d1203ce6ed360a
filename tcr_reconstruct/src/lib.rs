//!
//! Rebuilding full V-J reads from pairs of partial reads: V-only reads whose
//! 3' end overlaps the 5' end of a J-only read of the same locus.
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

use anyhow::Result;
use log::info;

pub mod config;
pub mod counts;
pub mod overlap;
pub mod pool;
pub mod ranker;
pub mod scheduler;

pub use config::ReconstructConfig;
pub use counts::ReconstructionCounts;
pub use overlap::{CandidateAlignment, OverlapAligner};
pub use pool::{PartialPools, PartialRead};
pub use ranker::{assign, synthesize, Assignment, Ranking, TcrCandidate};
pub use scheduler::ReconstructionScheduler;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconstruction<'a> {
    pub ranking: Ranking<'a>,
    pub counts: ReconstructionCounts,
}

/// Align, rank and synthesize in one go.
pub fn reconstruct<'a>(pools: &'a PartialPools, config: &ReconstructConfig) -> Result<Reconstruction<'a>> {
    let mut counts = ReconstructionCounts {
        v_only: pools.v_only.len() as u64,
        j_only: pools.j_only.len() as u64,
        ..Default::default()
    };
    if pools.nothing_to_pair() {
        info!("No V-only/J-only pairs to reconstruct");
        counts.unreconstructable = counts.v_only;
        let ranking = Ranking {
            assignments: Vec::new(),
            unreconstructable: pools.v_only.iter().map(|v| v.id.clone()).collect(),
        };
        return Ok(Reconstruction { ranking, counts });
    }

    let candidates = ReconstructionScheduler::new(config).run(pools)?;
    counts.alignments = candidates.iter().map(|c| c.alignments.len() as u64).sum();
    let ranking = assign(pools, candidates);
    counts.reconstructed = ranking.assignments.len() as u64;
    counts.unreconstructable = ranking.unreconstructable.len() as u64;
    info!(
        "Reconstructed {} reads, {} V-only reads left unpaired",
        counts.reconstructed, counts.unreconstructable
    );
    Ok(Reconstruction { ranking, counts })
}

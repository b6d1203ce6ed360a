use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionCounts {
    pub v_only: u64,
    pub j_only: u64,
    /// Accepted overlaps across all V/J pairs.
    pub alignments: u64,
    pub reconstructed: u64,
    pub unreconstructable: u64,
}

impl ReconstructionCounts {
    pub fn merge(&mut self, other: &ReconstructionCounts) {
        self.v_only += other.v_only;
        self.j_only += other.j_only;
        self.alignments += other.alignments;
        self.reconstructed += other.reconstructed;
        self.unreconstructable += other.unreconstructable;
    }
}

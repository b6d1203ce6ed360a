use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructConfig {
    /// Length of the V read suffix used to seed overlaps. Split into two
    /// halves that are searched for independently.
    pub min_overlap: usize,
    /// Bases removed from the end of every J read before searching, the
    /// region holding the J tag.
    pub j_tail_trim: usize,
    /// V reads aligned per parallel batch.
    pub chunk_size: usize,
    /// Worker threads. All cores when unset.
    pub threads: Option<usize>,
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        ReconstructConfig {
            min_overlap: 8,
            j_tail_trim: 20,
            chunk_size: 100,
            threads: None,
        }
    }
}

use serde::{Deserialize, Serialize};
use tcr_types::Orientation;

/// Length of the cell barcode at the start of every read, when present.
pub const DEFAULT_BARCODE_LEN: usize = 30;
/// Longest inter-tag sequence that is still reported.
pub const DEFAULT_LEN_THRESHOLD: usize = 130;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecombineConfig {
    pub orientation: Orientation,
    /// `None` disables barcode handling.
    pub barcode_len: Option<usize>,
    /// Keep records whose sequence contains an N.
    pub allow_ns: bool,
    pub len_threshold: usize,
}

impl Default for DecombineConfig {
    fn default() -> Self {
        DecombineConfig {
            orientation: Orientation::default(),
            barcode_len: Some(DEFAULT_BARCODE_LEN),
            allow_ns: false,
            len_threshold: DEFAULT_LEN_THRESHOLD,
        }
    }
}

impl DecombineConfig {
    /// Settings used to decombine reads rebuilt from partial reads: they are
    /// already in the forward frame and carry no barcode.
    pub fn for_reconstructed(&self) -> Self {
        DecombineConfig {
            orientation: Orientation::Forward,
            barcode_len: None,
            ..self.clone()
        }
    }
}

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tcr_decombine::{DecombineConfig, DecombineCounts};
use tcr_reconstruct::{ReconstructConfig, ReconstructionCounts};
use tcr_reference::{Species, TagSet};
use tcr_types::TcrLocus;

/// Everything worth keeping about a run: inputs, settings and counters of
/// the three phases.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub version: &'static str,
    pub start_time: String,
    pub end_time: String,
    pub inputs: Vec<PathBuf>,
    pub loci: Vec<TcrLocus>,
    pub species: Species,
    /// The tag set actually loaded, after any fallback.
    pub tag_set: TagSet,
    pub decombine_config: DecombineConfig,
    pub reconstruct_config: ReconstructConfig,
    pub decombined: DecombineCounts,
    pub fraction_decombined: f64,
    pub reconstruction: ReconstructionCounts,
    /// Counters from decombining the reconstructed reads.
    pub redecombined: DecombineCounts,
    pub outputs: Vec<PathBuf>,
}

impl RunSummary {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| parent.display().to_string())?;
        }
        let f = File::create(path).with_context(|| path.display().to_string())?;
        let mut writer = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summary_json() {
        let summary = RunSummary {
            version: "0.1.0",
            start_time: "2024-01-31T10:00:00".to_string(),
            end_time: "2024-01-31T10:01:00".to_string(),
            inputs: vec![PathBuf::from("reads.fq.gz")],
            loci: vec![TcrLocus::TRA],
            species: Species::Mouse,
            tag_set: TagSet::Original,
            decombine_config: DecombineConfig::default(),
            reconstruct_config: ReconstructConfig::default(),
            decombined: DecombineCounts {
                reads: 4,
                records: 3,
                ..Default::default()
            },
            fraction_decombined: 0.75,
            reconstruction: ReconstructionCounts::default(),
            redecombined: DecombineCounts::default(),
            outputs: Vec::new(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Logs").join("summary.json");
        summary.write_json(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["loci"], serde_json::json!(["TRA"]));
        assert_eq!(json["species"], "mouse");
        assert_eq!(json["tag_set"], "original");
        assert_eq!(json["decombined"]["records"], 3);
        assert_eq!(json["fraction_decombined"], 0.75);
        assert_eq!(json["decombine_config"]["orientation"], "reverse");
    }
}

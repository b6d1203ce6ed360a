//! Where a run writes its files.

use anyhow::{Context, Result};
use itertools::Itertools;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tcr_types::TcrLocus;

pub const ANALYSIS_DIR: &str = "SingleTagAnalysis";
pub const RECONSTRUCTED_PREFIX: &str = "bfd";
/// Prefix of the records decombined from reconstructed reads.
pub const REDECOMBINED_PREFIX: &str = "dcr_";
pub const LOG_DIR: &str = "Logs";

/// Create the first of `SingleTagAnalysis`, `SingleTagAnalysis1`,
/// `SingleTagAnalysis2`, ... under `parent` that does not exist yet.
pub fn create_analysis_dir(parent: &Path) -> Result<PathBuf> {
    fs::create_dir_all(parent).with_context(|| parent.display().to_string())?;
    let mut n = 0usize;
    loop {
        let dir = match n {
            0 => parent.join(ANALYSIS_DIR),
            n => parent.join(format!("{ANALYSIS_DIR}{n}")),
        };
        match fs::create_dir(&dir) {
            Ok(()) => return Ok(dir),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(err) => return Err(err).with_context(|| dir.display().to_string()),
        }
    }
}

fn file_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.split('.').next().unwrap_or_default().to_string()
}

/// File name up to the first `.`. With two inputs the `_`-separated parts of
/// both names are joined, dropping repeats, so `S1_R1` and `S1_R2` give
/// `S1_R1_R2`.
pub fn sample_name(fastq: &Path, fastq2: Option<&Path>) -> String {
    let first = file_stem(fastq);
    match fastq2 {
        Some(second) => format!("{first}_{}", file_stem(second))
            .split('_')
            .unique()
            .join("_"),
        None => first,
    }
}

/// The output files of one run, all inside the analysis directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub sample: String,
    pub decombined: PathBuf,
    pub reconstructed: PathBuf,
    pub redecombined: PathBuf,
    pub summary: PathBuf,
}

impl OutputPaths {
    /// Decombined records are named `<prefix><sample>.<extension>`. When the
    /// input name does not identify exactly one chain, the chain names are
    /// inserted before the sample.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        dir: &Path,
        fastq: &Path,
        fastq2: Option<&Path>,
        loci: &[TcrLocus],
        prefix: &str,
        extension: &str,
        gzip: bool,
        date: &str,
    ) -> Self {
        let sample = sample_name(fastq, fastq2);
        let suffix = if gzip {
            format!(".{extension}.gz")
        } else {
            format!(".{extension}")
        };
        let named_in_file = TcrLocus::detect_in_file_name(&fastq.to_string_lossy());
        let decombined_stem = if named_in_file.len() == 1 {
            format!("{prefix}{sample}")
        } else {
            format!(
                "{prefix}{}_{sample}",
                loci.iter().map(|l| l.long_name()).join("_")
            )
        };
        let reconstructed_sample = format!("{RECONSTRUCTED_PREFIX}{sample}");
        OutputPaths {
            dir: dir.to_path_buf(),
            decombined: dir.join(format!("{decombined_stem}{suffix}")),
            reconstructed: dir.join(format!("{reconstructed_sample}.fastq")),
            redecombined: dir.join(format!("{REDECOMBINED_PREFIX}{reconstructed_sample}{suffix}")),
            summary: dir
                .join(LOG_DIR)
                .join(format!("{date}_{sample}_Decombinator_Summary.json")),
            sample,
        }
    }
}

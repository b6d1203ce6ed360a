//! Decombine, reconstruct, then decombine the reconstructed reads.

use crate::io_utils::{open_with_gz, OutputFile};
use crate::naming::{create_analysis_dir, OutputPaths};
use crate::summary::RunSummary;
use anyhow::{Context, Result};
use bio::io::fastq;
use chrono::Local;
use log::{info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tcr_decombine::{DecombineConfig, DecombineCounts, Decombiner, SeqRead};
use tcr_reconstruct::{reconstruct, PartialPools, ReconstructConfig};
use tcr_reference::{GermlineCatalog, Species, TagSet};
use tcr_types::TcrLocus;

const PROGRESS_INTERVAL: u64 = 100_000;
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub fastq: PathBuf,
    pub fastq2: Option<PathBuf>,
    pub loci: Vec<TcrLocus>,
    pub species: Species,
    pub tag_set: TagSet,
    pub tag_fasta_dir: PathBuf,
    pub decombine: DecombineConfig,
    pub reconstruct: ReconstructConfig,
    pub prefix: String,
    pub extension: String,
    pub gzip: bool,
    pub write_summary: bool,
    /// Parent of the analysis directory.
    pub out_dir: PathBuf,
}

impl PipelineOptions {
    fn inputs(&self) -> Vec<PathBuf> {
        std::iter::once(self.fastq.clone())
            .chain(self.fastq2.clone())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    pub paths: OutputPaths,
    pub summary: RunSummary,
}

/// Decombine every read of every input into `out`, collecting the V-only and
/// J-only records.
fn decombine_inputs(
    decombiner: &Decombiner<'_>,
    inputs: &[PathBuf],
    out: &mut OutputFile,
    out_path: &Path,
) -> Result<(DecombineCounts, PartialPools)> {
    let mut counts = DecombineCounts::default();
    let mut pools = PartialPools::default();
    for input in inputs {
        info!("Decombining {}", input.display());
        let reader = fastq::Reader::from_bufread(open_with_gz(input)?);
        for record in reader.records() {
            let record = record.with_context(|| format!("reading {}", input.display()))?;
            for dcr in decombiner.decombine(&SeqRead::from(&record), &mut counts) {
                writeln!(out, "{dcr}").with_context(|| out_path.display().to_string())?;
                pools.push(&dcr);
            }
            if counts.reads % PROGRESS_INTERVAL == 0 {
                info!("{} reads processed, {} records", counts.reads, counts.records);
            }
        }
    }
    Ok((counts, pools))
}

pub fn run(options: &PipelineOptions) -> Result<PipelineOutputs> {
    let start = Local::now();
    let timer = Instant::now();

    let catalog = GermlineCatalog::from_dir(
        &options.tag_fasta_dir,
        options.species,
        options.tag_set,
        &options.loci,
    )
    .context("loading TCR tags and reference sequences")?;

    let dir = create_analysis_dir(&options.out_dir)?;
    let paths = OutputPaths::new(
        &dir,
        &options.fastq,
        options.fastq2.as_deref(),
        &options.loci,
        &options.prefix,
        &options.extension,
        options.gzip,
        &start.format("%Y-%m-%d").to_string(),
    );
    info!("Writing output to {}", dir.display());

    let inputs = options.inputs();
    let decombiner = Decombiner::new(&catalog, options.decombine.clone());
    let mut out = OutputFile::create(&paths.decombined, options.gzip)?;
    let (decombined, pools) = decombine_inputs(&decombiner, &inputs, &mut out, &paths.decombined)?;
    out.finish()
        .with_context(|| paths.decombined.display().to_string())?;
    info!(
        "Decombined {} of {} reads ({:.1}%): {} V-only, {} J-only",
        decombined.records,
        decombined.reads,
        100.0 * decombined.fraction_decombined(),
        pools.v_only.len(),
        pools.j_only.len()
    );
    if decombined.records == 0 {
        warn!("No TCR rearrangements found, check the chain and orientation settings");
    }

    let reconstruction = reconstruct(&pools, &options.reconstruct)?;
    let rebuilt: Vec<fastq::Record> = reconstruction
        .ranking
        .assignments
        .iter()
        .map(|a| a.to_fastq())
        .collect();

    let mut writer = fastq::Writer::to_file(&paths.reconstructed)
        .with_context(|| paths.reconstructed.display().to_string())?;
    for record in &rebuilt {
        writer
            .write_record(record)
            .with_context(|| paths.reconstructed.display().to_string())?;
    }
    writer
        .flush()
        .with_context(|| paths.reconstructed.display().to_string())?;

    let redecombiner = Decombiner::new(&catalog, options.decombine.for_reconstructed());
    let mut redecombined = DecombineCounts::default();
    let mut out = OutputFile::create(&paths.redecombined, options.gzip)?;
    for record in &rebuilt {
        for dcr in redecombiner.decombine(&SeqRead::from(record), &mut redecombined) {
            writeln!(out, "{dcr}").with_context(|| paths.redecombined.display().to_string())?;
        }
    }
    out.finish()
        .with_context(|| paths.redecombined.display().to_string())?;
    info!(
        "Decombined {} of {} reconstructed reads",
        redecombined.records, redecombined.reads
    );

    let summary = RunSummary {
        version: env!("CARGO_PKG_VERSION"),
        start_time: start.format(TIME_FORMAT).to_string(),
        end_time: Local::now().format(TIME_FORMAT).to_string(),
        inputs,
        loci: options.loci.clone(),
        species: options.species,
        tag_set: catalog.tag_set(),
        decombine_config: options.decombine.clone(),
        reconstruct_config: options.reconstruct.clone(),
        decombined,
        fraction_decombined: decombined.fraction_decombined(),
        reconstruction: reconstruction.counts,
        redecombined,
        outputs: vec![
            paths.decombined.clone(),
            paths.reconstructed.clone(),
            paths.redecombined.clone(),
        ],
    };
    if options.write_summary {
        summary.write_json(&paths.summary)?;
    }
    info!("Finished in {:.1}s", timer.elapsed().as_secs_f64());
    Ok(PipelineOutputs { paths, summary })
}

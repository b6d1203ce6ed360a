use crate::pipeline::PipelineOptions;
use anyhow::{anyhow, bail, Result};
use clap::{value_parser, Parser};
use itertools::Itertools;
use std::path::{Path, PathBuf};
use tcr_decombine::config::{DEFAULT_BARCODE_LEN, DEFAULT_LEN_THRESHOLD};
use tcr_decombine::DecombineConfig;
use tcr_reconstruct::ReconstructConfig;
use tcr_reference::{Species, TagSet};
use tcr_types::{Orientation, TcrLocus};

/// Find rearranged TCR sequences in single-tag reads, then rebuild reads in
/// which only one of the V and J tags was found.
#[derive(Parser, Debug, Clone)]
#[clap(name = "single_tag")]
pub struct Args {
    /// FASTQ file of TCR reads, optionally gzipped.
    #[clap(long)]
    pub fastq: PathBuf,

    /// Second FASTQ file, analysed after the first one (e.g. R2 of a pair).
    #[clap(long)]
    pub fastq2: Option<PathBuf>,

    /// TCR chains to search for (a/b/g/d, alpha/beta/..., TRA/TRB/...).
    /// Inferred from the FASTQ file name when not given.
    #[clap(long, num_args = 1..)]
    pub chain: Vec<String>,

    /// Strand(s) to search: forward, reverse, either or both.
    #[clap(long, default_value_t = Orientation::Reverse)]
    pub orientation: Orientation,

    /// Tag set to use, extended or original.
    #[clap(long, default_value_t = TagSet::Extended)]
    pub tags: TagSet,

    /// Species of the TCR repertoire, human or mouse.
    #[clap(long, default_value_t = Species::Human)]
    pub species: Species,

    /// Keep rearrangements containing ambiguous base calls (N).
    #[clap(long = "allow-ns")]
    pub allow_ns: bool,

    /// Longest acceptable inter-tag (V to J) sequence.
    #[clap(long = "len-threshold", default_value_t = DEFAULT_LEN_THRESHOLD)]
    pub len_threshold: usize,

    /// Folder containing the TCR FASTA and tag files.
    #[clap(long = "tag-fasta-dir", default_value = "Decombinator-Tags-FASTAs")]
    pub tag_fasta_dir: PathBuf,

    /// Reads do not start with a barcode.
    #[clap(long = "no-barcoding")]
    pub no_barcoding: bool,

    /// Length of the barcode at the start of each read.
    #[clap(long = "bc-length", default_value_t = DEFAULT_BARCODE_LEN, conflicts_with = "no_barcoding")]
    pub bc_length: usize,

    /// Number of threads for aligning partial reads. Defaults to all cores.
    #[clap(long, value_parser = value_parser!(u32).range(1..))]
    pub nproc: Option<u32>,

    /// Prefix of the decombined output file.
    #[clap(long, default_value = "dcr_")]
    pub prefix: String,

    /// Extension of the decombined output file.
    #[clap(long, default_value = "n12")]
    pub extension: String,

    /// Do not gzip the decombined output files.
    #[clap(long = "dont-gzip")]
    pub dont_gzip: bool,

    /// Do not write the JSON summary.
    #[clap(long = "suppress-summary")]
    pub suppress_summary: bool,

    /// Directory in which the SingleTagAnalysis folder is created.
    #[clap(long = "out-dir", default_value = ".")]
    pub out_dir: PathBuf,
}

/// Chains named on the command line, or failing that the chains named in the
/// FASTQ file name. Repeats are dropped.
pub fn resolve_loci(chains: &[String], fastq: &Path) -> Result<Vec<TcrLocus>> {
    if chains.is_empty() {
        let file_name = fastq
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let detected = TcrLocus::detect_in_file_name(&file_name);
        if detected.is_empty() {
            bail!(
                "No TCR chain given and none could be inferred from the file name {}. \
                 Use --chain to select one.",
                fastq.display()
            );
        }
        return Ok(detected);
    }
    chains
        .iter()
        .map(|c| {
            TcrLocus::from_chain_name(c)
                .ok_or_else(|| anyhow!("Unknown chain '{c}', expected one of a, b, g or d"))
        })
        .collect::<Result<Vec<_>>>()
        .map(|loci| loci.into_iter().unique().collect())
}

impl Args {
    pub fn into_options(self) -> Result<PipelineOptions> {
        let loci = resolve_loci(&self.chain, &self.fastq)?;
        Ok(PipelineOptions {
            loci,
            decombine: DecombineConfig {
                orientation: self.orientation,
                barcode_len: (!self.no_barcoding).then_some(self.bc_length),
                allow_ns: self.allow_ns,
                len_threshold: self.len_threshold,
            },
            reconstruct: ReconstructConfig {
                threads: self.nproc.map(|n| n as usize),
                ..Default::default()
            },
            fastq: self.fastq,
            fastq2: self.fastq2,
            species: self.species,
            tag_set: self.tags,
            tag_fasta_dir: self.tag_fasta_dir,
            prefix: self.prefix,
            extension: self.extension,
            gzip: !self.dont_gzip,
            write_summary: !self.suppress_summary,
            out_dir: self.out_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("single_tag").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let options = parse(&["--fastq", "S1_beta.fq.gz"]).into_options().unwrap();
        assert_eq!(options.loci, vec![TcrLocus::TRB]);
        assert_eq!(options.decombine, DecombineConfig::default());
        assert_eq!(options.reconstruct, ReconstructConfig::default());
        assert_eq!(options.species, Species::Human);
        assert_eq!(options.tag_set, TagSet::Extended);
        assert_eq!(options.tag_fasta_dir, PathBuf::from("Decombinator-Tags-FASTAs"));
        assert_eq!(options.prefix, "dcr_");
        assert_eq!(options.extension, "n12");
        assert!(options.gzip);
        assert!(options.write_summary);
    }

    #[test]
    fn test_flags() {
        let options = parse(&[
            "--fastq",
            "reads.fq",
            "--chain",
            "a",
            "TRB",
            "alpha",
            "--orientation",
            "both",
            "--tags",
            "original",
            "--species",
            "mouse",
            "--allow-ns",
            "--len-threshold",
            "90",
            "--no-barcoding",
            "--nproc",
            "4",
            "--dont-gzip",
            "--suppress-summary",
        ])
        .into_options()
        .unwrap();
        assert_eq!(options.loci, vec![TcrLocus::TRA, TcrLocus::TRB]);
        assert_eq!(
            options.decombine,
            DecombineConfig {
                orientation: Orientation::Both,
                barcode_len: None,
                allow_ns: true,
                len_threshold: 90,
            }
        );
        assert_eq!(options.reconstruct.threads, Some(4));
        assert_eq!(options.species, Species::Mouse);
        assert_eq!(options.tag_set, TagSet::Original);
        assert!(!options.gzip);
        assert!(!options.write_summary);
    }

    #[test]
    fn test_chain_errors() {
        let err = parse(&["--fastq", "reads.fq"]).into_options().unwrap_err();
        assert!(err.to_string().starts_with("No TCR chain given"));
        let err = parse(&["--fastq", "reads.fq", "--chain", "igh"])
            .into_options()
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown chain 'igh', expected one of a, b, g or d");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let parse_err = |args: &[&str]| {
            Args::try_parse_from(std::iter::once("single_tag").chain(args.iter().copied())).is_err()
        };
        assert!(parse_err(&["--fastq", "r.fq", "--orientation", "sideways"]));
        assert!(parse_err(&["--fastq", "r.fq", "--nproc", "0"]));
        assert!(parse_err(&["--chain", "a"]));
    }
}

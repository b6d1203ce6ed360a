use anyhow::Result;
use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use log::{info, LevelFilter};
use single_tag::args::Args;
use single_tag::pipeline;
use std::io::Write;

fn main() -> Result<()> {
    let args = Args::parse();

    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();

    let outputs = pipeline::run(&args.into_options()?)?;
    info!("Output files have been saved to:");
    for path in &outputs.summary.outputs {
        info!("  {}", path.display());
    }
    Ok(())
}

//! Detect f01/f12 resonances in plotly-style qubit spectroscopy figures.
//!
//! ```bash
//! qubit-response -c testdata/config.json -f testdata/qubit_mountain.json --json
//! qubit-response -c config.json -f q1.json -f q2.json --image-dir out --jobs 4
//! ```

use std::path::PathBuf;

use clap::Parser;
use qubit_response::batch::{analyze_files, FileReport};
use qubit_response::{DetectorParams, QubitResponseDetector};

use qubit_response::core::parse_level_filter;
#[cfg(feature = "tracing")]
use qubit_response::core::init_tracing;
#[cfg(not(feature = "tracing"))]
use qubit_response::core::init_with_level;

#[derive(Parser, Debug)]
#[command(
    name = "qubit-response",
    version,
    about = "Detect f01/f12 resonances in qubit spectroscopy figures"
)]
struct Cli {
    /// Figure JSON file; repeat for several inputs.
    #[arg(short = 'f', long = "input-file", required = true)]
    input_files: Vec<PathBuf>,

    /// Detector configuration JSON.
    #[arg(short = 'c', long = "conf-file")]
    conf_file: PathBuf,

    /// Write annotated PNGs under this directory.
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Print one JSON record per input on stdout.
    #[arg(long)]
    json: bool,

    /// off, error, warn, info, debug or trace. `RUST_LOG` takes precedence
    /// in `tracing` builds.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit log events as JSON objects.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    log_json: bool,

    /// Worker threads (rayon default when omitted).
    #[arg(long)]
    jobs: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = parse_level_filter(&cli.log_level)
        .ok_or_else(|| format!("unknown log level `{}`", cli.log_level))?;

    #[cfg(not(feature = "tracing"))]
    init_with_level(level)?;

    #[cfg(feature = "tracing")]
    init_tracing(cli.log_json, level);

    run(cli)
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip(cli)))]
fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(jobs) = cli.jobs {
        if jobs == 0 {
            return Err("--jobs must be >= 1".into());
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()?;
    }

    let params = DetectorParams::load_json(&cli.conf_file)
        .map_err(|err| format!("{}: {err}", cli.conf_file.display()))?;
    let detector = QubitResponseDetector::new(params)
        .map_err(|err| format!("{}: {err}", cli.conf_file.display()))?;

    let reports = analyze_files(&cli.input_files, &detector, cli.image_dir.as_deref());
    for report in &reports {
        if cli.json {
            println!("{}", serde_json::to_string(report)?);
        } else {
            summarize(report);
        }
    }
    Ok(())
}

fn summarize(report: &FileReport) {
    let record = &report.record;
    let freq = |f: Option<f64>| f.map_or_else(|| "-".to_string(), |f| format!("{f:.6}"));
    match record.error.as_deref() {
        None => log::info!(
            "qubit {} ({}): f01={} f12={} quality={}",
            report.qubit_id,
            report.path.display(),
            freq(record.f01_frequency),
            freq(record.f12_frequency),
            record.quality_level.unwrap_or(0)
        ),
        Some(err) => log::error!(
            "qubit {} ({}): {}",
            report.qubit_id,
            report.path.display(),
            err
        ),
    }
}

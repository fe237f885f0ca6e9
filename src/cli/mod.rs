//! Command-line interface
//!
//! Each subcommand is a pure function over the engine for testability;
//! the binary is a thin parse-and-dispatch shell. Output goes to stdout
//! as text or JSON, progress chatter to stderr behind `--verbose`.

mod args;

pub use args::{Args, Command};

use std::io::Write as _;
use std::path::Path;

use crate::error::PhonoscopeError;
use crate::{parallel, ForensicReport, Phonoscope, TrackInfo};

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Engine failure
    #[error("{0}")]
    Engine(#[from] PhonoscopeError),

    /// I/O failure writing output
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// Run the CLI with parsed arguments.
///
/// # Errors
/// Any engine, I/O, or serialization failure from the subcommand.
pub fn run(args: Args) -> CliResult<()> {
    let workers = parallel::set_worker_threads(args.threads);
    if args.verbose {
        eprintln!("[INFO] using {workers} worker thread(s)");
    }
    let engine = Phonoscope::new();

    match args.command {
        Command::Info { input, json } => run_info(&engine, &input, json, args.verbose),
        Command::Analyze { input, json } => run_analyze(&engine, &input, json, args.verbose),
        Command::Spectrogram {
            input,
            max_freq,
            output,
            json,
        } => run_spectrogram(&engine, &input, max_freq, output.as_deref(), json, args.verbose),
        Command::Export {
            input,
            output,
            start,
            end,
        } => run_export(&engine, &input, &output, start, end, args.quiet),
    }
}

fn load(engine: &Phonoscope, input: &Path, verbose: bool) -> CliResult<TrackInfo> {
    if verbose {
        eprintln!("[INFO] loading {}", input.display());
    }
    let info = engine.load_audio(input)?;
    if verbose {
        eprintln!(
            "[INFO] {:.2}s, {} Hz, {} channel(s)",
            info.duration, info.sample_rate, info.channels
        );
    }
    Ok(info)
}

fn run_info(engine: &Phonoscope, input: &Path, json: bool, verbose: bool) -> CliResult<()> {
    let info = load(engine, input, verbose)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Duration:     {:.3} s", info.duration);
        println!("Sample rate:  {} Hz", info.sample_rate);
        println!("Channels:     {}", info.channels);
    }
    Ok(())
}

fn run_analyze(engine: &Phonoscope, input: &Path, json: bool, verbose: bool) -> CliResult<()> {
    load(engine, input, verbose)?;
    let report = engine.analyze_forensics()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }
    Ok(())
}

/// Human-readable forensic summary.
fn format_report(report: &ForensicReport) -> String {
    let mut out = String::new();

    if report.enf_present {
        out.push_str(&format!(
            "ENF:           {} Hz hum, {:.1} dB over the noise floor\n",
            report.grid_freq, report.enf_strength_db
        ));
    } else {
        out.push_str("ENF:           not detected\n");
    }

    if report.splice_times.is_empty() {
        out.push_str("Splices:       none\n");
    } else {
        let times: Vec<String> = report
            .splice_times
            .iter()
            .map(|t| format!("{t:.3}s"))
            .collect();
        out.push_str(&format!(
            "Splices:       {} ({})\n",
            report.splice_times.len(),
            times.join(", ")
        ));
    }

    if report.has_clipping {
        out.push_str(&format!(
            "Clipping:      {} samples at full scale\n",
            report.clipped_count
        ));
    } else {
        out.push_str("Clipping:      none\n");
    }

    out.push_str(&format!("SNR:           {:.1} dB\n", report.snr_db));
    out.push_str(&format!(
        "Dynamic range: {:.1} dB\n",
        report.dynamic_range_db
    ));
    out
}

fn run_spectrogram(
    engine: &Phonoscope,
    input: &Path,
    max_freq: f64,
    output: Option<&Path>,
    json: bool,
    verbose: bool,
) -> CliResult<()> {
    load(engine, input, verbose)?;
    let spec = engine.compute_spectrogram(max_freq)?;

    if let Some(path) = output {
        let mut file = std::fs::File::create(path)?;
        serde_json::to_writer(&mut file, &spec)?;
        file.flush()?;
        if verbose {
            eprintln!("[INFO] wrote {}", path.display());
        }
    } else if json {
        println!("{}", serde_json::to_string(&spec)?);
    } else {
        let bins = spec.data.first().map_or(0, Vec::len);
        let span = spec.times.last().copied().unwrap_or(0.0);
        println!(
            "{} frames x {} bins, 0.000-{:.3} s, up to {:.0} Hz",
            spec.data.len(),
            bins,
            span,
            spec.max_freq
        );
    }
    Ok(())
}

fn run_export(
    engine: &Phonoscope,
    input: &Path,
    output: &Path,
    start: f64,
    end: Option<f64>,
    quiet: bool,
) -> CliResult<()> {
    let info = load(engine, input, false)?;
    let end = end.unwrap_or(info.duration);
    engine.export_audio(output, start, end)?;
    if !quiet {
        println!("Exported [{start:.3}s, {end:.3}s) to {}", output.display());
    }
    Ok(())
}

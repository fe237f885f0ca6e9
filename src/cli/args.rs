//! CLI argument definitions
//!
//! Thin clap layer over the command surface; parsing only, no logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// phonoscope: audio forensics engine
#[derive(Debug, Parser)]
#[command(
    name = "phonoscope",
    version,
    about = "Audio forensics engine: spectrograms, ENF/splice analysis, PCM export"
)]
pub struct Args {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Print progress information to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Worker threads for analysis (default: logical CPU count)
    #[arg(long, global = true)]
    pub threads: Option<u32>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show metadata of an audio file
    Info {
        /// Audio file to inspect
        input: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run the forensic battery over an audio file
    Analyze {
        /// Audio file to analyze
        input: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Compute a spectrogram
    Spectrogram {
        /// Audio file to analyze
        input: PathBuf,

        /// Upper frequency bound in Hz
        #[arg(long, default_value_t = 8_000.0)]
        max_freq: f64,

        /// Write the full JSON matrix to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the full JSON matrix to stdout
        #[arg(long)]
        json: bool,
    },

    /// Export a time range as a 16-bit PCM WAV file
    Export {
        /// Source audio file
        input: PathBuf,

        /// Destination WAV path
        output: PathBuf,

        /// Range start in seconds
        #[arg(long, default_value_t = 0.0)]
        start: f64,

        /// Range end in seconds (defaults to the end of the track)
        #[arg(long)]
        end: Option<f64>,
    },
}

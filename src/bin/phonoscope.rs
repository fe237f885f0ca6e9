//! phonoscope CLI: command-line front-end for the forensics engine
//!
//! This is a thin shell that delegates to library functions; all logic
//! lives in `phonoscope::cli` for testability.

use clap::Parser;
use phonoscope::cli::{run, Args};

fn main() {
    #[cfg(feature = "tracing")]
    init_tracing();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

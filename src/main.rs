//! CLI front-end: decompresses a single gzip file to stdout.
//!
//! ```text
//! gzrs <FILE>
//! ```

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// A gzip (RFC 1952) / DEFLATE (RFC 1951) decompressor.
#[derive(Parser, Debug)]
#[command(name = "gzrs", version, about)]
struct Args {
    /// Path to the gzip file to decompress.
    file: PathBuf,

    /// Increase log verbosity (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(err) = run(&args) {
        eprintln!("gzrs: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(args: &Args) -> anyhow::Result<()> {
    let input = BufReader::new(File::open(&args.file)?);
    let stdout = io::stdout();
    gzrs::gzip::decompress(input, stdout.lock())?;
    Ok(())
}

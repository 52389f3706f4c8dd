mod engine;
mod game;
mod protocol;
mod session;

use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

/// Referee for a fixed-length word guessing game, driven by a line protocol
/// on stdin.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Session transcript to play back instead of stdin
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let out = BufWriter::new(io::stdout().lock());
    let result = match &args.input {
        Some(path) => match File::open(path) {
            Ok(file) => session::run(BufReader::new(file), out),
            Err(e) => {
                eprintln!("Error: cannot open {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => session::run(io::stdin().lock(), out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

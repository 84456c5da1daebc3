//! Reads a TGF graph from the path given as the first argument and prints
//! its exact all-terminal reliability.
use std::env;
use std::process::ExitCode;

use atr_reliability::{calculate_atr, tgf};

fn main() -> ExitCode {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "atr".to_string());
    let Some(path) = args.next() else {
        eprintln!("usage: {program} <path-to-tgf-file>");
        return ExitCode::FAILURE;
    };

    let matrix = match tgf::parse_file(&path) {
        Ok(matrix) => matrix,
        Err(err) => {
            eprintln!("{program}: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("ATR: {}", calculate_atr(&matrix));
    ExitCode::SUCCESS
}

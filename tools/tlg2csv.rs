// tools/tlg2csv.rs
// Convert a TLG trade log on disk into a CSV file, without the HTTP service.
//
// Run with:
//   cargo run --bin tlg2csv -- ./U1234567_20241218_20250203.tlg
// or specify output path:
//   cargo run --bin tlg2csv -- ./in.tlg ./data/trades.csv

use std::path::PathBuf;

use tracing::Level;
use tracing_subscriber::EnvFilter;

use tlg_converter::convert::{convert_file, output_filename};

const INPUT_EXTENSION: &str = ".tlg";
const OUTPUT_EXTENSION: &str = ".csv";

#[derive(Debug, PartialEq, Eq)]
struct Job {
    input: PathBuf,
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let job = match parse_args(&args) {
        Ok(job) => job,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(1);
        }
    };

    if let Some(parent) = job.output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let summary = convert_file(&job.input, &job.output)?;
    println!(
        "Wrote {} ({} trades, {} lines skipped)",
        job.output.display(),
        summary.records_written,
        summary.lines_skipped
    );
    Ok(())
}

/// `<program> <input.tlg> [output.csv]`. Output defaults to the input path
/// with its extension swapped.
fn parse_args(args: &[String]) -> Result<Job, String> {
    let program = args.first().map(String::as_str).unwrap_or("tlg2csv");
    if args.len() < 2 || args.len() > 3 {
        return Err(format!(
            "Usage: {program} <input{INPUT_EXTENSION}> [output{OUTPUT_EXTENSION}]"
        ));
    }

    let input = &args[1];
    if !input.ends_with(INPUT_EXTENSION) {
        return Err(format!("Error: The file must have a {INPUT_EXTENSION} extension"));
    }

    let output = match args.get(2) {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(output_filename(input, INPUT_EXTENSION, OUTPUT_EXTENSION)),
    };
    Ok(Job {
        input: PathBuf::from(input),
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn output_defaults_to_swapped_extension() {
        let job = parse_args(&args(&["tlg2csv", "data/U1_20241218.tlg"])).unwrap();
        assert_eq!(job.input, PathBuf::from("data/U1_20241218.tlg"));
        assert_eq!(job.output, PathBuf::from("data/U1_20241218.csv"));
    }

    #[test]
    fn explicit_output_is_kept() {
        let job = parse_args(&args(&["tlg2csv", "in.tlg", "out/trades.csv"])).unwrap();
        assert_eq!(job.output, PathBuf::from("out/trades.csv"));
    }

    #[test]
    fn wrong_extension_is_refused() {
        let err = parse_args(&args(&["tlg2csv", "trades.txt"])).unwrap_err();
        assert_eq!(err, "Error: The file must have a .tlg extension");
    }

    #[test]
    fn bad_arg_count_prints_usage() {
        let err = parse_args(&args(&["tlg2csv"])).unwrap_err();
        assert!(err.starts_with("Usage: tlg2csv "));
        assert!(parse_args(&args(&["tlg2csv", "a.tlg", "b.csv", "c"])).is_err());
    }

    #[test]
    fn empty_argv_does_not_panic() {
        let err = parse_args(&[]).unwrap_err();
        assert!(err.starts_with("Usage: tlg2csv "));
    }
}

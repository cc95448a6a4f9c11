// Checks that the optimized softmax layer matches the reference one.
//
// Run with:
//   cargo run -- [WIDTH ...] [--json]
use std::process::ExitCode;

use clap::Parser;
use cnn_softmax::{compare_variants, TdSize, VariantCheck, DEFAULT_CHECK_SIZES};
use tracing::error;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Compare the optimized softmax layer against the reference on WIDTHx1x1 tensors"
)]
struct Args {
    /// Tensor widths to check; defaults to 1, 16 and 47
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    widths: Vec<u64>,

    /// Print the reports as pretty JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let widths: Vec<usize> = if args.widths.is_empty() {
        DEFAULT_CHECK_SIZES.to_vec()
    } else {
        args.widths.iter().map(|&w| w as usize).collect()
    };

    let mut rng = rand::thread_rng();
    let mut checks: Vec<VariantCheck> = Vec::with_capacity(widths.len());
    for w in widths {
        match compare_variants(TdSize::new(w, 1, 1), &mut rng) {
            Ok(check) => checks.push(check),
            Err(e) => {
                error!("variant check failed for width {w}: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    if args.json {
        match serde_json::to_string_pretty(&checks) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                error!("could not serialize results: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for c in &checks {
            println!(
                "{:>10}  {}  max |Δout| = {:.3e}  max |Δgrad| = {:.3e}",
                c.size.to_string(),
                if c.equal { "equal" } else { "DIFFERENT" },
                c.max_out_diff,
                c.max_grad_diff,
            );
        }
    }

    if checks.iter().all(|c| c.equal) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_and_json_flag_parse() {
        let args = Args::try_parse_from(["cnn-softmax", "4", "16", "--json"]).unwrap();
        assert_eq!(args.widths, vec![4, 16]);
        assert!(args.json);

        let args = Args::try_parse_from(["cnn-softmax"]).unwrap();
        assert!(args.widths.is_empty());
        assert!(!args.json);
    }

    #[test]
    fn zero_or_non_numeric_width_is_rejected() {
        assert!(Args::try_parse_from(["cnn-softmax", "0"]).is_err());
        assert!(Args::try_parse_from(["cnn-softmax", "wide"]).is_err());
    }

    #[test]
    fn help_prints_usage() {
        let err = Args::try_parse_from(["cnn-softmax", "--help"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}

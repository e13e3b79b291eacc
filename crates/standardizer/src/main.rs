//! Telemetry Standardizer - CLI Entry Point

use anyhow::{bail, Context, Result};
use clap::Parser;
use data_contract::{ContractError, ContractLock, DataContract, StandardizationConfig};
use standardizer::{init_logging, BatchRunner, FileOutcome, Standardizer};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "resample-to-contract")]
#[command(about = "Standardize telemetry CSVs to the contract sampling rate")]
struct Cli {
    /// Glob selecting the raw input CSV files
    #[arg(long)]
    input_glob: String,

    /// Directory receiving standardized files
    #[arg(long)]
    output_dir: PathBuf,

    /// Contract YAML (frozen contract defaults when omitted)
    #[arg(long)]
    contract: Option<PathBuf>,

    /// Lock file the contract must hash to
    #[arg(long, requires = "contract")]
    lock: Option<PathBuf>,

    /// Override the contract sampling rate
    #[arg(long)]
    rate_hz: Option<u32>,

    /// Override the contract gap tolerance (seconds)
    #[arg(long)]
    max_gap_seconds: Option<f64>,

    /// Files processed concurrently
    #[arg(long, default_value_t = 1)]
    jobs: usize,

    /// Exit non-zero when more than this many files are skipped or fail
    #[arg(long)]
    max_skips: Option<usize>,

    /// Write a JSON batch report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("[ERROR] {e:#}");
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Process exit status for a fatal error: 2 on a contract lock mismatch, 1 otherwise
fn exit_status(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<ContractError>() {
        Some(ContractError::LockMismatch { .. }) => 2,
        _ => 1,
    }
}

fn no_match_line(pattern: &str) -> String {
    format!("[INFO] No input files matched: {pattern}")
}

async fn run(cli: Cli) -> Result<u8> {
    let config = load_config(&cli)?;
    info!(
        "Standardizing at {} Hz, max gap {}s",
        config.resample.rate_hz, config.resample.max_gap_seconds
    );

    let inputs = expand_glob(&cli.input_glob)?;
    if inputs.is_empty() {
        println!("{}", no_match_line(&cli.input_glob));
        return Ok(0);
    }

    let standardizer = Standardizer::new(config)?;
    let runner = BatchRunner::new(standardizer, &cli.output_dir)
        .with_context(|| format!("creating output dir {}", cli.output_dir.display()))?;

    let print = |outcome: &FileOutcome| println!("{}", outcome.status_line());
    let report = if cli.jobs > 1 {
        runner.run_parallel(&inputs, cli.jobs, print).await
    } else {
        runner.run(&inputs, print)
    };

    if let Some(path) = &cli.report {
        std::fs::write(path, report.to_json()?)
            .with_context(|| format!("writing report {}", path.display()))?;
    }

    if report.exceeds_skip_limit(cli.max_skips) {
        warn!(
            "{} files skipped or failed, limit is {:?}",
            report.skipped() + report.failed(),
            cli.max_skips
        );
        return Ok(1);
    }
    Ok(0)
}

fn load_config(cli: &Cli) -> Result<StandardizationConfig> {
    let config = match &cli.contract {
        Some(path) => {
            if let Some(lock) = &cli.lock {
                ContractLock::verify(path, lock)?;
            }
            DataContract::load(path)?.to_standardization_config()?
        }
        None => StandardizationConfig::default(),
    }
    .with_overrides(cli.rate_hz, cli.max_gap_seconds);

    config.validate()?;
    Ok(config)
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = match glob::glob(pattern) {
        Ok(entries) => entries,
        Err(e) => bail!("invalid input glob {pattern:?}: {e}"),
    };

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => warn!("Unreadable glob entry: {}", e),
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const HEADER: &str = "timestamp,lat,lon,speed,accel,heading";
    const CONTRACT: &str = r#"contract_version: '1.0'
standardization_policy:
  resample:
    target_rate_hz: 5
    fill:
      max_gap_seconds: 3.0
"#;

    fn temp_root() -> PathBuf {
        let root = std::env::temp_dir().join(format!("cli-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(root.join("raw")).unwrap();
        root
    }

    fn cli(root: &Path, extra: &[&str]) -> Cli {
        let glob = root.join("raw").join("*.csv");
        let out = root.join("out");
        let mut args = vec![
            "resample-to-contract".to_string(),
            "--input-glob".to_string(),
            glob.display().to_string(),
            "--output-dir".to_string(),
            out.display().to_string(),
        ];
        args.extend(extra.iter().map(|a| a.to_string()));
        Cli::try_parse_from(args).unwrap()
    }

    #[tokio::test]
    async fn test_skip_limit_exceeded_exits_one() {
        let root = temp_root();
        fs::write(
            root.join("raw").join("no_heading.csv"),
            "timestamp,lat,lon,speed,accel\n0,1,1,1,0\n",
        )
        .unwrap();
        fs::write(
            root.join("raw").join("good.csv"),
            format!("{HEADER}\n0,45,7,1,0,10\n1,45,7,1,0,10\n"),
        )
        .unwrap();

        assert_eq!(run(cli(&root, &["--max-skips", "0"])).await.unwrap(), 1);
        assert_eq!(run(cli(&root, &["--max-skips", "1"])).await.unwrap(), 0);
        assert_eq!(run(cli(&root, &[])).await.unwrap(), 0);

        fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_lock_mismatch_exits_two() {
        let root = temp_root();
        let contract = root.join("data_contract.yaml");
        let lock = root.join("data_contract.lock");
        fs::write(&contract, CONTRACT).unwrap();
        fs::write(&lock, format!("{}\n", ContractLock::digest("something else"))).unwrap();

        let args = [
            "--contract",
            contract.to_str().unwrap(),
            "--lock",
            lock.to_str().unwrap(),
        ];
        let error = run(cli(&root, &args)).await.unwrap_err();
        assert_eq!(exit_status(&error), 2);

        fs::write(&lock, ContractLock::digest(CONTRACT)).unwrap();
        assert_eq!(run(cli(&root, &args)).await.unwrap(), 0);

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_other_errors_exit_one() {
        let error = anyhow::Error::from(ContractError::Invalid("bad".to_string()));
        assert_eq!(exit_status(&error), 1);
        assert_eq!(exit_status(&anyhow::anyhow!("io")), 1);
    }

    #[test]
    fn test_flags_override_contract_values() {
        let root = temp_root();
        let contract = root.join("data_contract.yaml");
        fs::write(&contract, CONTRACT).unwrap();
        let path = contract.to_str().unwrap();

        let from_contract = load_config(&cli(&root, &["--contract", path])).unwrap();
        assert_eq!(from_contract.resample.rate_hz, 5);
        assert_eq!(from_contract.resample.max_gap_seconds, 3.0);

        let overridden = load_config(&cli(
            &root,
            &["--contract", path, "--rate-hz", "20", "--max-gap-seconds", "0.5"],
        ))
        .unwrap();
        assert_eq!(overridden.resample.rate_hz, 20);
        assert_eq!(overridden.resample.max_gap_seconds, 0.5);

        assert!(load_config(&cli(&root, &["--rate-hz", "0"])).is_err());

        fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_no_matching_inputs_is_success() {
        let root = temp_root();
        assert_eq!(run(cli(&root, &[])).await.unwrap(), 0);
        assert!(!root.join("out").exists());
        assert_eq!(
            no_match_line("raw/*.csv"),
            "[INFO] No input files matched: raw/*.csv"
        );

        fs::remove_dir_all(&root).unwrap();
    }
}

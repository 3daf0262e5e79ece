// CLI module - command line interface and argument parsing
// Copyright (C) 2026 pulsecheck contributors
// Licensed under GPL-3.0

use clap::Parser;
use std::path::PathBuf;

/// pulsecheck - periodic HTTP(S) health-reporting probe
///
/// Target lists, webhook destination and retry behaviour come from the
/// environment (optionally seeded from a dotenv file) with a TOML file
/// overriding present keys only; the flags here cover the run itself.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
#[command(name = "pulsecheck")]
#[command(about = "Probe HTTP(S) targets and report their health to a webhook", long_about = None)]
pub struct Args {
    /// TOML config file overriding environment-sourced values
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// dotenv file loaded before reading the environment
    #[arg(long = "env-file", value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long = "timeout", value_name = "SECONDS", default_value_t = 10)]
    pub timeout: u64,

    /// Print the report to stdout instead of posting it
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["pulsecheck"]);
        assert_eq!(args.timeout, 10);
        assert!(!args.dry_run);
        assert!(args.config.is_none());
        assert!(args.env_file.is_none());
    }

    #[test]
    fn test_flags_parse() {
        let args = Args::parse_from([
            "pulsecheck",
            "--config",
            "probe.toml",
            "--timeout",
            "5",
            "--dry-run",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("probe.toml")));
        assert_eq!(args.timeout, 5);
        assert!(args.dry_run);
    }
}

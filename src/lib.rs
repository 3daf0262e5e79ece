// pulsecheck - Periodic HTTP(S) health-reporting probe
// Copyright (C) 2026 pulsecheck contributors
// Licensed under GPL-3.0

//! pulsecheck probes a list of HTTP(S) targets once per invocation,
//! classifies failures, retries transient ones, inspects TLS
//! certificate expiry for healthy HTTPS targets, and posts a single
//! human-readable status report to a webhook, pinging responsible
//! users when a target is unhealthy or a certificate is about to
//! expire.

pub mod alert;
pub mod certificates;
pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod probe;
pub mod report;
pub mod runner;

// Re-export commonly used types
pub use crate::alert::AlertDecisionEngine;
pub use crate::cli::Args;
pub use crate::config::Config;
pub use crate::probe::{HealthCheck, Status, TargetHealthChecker};
pub use crate::report::ReportComposer;
pub use crate::runner::HealthRunner;

/// Result type for pulsecheck operations
pub type Result<T> = anyhow::Result<T>;

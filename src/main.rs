// pulsecheck - Periodic HTTP(S) health-reporting probe
// Copyright (C) 2026 pulsecheck contributors
// Licensed under GPL-3.0
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 3.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use pulsecheck::notify::WebhookNotifier;
use pulsecheck::report::SystemSnapshot;
use pulsecheck::{
    AlertDecisionEngine, Args, Config, HealthRunner, ReportComposer, TargetHealthChecker,
};
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize logging - respect RUST_LOG environment variable
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let args = Args::parse();

    // Seed the environment from a dotenv file. A missing default .env
    // is fine; an explicitly requested file must exist.
    match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .map_err(|e| anyhow::anyhow!("failed to load env file {:?}: {}", path, e))?;
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    let config = match Config::resolve(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let checker = TargetHealthChecker::new(
        config.number_of_attempts,
        Duration::from_secs(config.attempt_interval),
        Duration::from_secs(args.timeout),
    )?;
    let runner = HealthRunner::new(checker, config.max_concurrent_checks);
    let checks = runner.run(&config.observation_targets).await;

    let engine = AlertDecisionEngine::new(config.alert_ssl_expires_in_days);
    let now = Utc::now();
    let should_ping = engine.should_ping(&checks, now);
    if should_ping {
        info!("alert condition met, report will ping responsible users");
    }

    let mut composer = ReportComposer::new(config.pinged_user_ids.clone(), config.attempt_interval);
    if config.include_system_stats {
        composer = composer.with_system_stats(SystemSnapshot::capture());
    }
    let report = composer.compose(&checks, should_ping, &engine, now);

    if args.dry_run {
        println!("{}", report);
        return Ok(());
    }

    let notifier = WebhookNotifier::new(config.webhook_url.clone())?;
    if let Err(e) = notifier.deliver(&report).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    Ok(())
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Feature flag catalog hygiene check.
//!
//! Exits 0 when the catalog is clean and 1 on any violation or load failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use loom_flags_catalog::DEFAULT_CATALOG_PATH;
use loom_flags_hygiene::{check_catalog, DEFAULT_KEY_PREFIX};
use tracing_subscriber::EnvFilter;

const LABEL: &str = "[feature-flags-hygiene]";

/// Validate feature flag catalog metadata.
#[derive(Parser, Debug)]
#[command(name = "loom-flags-hygiene", about = "Validate feature flag catalog hygiene", version)]
struct Args {
	/// Path to the flag catalog.
	#[arg(long, env = "LOOM_FLAGS_CATALOG_PATH", default_value = DEFAULT_CATALOG_PATH)]
	catalog: PathBuf,

	/// Prefix every flag key must start with (followed by a dot).
	#[arg(long, default_value = DEFAULT_KEY_PREFIX)]
	prefix: String,
}

fn main() -> ExitCode {
	let args = Args::parse();

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		)
		.with_writer(std::io::stderr)
		.init();

	let today = chrono::Local::now().date_naive();
	let report = match check_catalog(&args.catalog, &args.prefix, today) {
		Ok(report) => report,
		Err(e) => {
			tracing::debug!(path = %args.catalog.display(), error = ?e, "failed to load flag catalog");
			eprintln!("{LABEL} FAILED");
			eprintln!(" - {e}");
			return ExitCode::FAILURE;
		}
	};

	if !report.is_clean() {
		eprintln!("{LABEL} FAILED");
		for violation in &report.violations {
			eprintln!(" - {violation}");
		}
		return ExitCode::FAILURE;
	}

	println!("{LABEL} OK ({} flags)", report.flag_count);
	ExitCode::SUCCESS
}

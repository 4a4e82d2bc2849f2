// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with consistent User-Agent header.

use reqwest::{Client, ClientBuilder};

fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Creates a new HTTP client with the standard Loom User-Agent header.
///
/// Per-request timeouts are left to the caller.
pub fn new_client() -> reqwest::Result<Client> {
	builder().build()
}

/// Returns the standard Loom User-Agent string.
///
/// Format: `loom/{os}-{arch}/{version}`
fn user_agent() -> String {
	format!(
		"loom/{}-{}/{}",
		std::env::consts::OS,
		std::env::consts::ARCH,
		env!("CARGO_PKG_VERSION")
	)
}

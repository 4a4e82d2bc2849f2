// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client for Unleash-compatible `GET /api/client/features` endpoints.

use loom_flags_catalog::ProviderSnapshot;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ProviderSettings;
use crate::error::{ProviderError, Result};

pub const APP_NAME_HEADER: &str = "unleash-appname";
pub const INSTANCE_ID_HEADER: &str = "unleash-instanceid";
pub const ENVIRONMENT_HEADER: &str = "unleash-environment";

/// Fetches provider snapshots. Holds no cache of its own.
#[derive(Debug, Clone)]
pub struct ProviderClient {
	http: Option<Client>,
}

impl ProviderClient {
	pub fn new() -> Self {
		let http = match loom_common_http::new_client() {
			Ok(client) => Some(client),
			Err(e) => {
				warn!(error = %e, "failed to build HTTP client, flag provider disabled");
				None
			}
		};
		Self { http }
	}

	pub fn with_client(http: Client) -> Self {
		Self { http: Some(http) }
	}

	/// Performs one fetch. No retries; the next resolution tries again.
	pub async fn fetch(&self, settings: &ProviderSettings) -> Result<ProviderSnapshot> {
		let http = self.http.as_ref().ok_or(ProviderError::ClientUnavailable)?;
		let url = settings.features_url();

		let mut request = http
			.get(&url)
			.timeout(settings.timeout)
			.header(ACCEPT, "application/json")
			.header(APP_NAME_HEADER, &settings.app_name)
			.header(INSTANCE_ID_HEADER, &settings.instance_id)
			.header(ENVIRONMENT_HEADER, &settings.environment);
		if let Some(token) = &settings.api_token {
			request = request.header(AUTHORIZATION, token);
		}

		debug!(url = %url, "fetching provider flags");
		let response = request.send().await?;

		let status = response.status();
		if status != StatusCode::OK {
			return Err(ProviderError::UnexpectedStatus(status));
		}

		let body = response.bytes().await?;
		let payload: Value = serde_json::from_slice(&body)?;
		let snapshot = ProviderSnapshot::from_payload(&payload);
		debug!(url = %url, flags = snapshot.len(), "fetched provider flags");
		Ok(snapshot)
	}
}

impl Default for ProviderClient {
	fn default() -> Self {
		Self::new()
	}
}

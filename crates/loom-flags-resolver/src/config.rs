// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment-driven resolver settings.
//!
//! Parsing never fails: unparseable or non-positive durations fall back to
//! their defaults.

use std::time::Duration;

use tracing::debug;

use crate::env::{env_var, EnvSource};

pub const PROVIDER_ENV: &str = "LOOM_FLAGS_PROVIDER";
pub const UNLEASH_URL_ENV: &str = "LOOM_FLAGS_UNLEASH_URL";
pub const UNLEASH_PROXY_URL_ENV: &str = "LOOM_FLAGS_UNLEASH_PROXY_URL";
pub const UNLEASH_API_TOKEN_ENV: &str = "LOOM_FLAGS_UNLEASH_API_TOKEN";
pub const UNLEASH_CLIENT_KEY_ENV: &str = "LOOM_FLAGS_UNLEASH_CLIENT_KEY";
pub const UNLEASH_APP_NAME_ENV: &str = "LOOM_FLAGS_UNLEASH_APP_NAME";
pub const UNLEASH_INSTANCE_ID_ENV: &str = "LOOM_FLAGS_UNLEASH_INSTANCE_ID";
pub const UNLEASH_ENVIRONMENT_ENV: &str = "LOOM_FLAGS_UNLEASH_ENVIRONMENT";
pub const RUNTIME_ENV: &str = "LOOM_RUNTIME_ENV";
pub const UNLEASH_TIMEOUT_ENV: &str = "LOOM_FLAGS_UNLEASH_TIMEOUT_SECONDS";
pub const UNLEASH_CACHE_TTL_ENV: &str = "LOOM_FLAGS_UNLEASH_CACHE_TTL_SECONDS";
pub const OVERRIDE_ENV: &str = "LOOM_FEATURE_FLAGS";
pub const CATALOG_PATH_ENV: &str = "LOOM_FLAGS_CATALOG_PATH";

/// Provider mode that turns on remote fetching.
pub const UNLEASH_PROVIDER_MODE: &str = "unleash";
pub const DEFAULT_PROVIDER_MODE: &str = "local";
pub const DEFAULT_APP_NAME: &str = "loom-api";
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

pub const FEATURES_PATH: &str = "/api/client/features";

/// Settings for the Unleash-compatible provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
	/// Lower-cased provider mode, `local` unless configured.
	pub mode: String,
	/// Base URL without a trailing slash. Empty when unset.
	pub base_url: String,
	pub api_token: Option<String>,
	pub app_name: String,
	pub instance_id: String,
	pub environment: String,
	pub timeout: Duration,
	pub cache_ttl: Duration,
}

impl ProviderSettings {
	pub fn from_env(env: &dyn EnvSource) -> Self {
		Self {
			mode: env_var(env, &[PROVIDER_ENV])
				.unwrap_or_else(|| DEFAULT_PROVIDER_MODE.to_string())
				.to_lowercase(),
			base_url: env_var(env, &[UNLEASH_URL_ENV, UNLEASH_PROXY_URL_ENV])
				.map(|url| url.trim_end_matches('/').to_string())
				.unwrap_or_default(),
			api_token: env_var(env, &[UNLEASH_API_TOKEN_ENV, UNLEASH_CLIENT_KEY_ENV]),
			app_name: env_var(env, &[UNLEASH_APP_NAME_ENV])
				.unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
			instance_id: env_var(env, &[UNLEASH_INSTANCE_ID_ENV])
				.unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
			environment: env_var(env, &[UNLEASH_ENVIRONMENT_ENV, RUNTIME_ENV])
				.unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
			timeout: seconds_or_default(env, UNLEASH_TIMEOUT_ENV, DEFAULT_TIMEOUT),
			cache_ttl: seconds_or_default(env, UNLEASH_CACHE_TTL_ENV, DEFAULT_CACHE_TTL),
		}
	}

	/// Whether remote fetching should happen at all.
	pub fn is_active(&self) -> bool {
		self.mode == UNLEASH_PROVIDER_MODE && !self.base_url.is_empty()
	}

	pub fn features_url(&self) -> String {
		format!("{}{}", self.base_url, FEATURES_PATH)
	}
}

fn seconds_or_default(env: &dyn EnvSource, name: &str, default: Duration) -> Duration {
	let Some(raw) = env_var(env, &[name]) else {
		return default;
	};

	match raw.parse::<f64>().ok().filter(|secs| *secs > 0.0) {
		Some(secs) => Duration::try_from_secs_f64(secs).unwrap_or(default),
		None => {
			debug!(var = name, value = %raw, "ignoring invalid duration, using default");
			default
		}
	}
}

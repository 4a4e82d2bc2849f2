// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use reqwest::StatusCode;

/// Reasons a provider fetch produced no snapshot.
///
/// These are logged and swallowed by the resolver; callers only ever see
/// an empty provider layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
	#[error("HTTP client unavailable")]
	ClientUnavailable,

	#[error("request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("unexpected status {0}")]
	UnexpectedStatus(StatusCode),

	#[error("invalid response body: {0}")]
	Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProviderError>;

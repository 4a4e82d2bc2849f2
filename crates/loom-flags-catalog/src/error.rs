// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

/// Errors raised while reading the flag catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
	#[error("failed to read catalog {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid JSON in catalog {path}: {source}")]
	Json {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("catalog must contain a top-level 'flags' array")]
	MissingFlagsArray,
}

impl CatalogError {
	/// Returns true if the catalog file simply does not exist.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
	}
}

/// Errors raised while parsing a JSON payload from the environment.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
	#[error("invalid JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error("expected a JSON object, found {0}")]
	NotAnObject(&'static str),
}

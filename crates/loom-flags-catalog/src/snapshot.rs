// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Decisions fetched from an Unleash-compatible provider.

use std::collections::HashMap;

use serde_json::Value;

/// Flag key to provider decision, as returned by `GET /api/client/features`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSnapshot {
	flags: HashMap<String, bool>,
}

impl ProviderSnapshot {
	/// Reads a `{"features": [{"name": ..., "enabled": ...}]}` body.
	///
	/// Features without a non-empty name or a boolean `enabled` are skipped.
	/// Any other shape yields an empty snapshot.
	pub fn from_payload(payload: &Value) -> Self {
		let Some(features) = payload.get("features").and_then(Value::as_array) else {
			return Self::default();
		};

		let flags = features
			.iter()
			.filter_map(|feature| {
				let name = feature.get("name").and_then(Value::as_str)?.trim();
				let enabled = feature.get("enabled").and_then(Value::as_bool)?;
				(!name.is_empty()).then(|| (name.to_string(), enabled))
			})
			.collect();

		Self { flags }
	}

	pub fn get(&self, key: &str) -> Option<bool> {
		self.flags.get(key).copied()
	}

	pub fn len(&self) -> usize {
		self.flags.len()
	}

	pub fn is_empty(&self) -> bool {
		self.flags.is_empty()
	}
}

impl FromIterator<(String, bool)> for ProviderSnapshot {
	fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
		Self {
			flags: iter.into_iter().collect(),
		}
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Forced flag values supplied through the environment.

use std::collections::HashMap;

use serde_json::Value;

use crate::boolean::BoolLike;
use crate::error::PayloadError;

/// Flag key to forced boolean value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideMap {
	values: HashMap<String, bool>,
}

impl OverrideMap {
	/// Parses a JSON object such as `{"api.tools.x": true, "api.tools.y": "off"}`.
	///
	/// A blank payload is an empty map. Entries whose values are not
	/// boolean-like are dropped individually; the rest are kept.
	pub fn from_json(raw: &str) -> Result<Self, PayloadError> {
		let raw = raw.trim();
		if raw.is_empty() {
			return Ok(Self::default());
		}

		match serde_json::from_str::<Value>(raw)? {
			Value::Object(entries) => Ok(entries
				.iter()
				.filter_map(|(key, value)| value.to_bool_like().map(|b| (key.clone(), b)))
				.collect()),
			other => Err(PayloadError::NotAnObject(json_kind(&other))),
		}
	}

	pub fn get(&self, key: &str) -> Option<bool> {
		self.values.get(key).copied()
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

impl FromIterator<(String, bool)> for OverrideMap {
	fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
		Self {
			values: iter.into_iter().collect(),
		}
	}
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

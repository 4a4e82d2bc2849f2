// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permissive boolean normalization.
//!
//! Both the override map and explicit caller decisions go through
//! [`parse_bool_like`], so `"on"` means the same thing everywhere.

use serde_json::Value;

const TRUTHY: [&str; 4] = ["1", "true", "yes", "on"];
const FALSY: [&str; 4] = ["0", "false", "no", "off"];

/// A value that may be read as a boolean decision.
///
/// Strings are trimmed and compared case-insensitively against
/// `1/true/yes/on` and `0/false/no/off`. Anything else is `None`.
pub trait BoolLike {
	fn to_bool_like(&self) -> Option<bool>;
}

/// Normalizes any [`BoolLike`] value.
pub fn parse_bool_like<T: BoolLike + ?Sized>(value: &T) -> Option<bool> {
	value.to_bool_like()
}

fn parse_word(raw: &str) -> Option<bool> {
	let normalized = raw.trim().to_ascii_lowercase();
	if TRUTHY.contains(&normalized.as_str()) {
		Some(true)
	} else if FALSY.contains(&normalized.as_str()) {
		Some(false)
	} else {
		None
	}
}

impl BoolLike for bool {
	fn to_bool_like(&self) -> Option<bool> {
		Some(*self)
	}
}

impl BoolLike for str {
	fn to_bool_like(&self) -> Option<bool> {
		parse_word(self)
	}
}

impl BoolLike for String {
	fn to_bool_like(&self) -> Option<bool> {
		parse_word(self)
	}
}

impl BoolLike for Value {
	fn to_bool_like(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			Value::String(s) => parse_word(s),
			// Only the integers 1 and 0 read as booleans; 1.0 does not.
			Value::Number(n) => parse_word(&n.to_string()),
			Value::Null | Value::Array(_) | Value::Object(_) => None,
		}
	}
}

impl<T: BoolLike + ?Sized> BoolLike for &T {
	fn to_bool_like(&self) -> Option<bool> {
		(**self).to_bool_like()
	}
}

impl<T: BoolLike> BoolLike for Option<T> {
	fn to_bool_like(&self) -> Option<bool> {
		self.as_ref().and_then(BoolLike::to_bool_like)
	}
}

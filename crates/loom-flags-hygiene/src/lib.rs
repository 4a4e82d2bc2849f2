// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hygiene checks for the feature flag catalog.
//!
//! Meant for CI, never for the request path. Every entry is checked and all
//! violations are collected, so one run reports everything that needs fixing.
//!
//! Checks per entry:
//! - it is an object with a non-empty `key`
//! - the key starts with `<prefix>.` and is unique
//! - `owner` is set
//! - `type` and `status` come from the allowed vocabularies
//! - `createdAt` and `removeBy` are `YYYY-MM-DD` calendar dates, in order
//! - a flag past its `removeBy` date has status `removed`

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use loom_flags_catalog::{
	parse_iso_date, read_flag_entries, text_field, CatalogError, FlagStatus, FlagType,
};
use serde_json::{Map, Value};
use tracing::debug;

/// Key prefix required of every flag in the API catalog.
pub const DEFAULT_KEY_PREFIX: &str = "api";

/// A single hygiene problem in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
	#[error("invalid flag entry: every item must be an object")]
	NotAnObject,

	#[error("invalid flag entry: missing non-empty 'key'")]
	MissingKey,

	#[error("{key}: key must start with '{prefix}.'")]
	KeyPrefix { key: String, prefix: String },

	#[error("{key}: duplicate key detected")]
	DuplicateKey { key: String },

	#[error("{key}: missing required field 'owner'")]
	MissingOwner { key: String },

	#[error("{key}: invalid 'type' ({})", or_empty(.value))]
	InvalidType { key: String, value: String },

	#[error("{key}: invalid 'status' ({})", or_empty(.value))]
	InvalidStatus { key: String, value: String },

	#[error("{key}: field '{field}' must use YYYY-MM-DD")]
	DateNotString { key: String, field: &'static str },

	#[error("{key}: field '{field}' is not a valid calendar date")]
	InvalidDate { key: String, field: &'static str },

	#[error("{key}: 'removeBy' cannot be before 'createdAt'")]
	RemoveBeforeCreated { key: String },

	#[error(
		"{key}: flag is expired ({remove_by}) and not removed (status={})",
		or_empty(.status)
	)]
	ExpiredNotRemoved {
		key: String,
		remove_by: NaiveDate,
		status: String,
	},
}

fn or_empty(value: &str) -> &str {
	if value.is_empty() {
		"empty"
	} else {
		value
	}
}

/// Outcome of checking a whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HygieneReport {
	/// Number of entries in the `flags` array, valid or not.
	pub flag_count: usize,
	pub violations: Vec<Violation>,
}

impl HygieneReport {
	pub fn is_clean(&self) -> bool {
		self.violations.is_empty()
	}
}

/// Loads the catalog at `path` and checks every entry.
///
/// Returns an error only when the file itself cannot be used.
pub fn check_catalog(
	path: &Path,
	prefix: &str,
	today: NaiveDate,
) -> Result<HygieneReport, CatalogError> {
	let flags = read_flag_entries(path)?;
	debug!(path = %path.display(), count = flags.len(), "checking flag catalog");
	Ok(HygieneReport {
		flag_count: flags.len(),
		violations: validate_flags(&flags, prefix, today),
	})
}

/// Checks raw catalog entries.
pub fn validate_flags(flags: &[Value], prefix: &str, today: NaiveDate) -> Vec<Violation> {
	let mut validator = Validator {
		prefix,
		today,
		seen_keys: HashSet::new(),
		violations: Vec::new(),
	};
	for flag in flags {
		validator.check(flag);
	}
	validator.violations
}

struct Validator<'a> {
	prefix: &'a str,
	today: NaiveDate,
	seen_keys: HashSet<String>,
	violations: Vec<Violation>,
}

impl Validator<'_> {
	fn check(&mut self, flag: &Value) {
		let Some(flag) = flag.as_object() else {
			self.violations.push(Violation::NotAnObject);
			return;
		};

		let key = trimmed(flag, "key");
		if key.is_empty() {
			self.violations.push(Violation::MissingKey);
			return;
		}

		self.check_key(&key);
		let status = self.check_owner_type_status(&key, flag);
		self.check_dates(&key, flag, &status);
	}

	fn check_key(&mut self, key: &str) {
		if !key.starts_with(&format!("{}.", self.prefix)) {
			self.violations.push(Violation::KeyPrefix {
				key: key.to_string(),
				prefix: self.prefix.to_string(),
			});
		}

		if !self.seen_keys.insert(key.to_string()) {
			self.violations.push(Violation::DuplicateKey {
				key: key.to_string(),
			});
		}
	}

	/// Returns the trimmed status for the date checks.
	fn check_owner_type_status(&mut self, key: &str, flag: &Map<String, Value>) -> String {
		if trimmed(flag, "owner").is_empty() {
			self.violations.push(Violation::MissingOwner {
				key: key.to_string(),
			});
		}

		let flag_type = trimmed(flag, "type");
		if flag_type.parse::<FlagType>().is_err() {
			self.violations.push(Violation::InvalidType {
				key: key.to_string(),
				value: flag_type,
			});
		}

		let status = trimmed(flag, "status");
		if status.parse::<FlagStatus>().is_err() {
			self.violations.push(Violation::InvalidStatus {
				key: key.to_string(),
				value: status.clone(),
			});
		}

		status
	}

	fn check_dates(&mut self, key: &str, flag: &Map<String, Value>, status: &str) {
		let created_at = self.date_field(key, flag, "createdAt");
		let remove_by = self.date_field(key, flag, "removeBy");

		if let (Some(created_at), Some(remove_by)) = (created_at, remove_by) {
			if remove_by < created_at {
				self.violations.push(Violation::RemoveBeforeCreated {
					key: key.to_string(),
				});
			}
		}

		if let Some(remove_by) = remove_by {
			if status != FlagStatus::Removed.as_str() && remove_by < self.today {
				self.violations.push(Violation::ExpiredNotRemoved {
					key: key.to_string(),
					remove_by,
					status: status.to_string(),
				});
			}
		}
	}

	fn date_field(
		&mut self,
		key: &str,
		flag: &Map<String, Value>,
		field: &'static str,
	) -> Option<NaiveDate> {
		let Some(raw) = flag.get(field).and_then(Value::as_str) else {
			self.violations.push(Violation::DateNotString {
				key: key.to_string(),
				field,
			});
			return None;
		};

		let parsed = parse_iso_date(raw);
		if parsed.is_none() {
			self.violations.push(Violation::InvalidDate {
				key: key.to_string(),
				field,
			});
		}
		parsed
	}
}

fn trimmed(flag: &Map<String, Value>, field: &str) -> String {
	text_field(flag, field)
		.map(|value| value.trim().to_string())
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use serde_json::json;

	fn today() -> NaiveDate {
		NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
	}

	fn valid_flag(key: &str) -> Value {
		json!({
			"key": key,
			"status": "enabled-dev",
			"owner": "platform",
			"type": "release",
			"createdAt": "2025-01-10",
			"removeBy": "2025-12-31",
		})
	}

	fn messages(flags: &[Value]) -> Vec<String> {
		validate_flags(flags, DEFAULT_KEY_PREFIX, today())
			.iter()
			.map(ToString::to_string)
			.collect()
	}

	#[test]
	fn test_valid_catalog_has_no_violations() {
		let flags = vec![valid_flag("api.tools.a"), valid_flag("api.tools.b")];
		assert!(validate_flags(&flags, DEFAULT_KEY_PREFIX, today()).is_empty());
	}

	#[test]
	fn test_duplicate_key() {
		let flags = vec![valid_flag("api.tools.a"), valid_flag("api.tools.a")];
		assert_eq!(messages(&flags), vec!["api.tools.a: duplicate key detected"]);
	}

	#[test]
	fn test_key_prefix() {
		let flags = vec![valid_flag("web.tools.a"), valid_flag("apitools.b")];
		assert_eq!(
			messages(&flags),
			vec![
				"web.tools.a: key must start with 'api.'",
				"apitools.b: key must start with 'api.'",
			]
		);
	}

	#[test]
	fn test_custom_prefix() {
		let flags = vec![valid_flag("web.tools.a")];
		assert!(validate_flags(&flags, "web", today()).is_empty());
	}

	#[test]
	fn test_entry_shape() {
		let flags = vec![json!("api.tools.a"), json!({"key": "  "}), json!({"owner": "x"})];
		assert_eq!(
			messages(&flags),
			vec![
				"invalid flag entry: every item must be an object",
				"invalid flag entry: missing non-empty 'key'",
				"invalid flag entry: missing non-empty 'key'",
			]
		);
	}

	#[test]
	fn test_owner_type_status() {
		let mut flag = valid_flag("api.tools.a");
		flag["owner"] = json!(" ");
		flag["type"] = json!("rollout");
		flag["status"] = json!("");
		// An empty status is also not "removed", but the date is in the future.
		assert_eq!(
			messages(&[flag]),
			vec![
				"api.tools.a: missing required field 'owner'",
				"api.tools.a: invalid 'type' (rollout)",
				"api.tools.a: invalid 'status' (empty)",
			]
		);
	}

	#[test]
	fn test_missing_type_reports_empty() {
		let mut flag = valid_flag("api.tools.a");
		flag.as_object_mut().unwrap().remove("type");
		assert_eq!(messages(&[flag]), vec!["api.tools.a: invalid 'type' (empty)"]);
	}

	#[test]
	fn test_status_is_case_sensitive() {
		let mut flag = valid_flag("api.tools.a");
		flag["status"] = json!("Removed");
		assert_eq!(
			messages(&[flag]),
			vec!["api.tools.a: invalid 'status' (Removed)"]
		);
	}

	#[test]
	fn test_date_formats() {
		let mut flag = valid_flag("api.tools.a");
		flag["createdAt"] = json!(20250110);
		flag["removeBy"] = json!("2025-02-30");
		assert_eq!(
			messages(&[flag]),
			vec![
				"api.tools.a: field 'createdAt' must use YYYY-MM-DD",
				"api.tools.a: field 'removeBy' is not a valid calendar date",
			]
		);
	}

	#[test]
	fn test_unpadded_dates_are_rejected() {
		let mut flag = valid_flag("api.tools.a");
		flag["createdAt"] = json!("2025-1-5");
		flag["removeBy"] = json!(" 2030-01-05");
		assert_eq!(
			messages(&[flag]),
			vec![
				"api.tools.a: field 'createdAt' is not a valid calendar date",
				"api.tools.a: field 'removeBy' is not a valid calendar date",
			]
		);
	}

	#[test]
	fn test_missing_dates() {
		let mut flag = valid_flag("api.tools.a");
		let object = flag.as_object_mut().unwrap();
		object.remove("createdAt");
		object.remove("removeBy");
		assert_eq!(
			messages(&[flag]),
			vec![
				"api.tools.a: field 'createdAt' must use YYYY-MM-DD",
				"api.tools.a: field 'removeBy' must use YYYY-MM-DD",
			]
		);
	}

	#[test]
	fn test_remove_by_before_created_at() {
		let mut flag = valid_flag("api.tools.a");
		flag["createdAt"] = json!("2025-09-01");
		flag["removeBy"] = json!("2025-08-01");
		assert_eq!(
			messages(&[flag]),
			vec!["api.tools.a: 'removeBy' cannot be before 'createdAt'"]
		);
	}

	#[test]
	fn test_expired_flag_must_be_removed() {
		let mut flag = valid_flag("api.tools.a");
		flag["removeBy"] = json!("2025-05-31");
		assert_eq!(
			messages(&[flag.clone()]),
			vec!["api.tools.a: flag is expired (2025-05-31) and not removed (status=enabled-dev)"]
		);

		flag["status"] = json!("removed");
		assert!(messages(&[flag]).is_empty());
	}

	#[test]
	fn test_remove_by_today_is_not_expired() {
		let mut flag = valid_flag("api.tools.a");
		flag["removeBy"] = json!("2025-06-01");
		assert!(messages(&[flag]).is_empty());
	}

	#[test]
	fn test_violations_accumulate_across_entries() {
		let mut broken = valid_flag("api.tools.a");
		broken["owner"] = json!("");
		let flags = vec![broken, valid_flag("api.tools.a"), json!(null)];
		assert_eq!(
			messages(&flags),
			vec![
				"api.tools.a: missing required field 'owner'",
				"api.tools.a: duplicate key detected",
				"invalid flag entry: every item must be an object",
			]
		);
	}

	proptest! {
		#[test]
		fn unique_prefixed_keys_are_clean(
			names in prop::collection::hash_set("[a-z][a-z0-9-]{1,15}", 0..10),
		) {
			let flags: Vec<Value> = names
				.iter()
				.map(|name| valid_flag(&format!("api.{name}")))
				.collect();
			prop_assert!(validate_flags(&flags, DEFAULT_KEY_PREFIX, today()).is_empty());
		}

		#[test]
		fn every_allowed_status_and_type_is_accepted(
			status_idx in 0usize..FlagStatus::ALL.len(),
			type_idx in 0usize..FlagType::ALL.len(),
		) {
			let mut flag = valid_flag("api.tools.a");
			flag["status"] = json!(FlagStatus::ALL[status_idx].as_str());
			flag["type"] = json!(FlagType::ALL[type_idx].as_str());
			prop_assert!(validate_flags(&[flag], DEFAULT_KEY_PREFIX, today()).is_empty());
		}
	}
}

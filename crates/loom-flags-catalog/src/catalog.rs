// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The static flag catalog.
//!
//! The catalog file has the shape:
//!
//! ```json
//! {
//!   "flags": [
//!     {
//!       "key": "api.tools.salary-raise-calculator",
//!       "status": "draft",
//!       "owner": "platform",
//!       "type": "release",
//!       "createdAt": "2025-01-10",
//!       "removeBy": "2025-06-30"
//!     }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CatalogError;

/// Catalog location relative to the working directory.
pub const DEFAULT_CATALOG_PATH: &str = "config/feature-flags.json";

/// Normalized statuses that make a catalog flag resolve to `true`.
pub const ENABLED_STATUSES: [&str; 3] = ["active", "released", "enabled"];

/// Lifecycle status of a catalog flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagStatus {
	Draft,
	EnabledDev,
	EnabledStaging,
	EnabledProd,
	CleanupPending,
	Removed,
}

impl FlagStatus {
	pub const ALL: [FlagStatus; 6] = [
		FlagStatus::Draft,
		FlagStatus::EnabledDev,
		FlagStatus::EnabledStaging,
		FlagStatus::EnabledProd,
		FlagStatus::CleanupPending,
		FlagStatus::Removed,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			FlagStatus::Draft => "draft",
			FlagStatus::EnabledDev => "enabled-dev",
			FlagStatus::EnabledStaging => "enabled-staging",
			FlagStatus::EnabledProd => "enabled-prod",
			FlagStatus::CleanupPending => "cleanup-pending",
			FlagStatus::Removed => "removed",
		}
	}
}

impl fmt::Display for FlagStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for FlagStatus {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL.into_iter().find(|status| status.as_str() == s).ok_or(())
	}
}

/// Kind of flag, which drives how long it is expected to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagType {
	Release,
	Experiment,
	KillSwitch,
}

impl FlagType {
	pub const ALL: [FlagType; 3] = [FlagType::Release, FlagType::Experiment, FlagType::KillSwitch];

	pub fn as_str(&self) -> &'static str {
		match self {
			FlagType::Release => "release",
			FlagType::Experiment => "experiment",
			FlagType::KillSwitch => "kill-switch",
		}
	}
}

impl fmt::Display for FlagType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for FlagType {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL.into_iter().find(|kind| kind.as_str() == s).ok_or(())
	}
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// Only the exact ten-character, zero-padded form is accepted.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
	let bytes = raw.as_bytes();
	let well_formed = bytes.len() == 10
		&& bytes.iter().enumerate().all(|(i, b)| match i {
			4 | 7 => *b == b'-',
			_ => b.is_ascii_digit(),
		});
	if !well_formed {
		return None;
	}
	NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Reads a field as text. Numbers and booleans are rendered, null and
/// structured values are treated as absent.
pub fn text_field(object: &Map<String, Value>, field: &str) -> Option<String> {
	match object.get(field)? {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		Value::Null | Value::Array(_) | Value::Object(_) => None,
	}
}

/// Metadata for one flag in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagCatalogEntry {
	/// Dot-namespaced key, e.g. `api.tools.salary-raise-calculator`.
	pub key: String,
	pub status: Option<String>,
	pub owner: Option<String>,
	#[serde(rename = "type")]
	pub flag_type: Option<String>,
	pub created_at: Option<String>,
	pub remove_by: Option<String>,
}

impl FlagCatalogEntry {
	/// Builds an entry from a raw catalog item.
	///
	/// Returns `None` for non-objects and for items without a non-empty key.
	pub fn from_value(value: &Value) -> Option<Self> {
		let object = value.as_object()?;
		let key = text_field(object, "key")?.trim().to_string();
		if key.is_empty() {
			return None;
		}

		Some(Self {
			key,
			status: text_field(object, "status"),
			owner: text_field(object, "owner"),
			flag_type: text_field(object, "type"),
			created_at: text_field(object, "createdAt"),
			remove_by: text_field(object, "removeBy"),
		})
	}

	/// Trimmed, lower-cased status, or an empty string when unset.
	pub fn normalized_status(&self) -> String {
		self.status
			.as_deref()
			.unwrap_or_default()
			.trim()
			.to_lowercase()
	}

	/// Whether this entry resolves to `true` at runtime.
	pub fn is_enabled(&self) -> bool {
		ENABLED_STATUSES.contains(&self.normalized_status().as_str())
	}

	pub fn created_on(&self) -> Option<NaiveDate> {
		self.created_at.as_deref().and_then(parse_iso_date)
	}

	pub fn remove_by_date(&self) -> Option<NaiveDate> {
		self.remove_by.as_deref().and_then(parse_iso_date)
	}
}

/// Reads the raw `flags` array of a catalog file.
///
/// Entries are returned untouched so callers can decide how strict to be.
pub fn read_flag_entries(path: &Path) -> Result<Vec<Value>, CatalogError> {
	let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
		path: path.to_path_buf(),
		source: e,
	})?;

	parse_flag_entries(path, &content)
}

/// Parses catalog text already read from `path`.
pub fn parse_flag_entries(path: &Path, content: &str) -> Result<Vec<Value>, CatalogError> {
	let parsed: Value = serde_json::from_str(content).map_err(|e| CatalogError::Json {
		path: path.to_path_buf(),
		source: e,
	})?;

	flags_array(&parsed).cloned()
}

fn flags_array(payload: &Value) -> Result<&Vec<Value>, CatalogError> {
	payload
		.get("flags")
		.and_then(Value::as_array)
		.ok_or(CatalogError::MissingFlagsArray)
}

/// Catalog entries indexed by key.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
	entries: HashMap<String, FlagCatalogEntry>,
}

impl Catalog {
	/// Loads the catalog from disk.
	pub fn load(path: &Path) -> Result<Self, CatalogError> {
		let entries = read_flag_entries(path)?;
		Ok(Self::from_entries(&entries))
	}

	/// Builds a catalog from file contents. `path` is only used in errors.
	pub fn parse(path: &Path, content: &str) -> Result<Self, CatalogError> {
		let entries = parse_flag_entries(path, content)?;
		Ok(Self::from_entries(&entries))
	}

	/// Builds a catalog from a parsed catalog document.
	pub fn from_value(payload: &Value) -> Result<Self, CatalogError> {
		flags_array(payload).map(|entries| Self::from_entries(entries))
	}

	/// Indexes raw entries, skipping anything without a usable key.
	/// A later duplicate replaces an earlier one.
	pub fn from_entries(entries: &[Value]) -> Self {
		let entries = entries
			.iter()
			.filter_map(FlagCatalogEntry::from_value)
			.map(|entry| (entry.key.clone(), entry))
			.collect();
		Self { entries }
	}

	pub fn get(&self, key: &str) -> Option<&FlagCatalogEntry> {
		self.entries.get(key)
	}

	/// Whether `key` is listed with an enabled status. Unknown keys are disabled.
	pub fn is_enabled(&self, key: &str) -> bool {
		self.get(key).is_some_and(FlagCatalogEntry::is_enabled)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}
}

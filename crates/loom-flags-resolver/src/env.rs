// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment access.
//!
//! The resolver reads its settings through [`EnvSource`] so tests can hand it
//! a [`MapEnv`] instead of mutating the process environment.

use std::collections::HashMap;

/// Source of environment variables.
pub trait EnvSource: Send + Sync {
	fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
	fn var(&self, name: &str) -> Option<String> {
		std::env::var(name).ok()
	}
}

/// An in-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
	vars: HashMap<String, String>,
}

impl MapEnv {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.vars.insert(name.into(), value.into());
		self
	}
}

impl EnvSource for MapEnv {
	fn var(&self, name: &str) -> Option<String> {
		self.vars.get(name).cloned()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
		}
	}
}

/// Returns the first variable in `names` holding a non-blank value, trimmed.
pub fn env_var(env: &dyn EnvSource, names: &[&str]) -> Option<String> {
	names
		.iter()
		.filter_map(|name| env.var(name))
		.map(|value| value.trim().to_string())
		.find(|value| !value.is_empty())
}

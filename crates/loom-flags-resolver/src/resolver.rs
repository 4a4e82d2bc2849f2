// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use loom_flags_catalog::{
	parse_bool_like, BoolLike, Catalog, CatalogError, OverrideMap, ProviderSnapshot,
	DEFAULT_CATALOG_PATH,
};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::config::{ProviderSettings, CATALOG_PATH_ENV, DEFAULT_CACHE_TTL, OVERRIDE_ENV};
use crate::env::{env_var, EnvSource, ProcessEnv};
use crate::provider::ProviderClient;

/// Which layer produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
	/// Caller supplied the value.
	Explicit,
	/// Remote provider snapshot.
	Provider,
	/// `LOOM_FEATURE_FLAGS` override.
	Override,
	/// Catalog status.
	Catalog,
	/// Key unknown to every layer.
	Default,
}

/// The outcome of resolving one flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagDecision {
	pub key: String,
	pub enabled: bool,
	pub source: DecisionSource,
}

impl FlagDecision {
	fn new(key: &str, enabled: bool, source: DecisionSource) -> Self {
		Self {
			key: key.to_string(),
			enabled,
			source,
		}
	}
}

#[derive(Debug, Default)]
struct ProviderCache {
	snapshot: Arc<ProviderSnapshot>,
	expires_at: Option<Instant>,
}

impl ProviderCache {
	fn fresh(&self, now: Instant) -> Option<Arc<ProviderSnapshot>> {
		match self.expires_at {
			Some(expires_at) if now < expires_at => Some(Arc::clone(&self.snapshot)),
			_ => None,
		}
	}

	/// Stores a snapshot that stays fresh for `ttl`. A TTL too large for the
	/// platform clock falls back to the default TTL.
	fn store(&mut self, snapshot: Arc<ProviderSnapshot>, now: Instant, ttl: Duration) {
		let expires_at = now.checked_add(ttl).or_else(|| {
			debug!(?ttl, "flag provider cache TTL out of range, using default");
			now.checked_add(DEFAULT_CACHE_TTL)
		});
		self.snapshot = snapshot;
		self.expires_at = expires_at;
	}
}

/// Resolves boolean feature flags from the provider, the environment override
/// and the local catalog, in that order.
///
/// Each layer is loaded on first use and remembered until [`FlagResolver::reset`].
/// Construct one per process and share it behind an `Arc`.
pub struct FlagResolver {
	env: Arc<dyn EnvSource>,
	default_catalog_path: PathBuf,
	provider: ProviderClient,
	provider_cache: Mutex<ProviderCache>,
	overrides: RwLock<Option<Arc<OverrideMap>>>,
	catalog: RwLock<Option<Arc<Catalog>>>,
}

impl std::fmt::Debug for FlagResolver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FlagResolver")
			.field("default_catalog_path", &self.default_catalog_path)
			.finish_non_exhaustive()
	}
}

impl FlagResolver {
	pub fn builder() -> FlagResolverBuilder {
		FlagResolverBuilder::default()
	}

	/// A resolver reading the process environment and `config/feature-flags.json`.
	pub fn from_env() -> Self {
		Self::builder().build()
	}

	/// Resolves `key` with no caller decision.
	pub async fn is_feature_enabled(&self, key: &str) -> bool {
		self.evaluate(key, None::<bool>).await.enabled
	}

	/// Resolves `key`, letting a boolean-like `explicit` value win outright.
	///
	/// An `explicit` value that does not parse is ignored.
	pub async fn is_feature_enabled_with(&self, key: &str, explicit: impl BoolLike) -> bool {
		self.evaluate(key, explicit).await.enabled
	}

	/// Resolves `key` and reports which layer decided.
	pub async fn evaluate(&self, key: &str, explicit: impl BoolLike) -> FlagDecision {
		if let Some(enabled) = parse_bool_like(&explicit) {
			return FlagDecision::new(key, enabled, DecisionSource::Explicit);
		}

		if let Some(enabled) = self.resolve_provider_decision(key).await {
			return FlagDecision::new(key, enabled, DecisionSource::Provider);
		}

		if let Some(enabled) = self.overrides().await.get(key) {
			return FlagDecision::new(key, enabled, DecisionSource::Override);
		}

		match self.catalog().await.get(key) {
			Some(entry) => FlagDecision::new(key, entry.is_enabled(), DecisionSource::Catalog),
			None => {
				debug!(flag_key = key, "flag unknown to every source, defaulting to off");
				FlagDecision::new(key, false, DecisionSource::Default)
			}
		}
	}

	/// The provider's decision for `key`, if the provider is active and knows it.
	pub async fn resolve_provider_decision(&self, key: &str) -> Option<bool> {
		self.provider_snapshot().await.get(key)
	}

	/// The current provider snapshot.
	///
	/// Empty without a network call when the provider is not configured. A
	/// fresh cached snapshot is reused. Failed fetches are logged, return an
	/// empty snapshot and are not cached.
	pub async fn provider_snapshot(&self) -> Arc<ProviderSnapshot> {
		let settings = ProviderSettings::from_env(self.env.as_ref());
		if !settings.is_active() {
			return Arc::default();
		}

		let now = Instant::now();
		if let Some(snapshot) = self.provider_cache.lock().await.fresh(now) {
			return snapshot;
		}

		match self.provider.fetch(&settings).await {
			Ok(snapshot) => {
				let snapshot = Arc::new(snapshot);
				self.provider_cache
					.lock()
					.await
					.store(Arc::clone(&snapshot), now, settings.cache_ttl);
				snapshot
			}
			Err(e) => {
				warn!(url = %settings.features_url(), error = %e, "flag provider fetch failed");
				Arc::default()
			}
		}
	}

	/// The override map, parsed once from `LOOM_FEATURE_FLAGS`.
	pub async fn overrides(&self) -> Arc<OverrideMap> {
		if let Some(overrides) = self.overrides.read().await.as_ref() {
			return Arc::clone(overrides);
		}

		let loaded = Arc::new(self.load_overrides());
		let mut slot = self.overrides.write().await;
		Arc::clone(slot.get_or_insert(loaded))
	}

	/// The local catalog, loaded once from disk.
	pub async fn catalog(&self) -> Arc<Catalog> {
		if let Some(catalog) = self.catalog.read().await.as_ref() {
			return Arc::clone(catalog);
		}

		let loaded = Arc::new(self.load_catalog().await);
		let mut slot = self.catalog.write().await;
		Arc::clone(slot.get_or_insert(loaded))
	}

	/// Drops the cached catalog, overrides and provider snapshot.
	///
	/// Everything reloads on next access, including settings read from the
	/// environment.
	pub async fn reset(&self) {
		*self.catalog.write().await = None;
		*self.overrides.write().await = None;
		*self.provider_cache.lock().await = ProviderCache::default();
		debug!("feature flag caches cleared");
	}

	fn load_overrides(&self) -> OverrideMap {
		let Some(raw) = env_var(self.env.as_ref(), &[OVERRIDE_ENV]) else {
			return OverrideMap::default();
		};

		match OverrideMap::from_json(&raw) {
			Ok(overrides) => {
				debug!(count = overrides.len(), "loaded feature flag overrides");
				overrides
			}
			Err(e) => {
				warn!(var = OVERRIDE_ENV, error = %e, "ignoring invalid feature flag overrides");
				OverrideMap::default()
			}
		}
	}

	fn catalog_path(&self) -> PathBuf {
		env_var(self.env.as_ref(), &[CATALOG_PATH_ENV])
			.map(PathBuf::from)
			.unwrap_or_else(|| self.default_catalog_path.clone())
	}

	async fn load_catalog(&self) -> Catalog {
		let path = self.catalog_path();
		let loaded = match tokio::fs::read_to_string(&path).await {
			Ok(content) => Catalog::parse(&path, &content),
			Err(source) => Err(CatalogError::Io {
				path: path.clone(),
				source,
			}),
		};
		match loaded {
			Ok(catalog) => {
				debug!(path = %path.display(), count = catalog.len(), "loaded flag catalog");
				catalog
			}
			Err(e) if e.is_not_found() => {
				debug!(path = %path.display(), "flag catalog not found, using empty catalog");
				Catalog::default()
			}
			Err(e) => {
				warn!(path = %path.display(), error = %e, "ignoring unreadable flag catalog");
				Catalog::default()
			}
		}
	}
}

impl Default for FlagResolver {
	fn default() -> Self {
		Self::from_env()
	}
}

/// Builder for [`FlagResolver`].
#[derive(Default)]
pub struct FlagResolverBuilder {
	env: Option<Arc<dyn EnvSource>>,
	catalog_path: Option<PathBuf>,
	provider: Option<ProviderClient>,
}

impl FlagResolverBuilder {
	/// Environment to read settings from. Defaults to the process environment.
	pub fn env(mut self, env: impl EnvSource + 'static) -> Self {
		self.env = Some(Arc::new(env));
		self
	}

	/// Catalog used when `LOOM_FLAGS_CATALOG_PATH` is unset.
	pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.catalog_path = Some(path.into());
		self
	}

	pub fn provider_client(mut self, provider: ProviderClient) -> Self {
		self.provider = Some(provider);
		self
	}

	pub fn build(self) -> FlagResolver {
		FlagResolver {
			env: self.env.unwrap_or_else(|| Arc::new(ProcessEnv)),
			default_catalog_path: self
				.catalog_path
				.unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
			provider: self.provider.unwrap_or_default(),
			provider_cache: Mutex::new(ProviderCache::default()),
			overrides: RwLock::new(None),
			catalog: RwLock::new(None),
		}
	}
}

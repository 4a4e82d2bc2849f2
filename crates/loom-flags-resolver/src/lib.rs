// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime feature flag resolution for Loom services.
//!
//! [`FlagResolver`] answers "is this flag on?" by consulting, in order:
//!
//! 1. an explicit caller decision (`true`, `"on"`, `"0"`, ...)
//! 2. an Unleash-compatible provider, when `LOOM_FLAGS_PROVIDER=unleash`
//! 3. the `LOOM_FEATURE_FLAGS` JSON override
//! 4. the status recorded in `config/feature-flags.json`
//!
//! and finally defaults to `false`. Resolution never fails: a broken layer is
//! logged and skipped.
//!
//! # Configuration
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LOOM_FLAGS_PROVIDER` | `local` |
//! | `LOOM_FLAGS_UNLEASH_URL` / `LOOM_FLAGS_UNLEASH_PROXY_URL` | unset |
//! | `LOOM_FLAGS_UNLEASH_API_TOKEN` / `LOOM_FLAGS_UNLEASH_CLIENT_KEY` | unset |
//! | `LOOM_FLAGS_UNLEASH_APP_NAME` | `loom-api` |
//! | `LOOM_FLAGS_UNLEASH_INSTANCE_ID` | `loom-api` |
//! | `LOOM_FLAGS_UNLEASH_ENVIRONMENT` / `LOOM_RUNTIME_ENV` | `development` |
//! | `LOOM_FLAGS_UNLEASH_TIMEOUT_SECONDS` | `2` |
//! | `LOOM_FLAGS_UNLEASH_CACHE_TTL_SECONDS` | `30` |
//! | `LOOM_FEATURE_FLAGS` | unset |
//! | `LOOM_FLAGS_CATALOG_PATH` | `config/feature-flags.json` |
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use loom_flags_resolver::FlagResolver;
//!
//! let flags = Arc::new(FlagResolver::from_env());
//!
//! if flags.is_feature_enabled("api.tools.salary-raise-calculator").await {
//!     // ...
//! }
//!
//! // A decision already made upstream wins over every source.
//! let enabled = flags.is_feature_enabled_with("api.tools.x", "on").await;
//!
//! // Pick up catalog or environment changes.
//! flags.reset().await;
//! ```

pub mod config;
pub mod env;
mod error;
mod provider;
mod resolver;

pub use config::ProviderSettings;
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use error::{ProviderError, Result};
pub use provider::ProviderClient;
pub use resolver::{DecisionSource, FlagDecision, FlagResolver, FlagResolverBuilder};

pub use loom_flags_catalog::{BoolLike, Catalog, OverrideMap, ProviderSnapshot};

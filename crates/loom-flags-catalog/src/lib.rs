// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for Loom feature flag resolution.
//!
//! This crate holds the data model shared by the runtime resolver
//! (`loom-flags-resolver`) and the catalog hygiene tool (`loom-flags-hygiene`).
//!
//! # Overview
//!
//! Three sources feed a flag decision:
//! - [`ProviderSnapshot`]: live decisions fetched from an Unleash-compatible server
//! - [`OverrideMap`]: forced values parsed from a JSON environment variable
//! - [`Catalog`]: the static manifest at `config/feature-flags.json`
//!
//! All three are parsed leniently. Malformed entries are dropped one by one
//! instead of failing the whole payload.
//!
//! # Example
//!
//! ```
//! use loom_flags_catalog::{parse_bool_like, Catalog, OverrideMap};
//!
//! let overrides = OverrideMap::from_json(r#"{"api.tools.x": "on", "api.tools.y": 7}"#).unwrap();
//! assert_eq!(overrides.get("api.tools.x"), Some(true));
//! assert_eq!(overrides.get("api.tools.y"), None);
//!
//! let catalog = Catalog::from_value(&serde_json::json!({
//!     "flags": [{"key": "api.tools.x", "status": "Active"}],
//! }))
//! .unwrap();
//! assert!(catalog.is_enabled("api.tools.x"));
//!
//! assert_eq!(parse_bool_like(" YES "), Some(true));
//! ```

pub mod boolean;
pub mod catalog;
pub mod error;
pub mod overrides;
pub mod snapshot;

pub use boolean::{parse_bool_like, BoolLike};
pub use catalog::{
	parse_flag_entries, parse_iso_date, read_flag_entries, text_field, Catalog, FlagCatalogEntry,
	FlagStatus, FlagType, DEFAULT_CATALOG_PATH, ENABLED_STATUSES,
};
pub use error::{CatalogError, PayloadError};
pub use overrides::OverrideMap;
pub use snapshot::ProviderSnapshot;

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end precedence tests across provider, override and catalog.

use std::io::Write;

use loom_flags_resolver::config::{OVERRIDE_ENV, PROVIDER_ENV, UNLEASH_URL_ENV};
use loom_flags_resolver::{DecisionSource, FlagResolver, MapEnv};
use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FLAG: &str = "api.tools.salary-raise-calculator";

fn catalog() -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	let payload = json!({
		"flags": [
			{
				"key": FLAG,
				"status": "draft",
				"owner": "platform",
				"type": "release",
				"createdAt": "2025-01-10",
				"removeBy": "2030-01-10"
			},
			{
				"key": "api.tools.budget",
				"status": "enabled",
				"owner": "platform",
				"type": "release",
				"createdAt": "2025-01-10",
				"removeBy": "2030-01-10"
			}
		]
	});
	file.write_all(payload.to_string().as_bytes()).unwrap();
	file
}

fn resolver(env: MapEnv, catalog: &NamedTempFile) -> FlagResolver {
	FlagResolver::builder()
		.env(env)
		.catalog_path(catalog.path())
		.build()
}

async fn provider_with(features: serde_json::Value) -> MockServer {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/api/client/features"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({ "features": features })))
		.mount(&server)
		.await;
	server
}

#[tokio::test]
async fn catalog_status_decides_when_nothing_else_does() {
	let catalog = catalog();
	let flags = resolver(MapEnv::new(), &catalog);

	assert!(!flags.is_feature_enabled(FLAG).await);
	assert!(flags.is_feature_enabled("api.tools.budget").await);
}

#[tokio::test]
async fn absent_everywhere_is_off() {
	let server = provider_with(json!([])).await;
	let catalog = catalog();
	let env = MapEnv::new()
		.with(PROVIDER_ENV, "unleash")
		.with(UNLEASH_URL_ENV, server.uri())
		.with(OVERRIDE_ENV, r#"{"api.other": true}"#);
	let flags = resolver(env, &catalog);

	let decision = flags.evaluate("api.nowhere", None::<bool>).await;
	assert!(!decision.enabled);
	assert_eq!(decision.source, DecisionSource::Default);
}

#[tokio::test]
async fn explicit_value_beats_everything() {
	let server = provider_with(json!([{"name": FLAG, "enabled": false}])).await;
	let catalog = catalog();
	let env = MapEnv::new()
		.with(PROVIDER_ENV, "unleash")
		.with(UNLEASH_URL_ENV, server.uri())
		.with(OVERRIDE_ENV, json!({ FLAG: false }).to_string());
	let flags = resolver(env, &catalog);

	assert!(flags.is_feature_enabled_with(FLAG, true).await);
	assert!(flags.is_feature_enabled_with(FLAG, "1").await);
	assert!(!flags.is_feature_enabled_with("api.tools.budget", "off").await);
}

#[tokio::test]
async fn override_beats_catalog() {
	let catalog = catalog();
	let env = MapEnv::new().with(OVERRIDE_ENV, json!({ FLAG: true }).to_string());
	let flags = resolver(env, &catalog);

	assert!(flags.is_feature_enabled(FLAG).await);
}

#[tokio::test]
async fn override_applies_when_provider_is_silent() {
	let server = provider_with(json!([{"name": "api.unrelated", "enabled": true}])).await;
	let catalog = catalog();
	let env = MapEnv::new()
		.with(PROVIDER_ENV, "unleash")
		.with(UNLEASH_URL_ENV, server.uri())
		.with(OVERRIDE_ENV, json!({ FLAG: true }).to_string());
	let flags = resolver(env, &catalog);

	let decision = flags.evaluate(FLAG, None::<bool>).await;
	assert!(decision.enabled);
	assert_eq!(decision.source, DecisionSource::Override);
}

#[tokio::test]
async fn provider_beats_override_and_catalog() {
	let server = provider_with(json!([
		{"name": FLAG, "enabled": true},
		{"name": "api.tools.budget", "enabled": false},
	]))
	.await;
	let catalog = catalog();
	let env = MapEnv::new()
		.with(PROVIDER_ENV, "unleash")
		.with(UNLEASH_URL_ENV, server.uri())
		.with(OVERRIDE_ENV, json!({ FLAG: false }).to_string());
	let flags = resolver(env, &catalog);

	assert!(flags.is_feature_enabled(FLAG).await);
	assert!(!flags.is_feature_enabled("api.tools.budget").await);
	assert_eq!(
		flags.evaluate(FLAG, None::<bool>).await.source,
		DecisionSource::Provider
	);
}

#[tokio::test]
async fn invalid_override_payload_falls_through_to_catalog() {
	let catalog = catalog();
	let env = MapEnv::new().with(OVERRIDE_ENV, "{invalid");
	let flags = resolver(env, &catalog);

	assert!(flags.overrides().await.is_empty());
	assert!(!flags.is_feature_enabled(FLAG).await);
	assert!(!flags.is_feature_enabled("api.tools.unlisted").await);
}

#[tokio::test]
async fn unreachable_provider_behaves_like_inactive_provider() {
	let uri = {
		let server = MockServer::start().await;
		server.uri()
	};
	let catalog = catalog();
	let env = MapEnv::new()
		.with(PROVIDER_ENV, "unleash")
		.with(UNLEASH_URL_ENV, uri)
		.with(OVERRIDE_ENV, json!({ FLAG: true }).to_string());
	let flags = resolver(env.clone(), &catalog);
	let inactive = resolver(env.with(PROVIDER_ENV, "local"), &catalog);

	for key in [FLAG, "api.tools.budget", "api.tools.unlisted"] {
		assert_eq!(
			flags.is_feature_enabled(key).await,
			inactive.is_feature_enabled(key).await,
			"{key}"
		);
	}
}

#[tokio::test]
async fn override_round_trip_for_uncatalogued_key() {
	let catalog = catalog();
	let env = MapEnv::new().with(OVERRIDE_ENV, r#"{"flag-key": true}"#);
	let flags = resolver(env, &catalog);

	assert!(flags.is_feature_enabled("flag-key").await);
}

#[tokio::test]
async fn reset_reloads_overrides() {
	let catalog = catalog();
	let flags = FlagResolver::builder()
		.env(MapEnv::new().with(OVERRIDE_ENV, json!({ FLAG: true }).to_string()))
		.catalog_path(catalog.path())
		.build();
	assert!(flags.is_feature_enabled(FLAG).await);

	flags.reset().await;
	assert!(flags.is_feature_enabled(FLAG).await);
	assert_eq!(flags.overrides().await.get(FLAG), Some(true));
}

//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: command line → HTTP requests → Singer messages

use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write;
use tap_getcensus::catalog::Catalog;
use tap_getcensus::cli::{Cli, Runner};
use tap_getcensus::connector::{CensusConnector, Connector};
use tap_getcensus::output::MessageWriter;
use tap_getcensus::state::StateManager;
use tap_getcensus::{Error, TapConfig};
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUTH_HEADER: &str = "Basic YmVhcmVyOmFiYzEyMw==";

// ============================================================================
// Helpers
// ============================================================================

fn write_json(dir: &TempDir, name: &str, value: &Value) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_vec(value).unwrap()).unwrap();
    path.to_string_lossy().into_owned()
}

fn config_json(server: &MockServer) -> Value {
    json!({
        "api_token": "abc123",
        "api_url": server.uri(),
        "max_retries": 0
    })
}

/// Catalog file selecting only `streams`
fn catalog_selecting(dir: &TempDir, streams: &[&str]) -> String {
    let mut catalog = Catalog::discover(&tap_getcensus::streams::all_streams());
    for entry in &mut catalog.streams {
        let root = entry
            .metadata
            .iter_mut()
            .find(|m| m.breadcrumb.is_empty())
            .unwrap();
        root.metadata.insert(
            "selected".to_string(),
            Value::Bool(streams.contains(&entry.tap_stream_id.as_str())),
        );
    }
    write_json(dir, "catalog.json", &serde_json::to_value(&catalog).unwrap())
}

async fn run(args: &[&str]) -> tap_getcensus::Result<Vec<Value>> {
    let mut argv = vec!["tap-getcensus"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    let out = Runner::new(cli).run_to(Vec::new()).await?;
    Ok(String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect())
}

fn records<'a>(messages: &'a [Value], stream: &str) -> Vec<&'a Value> {
    messages
        .iter()
        .filter(|m| m["type"] == "RECORD" && m["stream"] == stream)
        .map(|m| &m["record"])
        .collect()
}

fn last_state(messages: &[Value]) -> &Value {
    &messages
        .iter()
        .rev()
        .find(|m| m["type"] == "STATE")
        .unwrap()["value"]
}

async fn mount_syncs(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/syncs"))
        .and(header("Authorization", AUTH_HEADER))
        .and(query_param("order", "asc"))
        .and(query_param("per_page", "1"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 42, "label": "accounts", "updated_at": "2024-01-01T00:00:00Z"}],
            "next": format!("{}/api/v1/syncs?page=2", server.uri())
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/syncs"))
        .and(header("Authorization", AUTH_HEADER))
        .and(query_param("order", "asc"))
        .and(query_param("per_page", "1"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 43, "label": "users", "updated_at": "2024-03-01T00:00:00Z"}],
            "next": null
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_sync_runs(server: &MockServer, sync_id: u64, updated_at: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/syncs/{sync_id}/sync_runs")))
        .and(header("Authorization", AUTH_HEADER))
        .and(query_param("order", "asc"))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": sync_id * 10, "status": "completed", "updated_at": updated_at}],
            "next": null
        })))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Sync Tests
// ============================================================================

#[tokio::test]
async fn test_sync_follows_next_links_and_children() {
    let server = MockServer::start().await;
    mount_syncs(&server).await;
    mount_sync_runs(&server, 42, "2024-02-01T00:00:00Z").await;
    mount_sync_runs(&server, 43, "2024-01-15T00:00:00Z").await;

    let dir = TempDir::new().unwrap();
    let config = write_json(&dir, "config.json", &config_json(&server));
    let catalog = catalog_selecting(&dir, &["syncs", "sync_runs"]);

    let messages = run(&["--config", &config, "--catalog", &catalog])
        .await
        .unwrap();

    let syncs: Vec<&Value> = records(&messages, "syncs");
    assert_eq!(syncs.len(), 2);
    assert_eq!(syncs[0]["id"], 42);
    assert_eq!(syncs[1]["id"], 43);

    let runs = records(&messages, "sync_runs");
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0]["sync_id"], 42);
    assert_eq!(runs[1]["sync_id"], 43);

    let state = last_state(&messages);
    assert_eq!(
        state["bookmarks"]["syncs"]["replication_key_value"],
        "2024-03-01T00:00:00Z"
    );
    let partitions = state["bookmarks"]["sync_runs"]["partitions"]
        .as_array()
        .unwrap();
    assert_eq!(partitions.len(), 2);
    assert_eq!(partitions[0]["context"], json!({"sync_id": 42}));
    assert_eq!(partitions[0]["replication_key_value"], "2024-02-01T00:00:00Z");
}

#[tokio::test]
async fn test_sync_emits_schemas_before_records() {
    let server = MockServer::start().await;
    mount_syncs(&server).await;
    mount_sync_runs(&server, 42, "2024-02-01T00:00:00Z").await;
    mount_sync_runs(&server, 43, "2024-02-01T00:00:00Z").await;

    let dir = TempDir::new().unwrap();
    let config = write_json(&dir, "config.json", &config_json(&server));
    let catalog = catalog_selecting(&dir, &["sync_runs"]);

    let messages = run(&["--config", &config, "--catalog", &catalog])
        .await
        .unwrap();

    // Parent is fetched for its ids but not emitted
    assert!(records(&messages, "syncs").is_empty());
    assert_eq!(records(&messages, "sync_runs").len(), 2);

    let first_record = messages.iter().position(|m| m["type"] == "RECORD").unwrap();
    let schema = messages
        .iter()
        .position(|m| m["type"] == "SCHEMA" && m["stream"] == "sync_runs")
        .unwrap();
    assert!(schema < first_record);
    assert!(!messages
        .iter()
        .any(|m| m["type"] == "SCHEMA" && m["stream"] == "syncs"));
}

#[tokio::test]
async fn test_sync_keeps_newer_bookmark_from_state_file() {
    let server = MockServer::start().await;
    mount_syncs(&server).await;

    let dir = TempDir::new().unwrap();
    let config = write_json(&dir, "config.json", &config_json(&server));
    let catalog = catalog_selecting(&dir, &["syncs"]);
    let state = write_json(
        &dir,
        "state.json",
        &json!({"bookmarks": {"syncs": {
            "replication_key": "updated_at",
            "replication_key_value": "2025-01-01T00:00:00Z"
        }}}),
    );

    let messages = run(&[
        "--config", &config, "--catalog", &catalog, "--state", &state,
    ])
    .await
    .unwrap();

    // Records are not filtered by the bookmark
    assert_eq!(records(&messages, "syncs").len(), 2);
    assert_eq!(
        last_state(&messages)["bookmarks"]["syncs"]["replication_key_value"],
        "2025-01-01T00:00:00Z"
    );
}

#[tokio::test]
async fn test_sync_reports_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/syncs"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_json(&dir, "config.json", &config_json(&server));
    let catalog = catalog_selecting(&dir, &["syncs"]);

    let err = run(&["--config", &config, "--catalog", &catalog])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_sync_rejects_non_string_next() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/sources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1}],
            "next": 2
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_json(&dir, "config.json", &config_json(&server));
    let catalog = catalog_selecting(&dir, &["sources"]);

    let err = run(&["--config", &config, "--catalog", &catalog])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Pagination { .. }));
}

// ============================================================================
// Connector Tests
// ============================================================================

#[tokio::test]
async fn test_connector_read_destination_objects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/destinations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 7, "name": "warehouse"}],
            "next": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/destinations/7/objects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"full_name": "public.accounts", "label": "Accounts"},
                {"full_name": "public.users", "label": "Users"}
            ],
            "next": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = TapConfig::from_value(config_json(&server)).unwrap();
    let connector = CensusConnector::new(config);
    let dir = TempDir::new().unwrap();
    let catalog_path = catalog_selecting(&dir, &["destinations", "destination_objects"]);
    let catalog = Catalog::from_file(catalog_path).unwrap();

    let (stats, writer) = connector
        .read(Some(&catalog), StateManager::in_memory(), MessageWriter::new(Vec::new()))
        .await
        .unwrap();

    assert_eq!(stats.records_for("destinations"), 1);
    assert_eq!(stats.records_for("destination_objects"), 2);

    let messages: Vec<Value> = String::from_utf8(writer.into_inner())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let objects = records(&messages, "destination_objects");
    assert_eq!(objects[0]["destination_id"], 7);
    assert_eq!(objects[1]["full_name"], "public.users");
}

// ============================================================================
// Mode Tests
// ============================================================================

#[tokio::test]
async fn test_discover_without_config() {
    let messages = run(&["--discover"]).await.unwrap();
    assert_eq!(messages.len(), 1);

    let streams = messages[0]["streams"].as_array().unwrap();
    let names: Vec<&str> = streams
        .iter()
        .map(|s| s["tap_stream_id"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "syncs",
            "sync_runs",
            "destinations",
            "destination_objects",
            "sources",
            "source_objects"
        ]
    );
}

#[tokio::test]
async fn test_about_json() {
    let messages = run(&["--about"]).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["name"], "tap-getcensus");
    assert_eq!(messages[0]["settings"]["required"], json!(["api_token"]));
}

#[tokio::test]
async fn test_about_markdown() {
    let cli = Cli::try_parse_from(["tap-getcensus", "--about", "--format", "markdown"]).unwrap();
    let out = Runner::new(cli).run_to(Vec::new()).await.unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("# tap-getcensus"));
    assert!(text.contains("api_token"));
}

#[tokio::test]
async fn test_test_mode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/syncs"))
        .and(header("Authorization", AUTH_HEADER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "next": null})))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(config_json(&server).to_string().as_bytes())
        .unwrap();
    let config = file.path().to_string_lossy().into_owned();

    let messages = run(&["--config", &config, "--test"]).await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_sync_requires_config() {
    let err = run(&[]).await.unwrap_err();
    assert!(err.to_string().contains("--config"));
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = write_json(&dir, "config.json", &json!({"api_url": "https://example.com"}));

    let err = run(&["--config", &config]).await.unwrap_err();
    assert!(err.to_string().contains("api_token"));
}

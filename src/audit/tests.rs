//! Tests for the audit proxy and sinks

use super::{AuditLevel, AuditSink, FileAuditSink, LoggingProxy, TracingAuditSink};
use crate::client::RequestExecutor;
use crate::config::ClientConfig;
use crate::types::HttpMethod;
use crate::{Result, VeritransError};
use mockito::Server;
use serde_json::json;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MemorySink {
    entries: Mutex<Vec<(AuditLevel, String)>>,
}

impl MemorySink {
    fn entries(&self) -> Vec<(AuditLevel, String)> {
        self.entries.lock().unwrap().clone()
    }
}

impl AuditSink for MemorySink {
    fn write(&self, level: AuditLevel, message: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .push((level, message.to_string()));
        Ok(())
    }
}

struct BrokenSink;

impl AuditSink for BrokenSink {
    fn write(&self, _level: AuditLevel, _message: &str) -> Result<()> {
        Err(VeritransError::audit("disk full"))
    }
}

fn proxy_for(server: &Server, sink: Arc<dyn AuditSink>) -> (LoggingProxy, ClientConfig) {
    let config = ClientConfig::new("SB-Mid-abc123").with_api_host(format!("{}/v2", server.url()));
    let executor = RequestExecutor::new(config.clone()).unwrap();
    (LoggingProxy::new(executor, sink), config)
}

#[tokio::test]
async fn test_success_is_logged_as_info() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v2/charge")
        .with_status(200)
        .with_body(r#"{"status_code":"200","transaction_status":"settlement"}"#)
        .create_async()
        .await;

    let sink = Arc::new(MemorySink::default());
    let (proxy, config) = proxy_for(&server, sink.clone());

    let result = proxy
        .execute_with_logging(
            HttpMethod::Post,
            &config.url_for("/charge"),
            &json!({"order_id": "A-1"}),
        )
        .await
        .unwrap();

    assert_eq!(result.status_code(), 200);

    let entries = sink.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0, AuditLevel::Info);
    assert_eq!(entries[0].1, "Perform /charge \nSending: {\"order_id\":\"A-1\"}");
    assert_eq!(entries[1].0, AuditLevel::Info);
    assert!(entries[1].1.starts_with("Success /charge \nGot: "));
    assert!(entries[1].1.contains("settlement"));
}

#[tokio::test]
async fn test_failure_status_is_logged_as_warning() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/A-1/status")
        .with_status(401)
        .with_body(r#"{"status_code":"401","status_message":"Access denied"}"#)
        .create_async()
        .await;

    let sink = Arc::new(MemorySink::default());
    let (proxy, config) = proxy_for(&server, sink.clone());

    let result = proxy
        .get(&config.url_for("/A-1/status"), &json!({}))
        .await
        .unwrap();

    assert_eq!(result.status_code(), 401);

    let entries = sink.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0, AuditLevel::Info);
    assert!(entries[0].1.contains("/A-1/status"));
    assert_eq!(entries[1].0, AuditLevel::Warn);
    assert!(entries[1].1.starts_with("Failed /A-1/status \nGot: "));
    assert!(entries[1].1.contains("Access denied"));
}

#[tokio::test]
async fn test_result_is_returned_untouched() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("DELETE", "/v2/card/token-1")
        .with_status(202)
        .with_body(r#"{"status_code":"202"}"#)
        .expect(2)
        .create_async()
        .await;

    let sink = Arc::new(MemorySink::default());
    let (proxy, config) = proxy_for(&server, sink);
    let url = config.url_for("/card/token-1");

    let logged = proxy.delete(&url, &json!({})).await.unwrap();
    let direct = proxy.executor().delete(&url, &json!({})).await.unwrap();

    assert_eq!(logged.status_code(), direct.status_code());
    assert_eq!(logged.body(), direct.body());
    assert_eq!(logged.data(), direct.data());
}

#[tokio::test]
async fn test_broken_sink_does_not_block_result() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v2/charge")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let (proxy, config) = proxy_for(&server, Arc::new(BrokenSink));

    let result = proxy.post(&config.url_for("/charge"), &json!({})).await.unwrap();
    assert_eq!(result.status_code(), 200);
}

#[tokio::test]
async fn test_missing_server_key_still_raises() {
    let sink = Arc::new(MemorySink::default());
    let executor = RequestExecutor::new(ClientConfig::default()).unwrap();
    let proxy = LoggingProxy::new(executor, sink);

    let err = proxy
        .post("https://api.sandbox.veritrans.co.id/v2/charge", &json!({}))
        .await
        .unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_file_sink_appends_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log").join("veritrans.log");

    let sink = FileAuditSink::open(&path).unwrap();
    sink.info("Perform /charge").unwrap();
    sink.warn("Failed /charge").unwrap();

    let contents = std::fs::read_to_string(sink.path()).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" INFO Perform /charge"));
    assert!(lines[1].ends_with(" WARN Failed /charge"));
}

#[test]
fn test_file_sink_reopen_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("veritrans.log");

    FileAuditSink::open(&path).unwrap().info("first").unwrap();
    FileAuditSink::open(&path).unwrap().info("second").unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" INFO first"));
    assert!(lines[1].ends_with(" INFO second"));
}

#[test]
fn test_daily_file_sink_writes_dated_file() {
    let dir = tempfile::tempdir().unwrap();

    let sink = FileAuditSink::daily(dir.path(), "veritrans.log").unwrap();
    sink.warn("Failed /charge").unwrap();

    let files: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("veritrans.log."));

    let contents = std::fs::read_to_string(dir.path().join(&files[0])).unwrap();
    assert!(contents.trim_end().ends_with(" WARN Failed /charge"));
}

#[test]
fn test_tracing_sink_never_fails() {
    assert!(TracingAuditSink.info("hello").is_ok());
    assert!(TracingAuditSink.warn("hello").is_ok());
}

#[test]
fn test_proxy_with_tracing_sink() {
    let executor = RequestExecutor::new(ClientConfig::new("SB-Mid-abc123")).unwrap();
    let proxy = LoggingProxy::with_tracing(executor);

    let result = tokio_test::block_on(proxy.execute_with_logging(
        HttpMethod::Post,
        "not a url",
        &json!({}),
    ));
    assert!(result.is_err());
}

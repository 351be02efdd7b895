/// HTTP client for the `/json` metrics endpoint

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::core::snapshot::MetricsSnapshot;

/// Ways a snapshot fetch can fail. The dashboard treats all three alike.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server responded with HTTP {0}")]
    HttpStatus(StatusCode),

    #[error("Invalid JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::HttpStatus(_) => "http_status",
            FetchError::Parse(_) => "parse",
        }
    }
}

/// Build the full snapshot URL from a configured base
pub fn metrics_url(base: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    if base.ends_with("/json") {
        base.to_string()
    } else {
        format!("{}/json", base)
    }
}

#[derive(Clone)]
pub struct MetricsClient {
    client: Client,
    url: String,
}

impl MetricsClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("metrics-dash/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: metrics_url(endpoint),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one GET and decode the body
    pub async fn fetch(&self) -> Result<MetricsSnapshot, FetchError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status));
        }

        let body = response.bytes().await?;
        Ok(MetricsSnapshot::from_json(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve a single canned HTTP response, reporting the request line back
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let request_line = request.lines().next().unwrap_or_default().to_string();
                let _ = tx.send(request_line);

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), rx)
    }

    fn client_for(base: &str) -> MetricsClient {
        MetricsClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_metrics_url() {
        assert_eq!(metrics_url("http://localhost:8080"), "http://localhost:8080/json");
        assert_eq!(metrics_url("http://localhost:8080/"), "http://localhost:8080/json");
        assert_eq!(metrics_url("http://host/metrics/json"), "http://host/metrics/json");
        assert_eq!(metrics_url(" http://host/json/ "), "http://host/json");
    }

    #[tokio::test]
    async fn test_fetch_success_issues_get_to_json() {
        let (base, request_rx) = serve_once("200 OK", r#"{"cpuUsage": 82.3, "activeProcesses": 12}"#).await;

        let snapshot = client_for(&base).fetch().await.unwrap();
        assert_eq!(snapshot.cpu_usage, Some(82.3));
        assert_eq!(snapshot.active_processes, Some(12));

        let request_line = request_rx.await.unwrap();
        assert!(request_line.starts_with("GET /json "), "unexpected request: {}", request_line);
    }

    #[tokio::test]
    async fn test_fetch_http_error_status() {
        let (base, _rx) = serve_once("500 Internal Server Error", r#"{"detail": "boom"}"#).await;

        let err = client_for(&base).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus(s) if s.as_u16() == 500));
        assert!(err.to_string().contains("500"));
        assert_eq!(err.kind(), "http_status");
    }

    #[tokio::test]
    async fn test_fetch_parse_error() {
        let (base, _rx) = serve_once("200 OK", "not json at all").await;

        let err = client_for(&base).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
        assert!(err.to_string().starts_with("Invalid JSON response"));
    }

    #[tokio::test]
    async fn test_fetch_network_error() {
        // Grab a free port, then close it so the connect is refused
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{}", addr)).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
        assert!(err.to_string().starts_with("Request failed"));
    }
}

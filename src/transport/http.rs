// src/transport/http.rs
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{Result, TelemetryError};
use crate::log_debug;
use crate::transport::DeviceTransport;
use crate::types::{CommandReply, ControlCommand, Reading, RollingHistory};

/// reqwest-backed transport for the device's HTTP API
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        log_debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let response = ensure_success(response, path)?;

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| TelemetryError::Decode(format!("{}: {}", path, e)))
    }

    async fn post(&self, path: &str, command: Option<&ControlCommand>) -> Result<CommandReply> {
        let url = self.url(path);
        log_debug!("POST {}", url);

        let request = self.client.post(&url);
        let request = match command {
            Some(command) => request.json(command),
            None => request,
        };

        let response = request.send().await?;
        let ok = response.status().is_success();
        let body = response.text().await.ok().filter(|b| !b.is_empty());

        Ok(CommandReply { ok, body })
    }
}

fn ensure_success(response: Response, path: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TelemetryError::Status {
            status: status.as_u16(),
            path: path.to_string(),
        })
    }
}

#[async_trait]
impl DeviceTransport for HttpTransport {
    async fn fetch_reading(&self) -> Result<Reading> {
        let reading: Reading = self.get_json("/data").await?;
        reading.normalize()
    }

    async fn fetch_history(&self) -> Result<RollingHistory> {
        self.get_json("/history").await
    }

    async fn send_control(&self, command: &ControlCommand) -> Result<CommandReply> {
        self.post("/control", Some(command)).await
    }

    async fn calibrate(&self) -> Result<CommandReply> {
        self.post("/calibrate", None).await
    }

    async fn restart(&self) -> Result<CommandReply> {
        self.post("/restart", None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Simulator;
    use crate::types::PowerProfile;
    use serde_json::{json, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Answers one request with a canned response and returns the raw request.
    async fn serve_once(status: &str, body: &str) -> (HttpTransport, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        let transport = HttpTransport::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
        (transport, server)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8(buf).unwrap()
    }

    fn request_body(request: &str) -> Value {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    fn reading_json() -> Value {
        serde_json::to_value(Simulator::seeded(1).next_reading(None, 0)).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let transport = HttpTransport::new("http://device.local/", Duration::from_secs(1)).unwrap();

        assert_eq!(transport.base_url(), "http://device.local");
        assert_eq!(transport.url("/data"), "http://device.local/data");
    }

    #[tokio::test]
    async fn test_unreachable_device_is_an_error() {
        // Nothing listens on the discard port
        let transport = HttpTransport::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();

        assert!(transport.fetch_reading().await.is_err());
        assert!(transport.restart().await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_reading_parses_device_payload() {
        let (transport, server) = serve_once("200 OK", &reading_json().to_string()).await;

        let reading = transport.fetch_reading().await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /data HTTP/1.1"));
        assert_eq!(reading.uptime, 3600);
        assert_eq!(reading.profile_name, "Balanced");
    }

    #[tokio::test]
    async fn test_non_success_status_on_data() {
        let (transport, server) = serve_once("503 Service Unavailable", "busy").await;

        let result = transport.fetch_reading().await;
        server.await.unwrap();

        match result {
            Err(TelemetryError::Status { status, path }) => {
                assert_eq!(status, 503);
                assert_eq!(path, "/data");
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_decode_error() {
        let (transport, server) = serve_once("200 OK", "{\"temperature\": 24.").await;

        let result = transport.fetch_reading().await;
        server.await.unwrap();

        assert!(matches!(result, Err(TelemetryError::Decode(ref msg)) if msg.starts_with("/data")));
    }

    #[tokio::test]
    async fn test_reading_with_unknown_ordinal_is_rejected() {
        let mut payload = reading_json();
        payload["trend"] = json!(7);
        let (transport, server) = serve_once("200 OK", &payload.to_string()).await;

        let result = transport.fetch_reading().await;
        server.await.unwrap();

        assert!(matches!(result, Err(TelemetryError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_history_with_unequal_series_is_rejected() {
        let body = r#"{"temperature":[21.0,21.5],"pressure":[1010.0],"battery":[3.9,3.8]}"#;
        let (transport, server) = serve_once("200 OK", body).await;

        let result = transport.fetch_history().await;
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /history HTTP/1.1"));
        assert!(matches!(result, Err(TelemetryError::Decode(_))));
    }

    #[tokio::test]
    async fn test_control_command_is_posted_as_json() {
        let (transport, server) = serve_once("200 OK", "").await;

        let reply = transport
            .send_control(&ControlCommand::set_profile(PowerProfile::UltraLowPower))
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /control HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert_eq!(request_body(&request), json!({"action": "profile", "value": 2.0}));
        assert!(reply.ok);
        assert_eq!(reply.body, None);
    }

    #[tokio::test]
    async fn test_toggle_command_omits_value() {
        let (transport, server) = serve_once("200 OK", "").await;

        transport.send_control(&ControlCommand::toggle_oled()).await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(request_body(&request), json!({"action": "oled_toggle"}));
    }

    #[tokio::test]
    async fn test_calibrate_returns_plain_text_body() {
        let (transport, server) = serve_once("200 OK", "Altitude zeroed").await;

        let reply = transport.calibrate().await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /calibrate HTTP/1.1"));
        assert!(reply.ok);
        assert_eq!(reply.body.as_deref(), Some("Altitude zeroed"));
    }

    #[tokio::test]
    async fn test_rejected_restart_reports_not_ok() {
        let (transport, server) = serve_once("500 Internal Server Error", "sensor bus fault").await;

        let reply = transport.restart().await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /restart HTTP/1.1"));
        assert!(!reply.ok);
        assert_eq!(reply.body.as_deref(), Some("sensor bus fault"));
    }
}

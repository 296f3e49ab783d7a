//! Transports that deliver a machine config to a single agent.

use crate::error::PushError;
use crate::models::{AgentAddress, MachineConfig};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Header carrying the agent's API key on HTTP pushes.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// A transport able to push a config to an agent.
///
/// `Ok(false)` means the transport declined (wrong protocol) or the agent
/// rejected the config; `Err` is a transport failure.
#[async_trait]
pub trait ConfigPusher: Send + Sync {
    fn name(&self) -> &str;

    async fn push(&self, agent: &AgentAddress, config: &MachineConfig) -> Result<bool, PushError>;
}

/// POSTs the config as JSON to `http`/`https` agents.
#[derive(Debug, Clone)]
pub struct HttpAgentPusher {
    client: reqwest::Client,
}

impl HttpAgentPusher {
    /// Create a pusher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, PushError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn handles(protocol: &str) -> bool {
        protocol.eq_ignore_ascii_case("http") || protocol.eq_ignore_ascii_case("https")
    }
}

#[async_trait]
impl ConfigPusher for HttpAgentPusher {
    fn name(&self) -> &str {
        "http"
    }

    async fn push(&self, agent: &AgentAddress, config: &MachineConfig) -> Result<bool, PushError> {
        if !Self::handles(&agent.protocol) {
            return Ok(false);
        }

        let mut request = self.client.post(&agent.endpoint).json(config);
        if let Some(key) = agent.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PushError::Timeout {
                    endpoint: agent.endpoint.clone(),
                }
            } else if e.is_connect() {
                PushError::Connect {
                    endpoint: agent.endpoint.clone(),
                }
            } else {
                PushError::Transport(e)
            }
        })?;

        let status = response.status();
        debug!("Agent {} answered {}", agent.id, status);
        Ok(status.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn agent(protocol: &str, endpoint: &str, api_key: Option<&str>) -> AgentAddress {
        AgentAddress {
            id: "bench-1".to_string(),
            protocol: protocol.to_string(),
            endpoint: endpoint.to_string(),
            api_key: api_key.map(String::from),
        }
    }

    fn local_pusher() -> HttpAgentPusher {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpAgentPusher::with_client(client)
    }

    /// Accept one request, answer with `status_line`, return the raw request text.
    async fn serve_once(listener: TcpListener, status_line: &'static str) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if raw.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!("{}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n", status_line);
        socket.write_all(response.as_bytes()).await.unwrap();
        String::from_utf8_lossy(&raw).to_string()
    }

    #[tokio::test]
    async fn test_declines_other_protocols() {
        let pusher = local_pusher();
        let pushed = pusher
            .push(&agent("grpc", "10.0.0.5:50051", None), &MachineConfig::default())
            .await
            .unwrap();
        assert!(!pushed);
    }

    #[tokio::test]
    async fn test_posts_json_with_api_key() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_once(listener, "HTTP/1.1 200 OK"));

        let endpoint = format!("http://{}/config", addr);
        let pushed = local_pusher()
            .push(&agent("HTTP", &endpoint, Some("secret-key")), &MachineConfig::default())
            .await
            .unwrap();
        assert!(pushed);

        let request = server.await.unwrap();
        let lower = request.to_lowercase();
        assert!(request.starts_with("POST /config"));
        assert!(lower.contains("x-api-key: secret-key"));
        assert!(lower.contains("content-type: application/json"));
        assert!(request.contains("\"identity\""));
    }

    #[tokio::test]
    async fn test_blank_api_key_is_omitted_and_error_status_is_false() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_once(listener, "HTTP/1.1 500 Internal Server Error"));

        let endpoint = format!("http://{}/config", addr);
        let pushed = local_pusher()
            .push(&agent("http", &endpoint, Some("   ")), &MachineConfig::default())
            .await
            .unwrap();
        assert!(!pushed);

        let request = server.await.unwrap();
        assert!(!request.to_lowercase().contains("x-api-key"));
    }
}

//! Connectivity oracle backed by a TCP probe of the submission endpoint

use super::traits::ConnectivityOracle;
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tokio::net::TcpStream;

/// Default probe timeout
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Reports online when the endpoint host accepts a TCP connection
pub struct TcpProbe {
    target: Option<(String, u16)>,
    timeout: Duration,
    force_offline: bool,
}

impl TcpProbe {
    pub fn new(endpoint: Option<&Url>, timeout: Duration, force_offline: bool) -> Self {
        let target = endpoint.and_then(|url| {
            let host = url.host_str()?.to_string();
            let port = url.port_or_known_default()?;
            Some((host, port))
        });
        Self {
            target,
            timeout,
            force_offline,
        }
    }
}

#[async_trait]
impl ConnectivityOracle for TcpProbe {
    async fn is_online(&self) -> bool {
        if self.force_offline {
            return false;
        }
        let Some((host, port)) = &self.target else {
            return false;
        };

        match tokio::time::timeout(self.timeout, TcpStream::connect((host.as_str(), *port))).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!("Connectivity probe to {host}:{port} failed: {e}");
                false
            }
            Err(_) => {
                tracing::debug!("Connectivity probe to {host}:{port} timed out");
                false
            }
        }
    }
}

// # HTTP IP Resolver
//
// Resolves the caller's current public IP with a single plain HTTP GET
// against a "what is my IP" lookup service. The response body is the bare
// address, no JSON envelope.
//
// ## Contract
//
// One outbound read per `resolve()` call. No retry, no caching, no
// polling: failures propagate unmodified, and callers that already know
// their address can skip this resolver entirely.

use std::net::IpAddr;
use std::time::Duration;

use allowsync_core::traits::IpResolver;
use allowsync_core::{Error, Result};
use tracing::debug;

/// Default lookup endpoint
pub const DEFAULT_IP_LOOKUP_URL: &str = "http://ipv4.whatismyip.akamai.com/";

/// Known open lookup endpoints (alternatives to the default)
#[allow(dead_code)]
const IP_LOOKUP_URLS: &[&str] = &[
    "http://ipv4.whatismyip.akamai.com/",
    "https://ifconfig.me/ip",
    "https://ipecho.net/plain",
    "https://icanhazip.com/",
    "http://ident.me/",
];

/// Request timeout for the lookup call
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP lookup based IP resolver
pub struct HttpIpResolver {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver against a specific lookup URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// The lookup URL this resolver queries
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpIpResolver {
    fn default() -> Self {
        Self::new(DEFAULT_IP_LOOKUP_URL)
    }
}

#[async_trait::async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::resolver(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::resolver(format!(
                "lookup returned HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::resolver(format!("failed to read response: {}", e)))?;

        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(Error::resolver("lookup returned an empty body"));
        }

        let ip: IpAddr = trimmed
            .parse()
            .map_err(|_| Error::resolver(format!("lookup returned a non-address body: {trimmed}")))?;

        debug!(url = %self.url, %ip, "resolved current public IP");
        Ok(ip)
    }
}

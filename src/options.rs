//! Transport configuration for the chat gateway.

use std::collections::HashMap;
use std::time::Duration;

/// Transport options for reaching the streaming chat endpoint.
///
/// # Example
/// ```rust
/// use chatstream::options::TransportOptions;
/// use std::time::Duration;
///
/// let options = TransportOptions::new("http://localhost:8000")
///     .with_timeout(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Base URL of the chat server (the `/get` route is appended per request).
    pub endpoint: String,

    /// Request timeout. Covers the whole streaming read, not just connect.
    pub timeout: Option<Duration>,

    /// HTTP proxy URL.
    pub proxy: Option<String>,

    /// Additional HTTP headers to include in requests.
    pub extra_headers: Option<HashMap<String, String>>,
}

impl TransportOptions {
    /// Create transport options pointing at a chat server.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: None,
            proxy: None,
            extra_headers: None,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: String) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Set extra headers.
    pub fn with_extra_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.extra_headers = Some(headers);
        self
    }

    /// Add a single extra header.
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key, value);
        self
    }
}

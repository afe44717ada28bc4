//! HTTP gateway for the streaming chat endpoint.
//!
//! Issues `POST {endpoint}/get` with the user text as form field `msg` and
//! hands the response body back as a raw byte stream for the SSE decoder.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder};
use std::collections::HashMap;

use crate::client::{ByteStream, ChatError, Gateway};
use crate::options::TransportOptions;

/// Build a configured HTTP client from transport options.
///
/// Applies common configuration like timeouts and proxies.
pub fn build_http_client(options: &TransportOptions) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder();

    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_url) = &options.proxy {
        if let Ok(proxy) = reqwest::Proxy::all(proxy_url) {
            builder = builder.proxy(proxy);
        }
    }

    builder.build()
}

/// Add extra headers to a request if specified in transport options.
pub fn add_extra_headers(
    mut request: RequestBuilder,
    extra_headers: &Option<HashMap<String, String>>,
) -> RequestBuilder {
    if let Some(headers) = extra_headers {
        for (key, value) in headers {
            request = request.header(key, value);
        }
    }
    request
}

/// Route of the answering endpoint, relative to the configured base URL.
const CHAT_ROUTE: &str = "/get";

fn request_url(endpoint: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), CHAT_ROUTE)
}

/// Gateway that talks to the chat server over HTTP.
pub struct HttpGateway {
    options: TransportOptions,
    client: Client,
}

impl HttpGateway {
    /// Create a gateway from transport options.
    ///
    /// # Errors
    /// `ChatError::Config` if the HTTP client cannot be constructed from the
    /// given options.
    pub fn new(options: TransportOptions) -> Result<Self, ChatError> {
        let client = build_http_client(&options)
            .map_err(|e| ChatError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { options, client })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn ask(&self, msg: &str) -> Result<ByteStream, ChatError> {
        let url = request_url(&self.options.endpoint);

        let mut req = self.client.post(&url).form(&[("msg", msg)]);
        req = add_extra_headers(req, &self.options.extra_headers);

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Gateway(format!("HTTP {}: {}", status, body)));
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ChatError::from))
            .boxed())
    }
}

use bytes::Bytes;
use reqwest::{header, Client, Method};

use crate::error::Result;

const DEFAULT_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub path: String,
    pub method: Method,
    pub authorization: Option<String>,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Bytes,
}

/// Relays calls to one fixed upstream origin. Paths are not filtered.
#[derive(Clone)]
pub struct ProxyService {
    client: Client,
    upstream: String,
}

impl ProxyService {
    pub fn new(client: Client, upstream: String) -> Self {
        Self {
            client,
            upstream: upstream.trim_end_matches('/').to_string(),
        }
    }

    pub fn target_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.upstream, path)
        } else {
            format!("{}/{}", self.upstream, path)
        }
    }

    pub async fn forward(&self, request: ProxyRequest) -> Result<ProxyResponse> {
        let target = self.target_url(&request.path);
        tracing::debug!(method = %request.method, %target, "Forwarding proxied request");

        let mut builder = self
            .client
            .request(request.method.clone(), target.as_str())
            .header(header::CONTENT_TYPE, DEFAULT_CONTENT_TYPE);
        if let Some(auth) = &request.authorization {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        if request.method != Method::GET && request.method != Method::HEAD {
            builder = builder.body(request.body);
        }

        let res = builder.send().await?;
        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let body = res.bytes().await?;

        Ok(ProxyResponse {
            status,
            content_type,
            body,
        })
    }
}

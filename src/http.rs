// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use reqwest::header;
use std::pin::Pin;
use url::Url;

use crate::constants::{API_TIMEOUT, DOWNLOAD_TIMEOUT, MAX_REDIRECTS};

/// A streaming response body
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// A fully buffered HTTP response
pub struct HttpBody {
    /// HTTP status code
    pub status: u16,
    /// Response body bytes
    pub bytes: Bytes,
}

/// HTTP response with status, content length, and body stream
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Content-Length header value, if present
    pub content_length: Option<u64>,
    /// Response body as a stream of bytes
    pub body: ByteStream,
}

/// HTTP client abstraction for testability
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch an entire response body as bytes (API calls, short timeout)
    async fn get_bytes(&self, url: &str) -> Result<HttpBody, reqwest::Error>;

    /// Get a streaming response for media downloads (long timeout)
    async fn get_stream(&self, url: &str) -> Result<HttpResponse, reqwest::Error>;
}

/// Default HTTP client implementation using reqwest.
///
/// Carries two inner clients: one with a short per-request deadline for API
/// and metadata calls, one with a longer deadline for media downloads. The
/// media client has automatic redirects disabled; `get_stream` follows them
/// manually so redirect targets can be rewritten to their path-only form.
#[derive(Clone)]
pub struct ReqwestClient {
    api: reqwest::Client,
    media: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new ReqwestClient with the default timeouts
    pub fn new() -> Self {
        let api = reqwest::Client::builder()
            .timeout(API_TIMEOUT)
            .build()
            .expect("failed to build API HTTP client");

        let media = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build media HTTP client");

        Self { api, media }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get_bytes(&self, url: &str) -> Result<HttpBody, reqwest::Error> {
        let response = self.api.get(url).send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        Ok(HttpBody { status, bytes })
    }

    async fn get_stream(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let mut current = url.to_string();
        let mut hops = 0;

        loop {
            let response = self.media.get(&current).send().await?;

            if response.status().is_redirection()
                && hops < MAX_REDIRECTS
                && let Some(next) = redirect_target(&current, response.headers())
            {
                hops += 1;
                current = next;
                continue;
            }

            // Either a final response, or a redirect we refuse to chase
            // further; in the latter case the 3xx status fails downstream.
            let status = response.status().as_u16();
            let content_length = response.content_length();
            let body: ByteStream = Box::pin(response.bytes_stream());

            return Ok(HttpResponse {
                status,
                content_length,
                body,
            });
        }
    }
}

/// Resolve a Location header against the current URL and strip its query
/// string, so tokens appended by upstream CDNs never leak into the follow-up
/// request.
fn redirect_target(current: &str, headers: &header::HeaderMap) -> Option<String> {
    let location = headers.get(header::LOCATION)?.to_str().ok()?;

    let mut next = match Url::parse(location) {
        Ok(url) => url,
        Err(_) => Url::parse(current).ok()?.join(location).ok()?,
    };

    next.set_query(None);
    Some(next.to_string())
}

//! Network transport seam for the retrying fetcher.
//!
//! [`HttpTransport`] is the production implementation backed by a single
//! reqwest [`Client`]; tests substitute scripted implementations of
//! [`Transport`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::error::TransportError;
use crate::user_agent;

/// Default TCP connect timeout (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// One round trip against a remote document.
///
/// `send` covers connecting and receiving the status line and headers; the
/// returned [`ResponseBody`] is read separately so the caller can classify
/// header-phase and body-phase failures differently.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Issues a GET for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] for network failures, transport-level
    /// timeouts and non-success HTTP status codes.
    async fn send(&self, url: &Url) -> Result<Box<dyn ResponseBody>, TransportError>;
}

/// An unread response body.
#[async_trait]
pub trait ResponseBody: Send {
    /// Reads the whole body into memory.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the stream fails mid-read.
    async fn read_all(self: Box<Self>) -> Result<Vec<u8>, TransportError>;
}

/// reqwest-backed transport.
///
/// Created once per run and shared read-only; the inner client pools
/// connections across attempts and items.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport with the default connect timeout.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the TLS backend or system proxy
    /// configuration cannot be initialised.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
    }

    /// Builds a transport with an explicit connect timeout.
    ///
    /// No overall request timeout is set here: the per-attempt deadline is
    /// owned by the fetcher.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    #[instrument(level = "debug")]
    pub fn with_connect_timeout(connect_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self), fields(url = %url))]
    async fn send(&self, url: &Url) -> Result<Box<dyn ResponseBody>, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::timeout(url.as_str())
                } else {
                    TransportError::network(url.as_str(), e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::http_status(url.as_str(), status.as_u16()));
        }

        debug!(status = status.as_u16(), "response headers received");
        Ok(Box::new(HttpBody {
            url: url.to_string(),
            response,
        }))
    }
}

struct HttpBody {
    url: String,
    response: reqwest::Response,
}

#[async_trait]
impl ResponseBody for HttpBody {
    async fn read_all(self: Box<Self>) -> Result<Vec<u8>, TransportError> {
        let Self { url, response } = *self;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::body(url, e))?;
        Ok(bytes.to_vec())
    }
}

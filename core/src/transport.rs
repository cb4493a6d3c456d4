//! The seam between request building and the network.
//!
//! # Design
//! `LvlClient` never opens sockets itself. It hands a fully built
//! `HttpRequest` to a `Transport` and gets an `HttpResponse` back, so tests
//! can substitute a recording fake and callers decide pooling, TLS and
//! timeouts. Non-2xx statuses are data, not transport errors; status
//! interpretation stays in the decoder.

use std::sync::Arc;

use crate::http::{HttpRequest, HttpResponse};

/// Error produced by a transport; carried unchanged inside `ApiError::Transport`.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Sends one HTTP request and returns one response.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::{UreqTransport, DEFAULT_BODY_LIMIT};

#[cfg(feature = "ureq")]
mod ureq_transport {
    use super::{Transport, TransportError};
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Largest response body read by default: 64 MiB.
    pub const DEFAULT_BODY_LIMIT: u64 = 64 * 1024 * 1024;

    /// Blocking transport backed by a `ureq::Agent`.
    ///
    /// The default agent has `http_status_as_error` disabled so 4xx/5xx
    /// responses reach the decoder. An agent passed to `from_agent` must be
    /// configured the same way.
    ///
    /// Bodies are read as raw bytes up to `body_limit`; a longer body fails
    /// the call with a transport error.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
        body_limit: u64,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self::from_agent(agent)
        }

        pub fn from_agent(agent: ureq::Agent) -> Self {
            Self {
                agent,
                body_limit: DEFAULT_BODY_LIMIT,
            }
        }

        pub fn with_body_limit(mut self, bytes: u64) -> Self {
            self.body_limit = bytes;
            self
        }

        pub fn body_limit(&self) -> u64 {
            self.body_limit
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let HttpRequest {
                method,
                url,
                headers,
                body,
            } = request;

            let result = match (method, body) {
                (HttpMethod::Get, None) => with_headers(self.agent.get(&url), &headers).call(),
                (HttpMethod::Get, Some(body)) => with_headers(self.agent.get(&url), &headers)
                    .force_send_body()
                    .send(body.as_slice()),
                (HttpMethod::Delete, None) => {
                    with_headers(self.agent.delete(&url), &headers).call()
                }
                (HttpMethod::Delete, Some(body)) => {
                    with_headers(self.agent.delete(&url), &headers)
                        .force_send_body()
                        .send(body.as_slice())
                }
                (HttpMethod::Post, None) => {
                    with_headers(self.agent.post(&url), &headers).send_empty()
                }
                (HttpMethod::Post, Some(body)) => {
                    with_headers(self.agent.post(&url), &headers).send(body.as_slice())
                }
                (HttpMethod::Put, None) => with_headers(self.agent.put(&url), &headers).send_empty(),
                (HttpMethod::Put, Some(body)) => {
                    with_headers(self.agent.put(&url), &headers).send(body.as_slice())
                }
            };

            let mut response = result?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .with_config()
                .limit(self.body_limit)
                .read_to_vec()?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

    fn with_headers<B>(
        mut builder: ureq::RequestBuilder<B>,
        headers: &[(String, String)],
    ) -> ureq::RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }
}

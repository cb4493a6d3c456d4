//! Path-aware fake transport shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use lvlup_core::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

pub const API_KEY: &str = "token";
pub const BASE_URL: &str = "http://lvlup.test/v4";

struct Route {
    method: HttpMethod,
    path: String,
    status: u16,
    body: String,
}

/// Answers requests by method and URL path; unmatched requests get a 404
/// with body `no route`. Every request is recorded.
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<Route>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, method: HttpMethod, path: &str, status: u16, body: &str) -> Self {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
        });
        self
    }

    /// Same response for every request.
    pub fn always(status: u16, body: &str) -> AlwaysTransport {
        AlwaysTransport {
            response: HttpResponse::new(status, body),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request recorded")
    }
}

impl Transport for MockTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = url::Url::parse(&request.url)?.path().to_string();
        let response = self
            .routes
            .iter()
            .find(|route| route.method == request.method && route.path == path)
            .map(|route| HttpResponse::new(route.status, route.body.clone()))
            .unwrap_or_else(|| HttpResponse::new(404, "no route"));
        self.seen.lock().unwrap().push(request);
        Ok(response)
    }
}

pub struct AlwaysTransport {
    response: HttpResponse,
    seen: Mutex<Vec<HttpRequest>>,
}

impl AlwaysTransport {
    pub fn last_request(&self) -> HttpRequest {
        self.seen.lock().unwrap().last().cloned().expect("no request recorded")
    }
}

impl Transport for AlwaysTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

/// Query pairs of a recorded request URL.
pub fn query_of(request: &HttpRequest) -> Vec<(String, String)> {
    url::Url::parse(&request.url)
        .unwrap()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

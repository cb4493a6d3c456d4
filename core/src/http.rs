//! HTTP request/response data and the generic request builder.
//!
//! # Design
//! Requests and responses are plain data. `build_request` turns a method,
//! a path suffix and a set of `RequestOptions` into an `HttpRequest` against
//! `base_url + path`; a `Transport` executes it. Keeping this step free of
//! I/O makes every endpoint's request shape testable on its own.
//!
//! All fields use owned types (`String`, `Vec`) so values move freely
//! between the builder, transports and test fakes.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use url::{ParseError, Url};

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries the query string. Header names are
/// lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// The body is kept as raw bytes; it is only interpreted as UTF-8 JSON by the
/// decoder, so a garbled error page still reports its status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Body as text, with invalid UTF-8 replaced by U+FFFD.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Headers, query parameters and body for a single request.
///
/// Setters apply in call order; a later value for the same header name or
/// query key replaces the earlier one. Nothing is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    headers: BTreeMap<String, String>,
    query: BTreeMap<String, String>,
    body: Option<Vec<u8>>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_headers<K, V>(self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |options, (name, value)| options.with_header(name, value))
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_query<K, V>(self, query: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        query
            .into_iter()
            .fold(self, |options, (key, value)| options.with_query_param(key, value))
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Compose an `HttpRequest` against `base_url + path`.
///
/// A body implies a `content-type: application/json` default, which option
/// headers may overwrite. Query options replace any value already present in
/// the URL under the same key.
pub fn build_request(
    base_url: &str,
    method: HttpMethod,
    path: &str,
    options: RequestOptions,
) -> Result<HttpRequest, ApiError> {
    let url = Url::parse(&format!("{base_url}{path}"))?;
    Ok(assemble(url, method, options))
}

/// Compose an `HttpRequest` against `base_url` extended by `segments`.
///
/// Each segment is percent-encoded on its own, so an id containing `/`, `?`
/// or `#` stays a single path segment.
pub fn build_segment_request(
    base_url: &str,
    method: HttpMethod,
    segments: &[&str],
    options: RequestOptions,
) -> Result<HttpRequest, ApiError> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|()| ApiError::InvalidUrl(ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    Ok(assemble(url, method, options))
}

fn assemble(mut url: Url, method: HttpMethod, options: RequestOptions) -> HttpRequest {
    let RequestOptions {
        headers: option_headers,
        query,
        body,
    } = options;

    if !query.is_empty() {
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !query.contains_key(key.as_ref()))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained)
            .extend_pairs(&query);
    }

    let mut headers = BTreeMap::new();
    if body.is_some() {
        headers.insert("content-type".to_string(), "application/json".to_string());
    }
    headers.extend(option_headers);

    HttpRequest {
        method,
        url: url.into(),
        headers: headers.into_iter().collect(),
        body,
    }
}

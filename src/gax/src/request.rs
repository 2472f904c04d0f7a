// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Request types.
//!
//! The [Request] type describes a single HTTP request sent through a
//! [Pipeline][crate::pipeline::Pipeline]. The URL is always absolute, the
//! pipeline adds any authentication and telemetry headers.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};

/// A HTTP request sent to a Resource Manager service.
///
/// # Example
/// ```
/// # use arm_gax::request::Request;
/// let request = Request::new(http::Method::PUT, "https://management.example.com/widgets/w1")
///     .set_header(http::header::CONTENT_TYPE, http::HeaderValue::from_static("application/json"))
///     .set_body(r#"{"size": 3}"#);
/// assert_eq!(request.method(), http::Method::PUT);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl Request {
    /// Creates a new request without headers or body.
    pub fn new<U: Into<String>>(method: Method, url: U) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Creates a `GET` request, as used to poll long-running operations.
    pub fn get<U: Into<String>>(url: U) -> Self {
        Self::new(Method::GET, url)
    }

    /// Adds (or replaces) a header.
    pub fn set_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the request body.
    pub fn set_body<B: Into<Bytes>>(mut self, body: B) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The absolute request URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The request body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Decomposes the request.
    pub fn into_parts(self) -> (Method, String, HeaderMap, Option<Bytes>) {
        (self.method, self.url, self.headers, self.body)
    }
}

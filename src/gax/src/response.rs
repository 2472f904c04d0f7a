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

//! Response types.
//!
//! This module contains the [Response] type returned by a
//! [Pipeline][crate::pipeline::Pipeline]. The body is fully buffered, so the
//! underlying connection is released before the response reaches the
//! application. Responses also remember the method and URL of the request
//! that produced them, the long-running operation helpers use these to decide
//! how to poll.
//!
//! # Examples
//!
//! Creating a response for mocks
//!
//! ```
//! # use arm_gax::response::{Parts, Response};
//! let response = Response::from_parts(
//!     Parts::new()
//!         .set_status(202)
//!         .set_method(http::Method::DELETE)
//!         .set_url("https://management.example.com/widgets/w1")
//!         .set_header("location", "https://management.example.com/operations/op1"),
//!     bytes::Bytes::new(),
//! );
//! assert_eq!(response.status(), http::StatusCode::ACCEPTED);
//! ```

use crate::error::Error;
use crate::error::detail::ErrorDetail;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};

/// Represents a response from a Resource Manager service.
#[derive(Clone, Debug)]
pub struct Response {
    parts: Parts,
    body: Bytes,
}

impl Response {
    /// Creates a response from its parts and body.
    pub fn from_parts(parts: Parts, body: Bytes) -> Self {
        Self { parts, body }
    }

    /// Returns the HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.parts.status
    }

    /// Returns the headers associated with this response.
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Returns the method of the request that produced this response.
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Returns the URL of the request that produced this response.
    pub fn url(&self) -> &str {
        &self.parts.url
    }

    /// Returns the buffered body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consumes the response returning the parts and body.
    pub fn into_parts(self) -> (Parts, Bytes) {
        (self.parts, self.body)
    }

    /// Consumes the response returning only its body.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Converts an unsuccessful response into the corresponding error.
    ///
    /// If the body contains the service error envelope the result is a
    /// service error, otherwise it is a HTTP error with the raw payload.
    pub fn to_error(&self) -> Error {
        let status_code = self.parts.status.as_u16();
        match ErrorDetail::try_from(&self.body) {
            Ok(detail) => Error::service_with_http_metadata(
                detail,
                Some(status_code),
                Some(self.parts.headers.clone()),
            ),
            Err(_) => Error::http(status_code, self.parts.headers.clone(), self.body.clone()),
        }
    }
}

/// Component parts of a response.
///
/// The response parts, other than the body, consist of the status code, the
/// headers, and a description of the request that produced the response.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Parts {
    /// The HTTP status code.
    pub status: StatusCode,

    /// The HTTP headers.
    pub headers: HeaderMap,

    /// The method of the originating request.
    pub method: Method,

    /// The URL of the originating request.
    pub url: String,
}

impl Parts {
    /// Create a new instance, as a `200 OK` to a `GET` request.
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            method: Method::GET,
            url: String::new(),
        }
    }

    /// Set the status code.
    ///
    /// Invalid status codes (outside `100..=999`) are ignored.
    pub fn set_status(mut self, v: u16) -> Self {
        if let Ok(status) = StatusCode::from_u16(v) {
            self.status = status;
        }
        self
    }

    /// Set all the headers.
    pub fn set_headers<V>(mut self, v: V) -> Self
    where
        V: Into<HeaderMap>,
    {
        self.headers = v.into();
        self
    }

    /// Add a single header.
    ///
    /// Invalid header names or values are ignored.
    pub fn set_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Set the method of the originating request.
    pub fn set_method(mut self, v: Method) -> Self {
        self.method = v;
        self
    }

    /// Set the URL of the originating request.
    pub fn set_url<T: Into<String>>(mut self, v: T) -> Self {
        self.url = v.into();
        self
    }
}

impl Default for Parts {
    fn default() -> Self {
        Self::new()
    }
}

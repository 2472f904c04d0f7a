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

//! The request pipeline.
//!
//! A pipeline sends a [Request] and returns the [Response], or an error if no
//! response was received. Pipelines are responsible for authentication,
//! retries, and telemetry. They must be safe for concurrent use, as a single
//! pipeline is typically shared by many clients and pollers.
//!
//! Pipelines return every response, including unsuccessful ones. The caller
//! decides how to interpret the status code.
//!
//! # Example
//! ```
//! # use arm_gax::pipeline::{Pipeline, SharedPipeline};
//! # use arm_gax::request::Request;
//! # use arm_gax::response::{Parts, Response};
//! # use arm_gax::Result;
//! #[derive(Debug)]
//! struct AlwaysNoContent;
//! impl Pipeline for AlwaysNoContent {
//!     async fn send(&self, request: Request) -> Result<Response> {
//!         let parts = Parts::new()
//!             .set_status(204)
//!             .set_method(request.method().clone())
//!             .set_url(request.url());
//!         Ok(Response::from_parts(parts, bytes::Bytes::new()))
//!     }
//! }
//! let pipeline = SharedPipeline::from(AlwaysNoContent);
//! # tokio_test::block_on(async {
//! let response = pipeline.send(Request::get("https://management.example.com/w1")).await?;
//! assert_eq!(response.status(), http::StatusCode::NO_CONTENT);
//! # arm_gax::Result::<()>::Ok(()) });
//! ```

use crate::Result;
use crate::request::Request;
use crate::response::Response;
use std::sync::Arc;

/// Sends requests to a Resource Manager service.
///
/// Implement this trait to customize how requests are sent, or to mock the
/// service in tests.
pub trait Pipeline: std::fmt::Debug {
    /// Sends the request and returns the (buffered) response.
    ///
    /// Returns an error only if no response could be obtained, for example,
    /// because the connection failed or the request timed out.
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

/// A shared, dyn-compatible, handle to a [Pipeline].
///
/// Cloning this type is cheap, all clones refer to the same pipeline.
#[derive(Clone, Debug)]
pub struct SharedPipeline {
    inner: Arc<dyn dynamic::Pipeline>,
}

impl SharedPipeline {
    /// Sends a request using the wrapped pipeline.
    pub async fn send(&self, request: Request) -> Result<Response> {
        self.inner.send(request).await
    }
}

impl<T> From<T> for SharedPipeline
where
    T: Pipeline + Send + Sync + 'static,
{
    fn from(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }
}

pub mod dynamic {
    use super::{Request, Response, Result};

    /// A dyn-compatible, crate-private version of `Pipeline`.
    #[async_trait::async_trait]
    pub trait Pipeline: Send + Sync + std::fmt::Debug {
        /// Sends the request and returns the (buffered) response.
        async fn send(&self, request: Request) -> Result<Response>;
    }

    /// All implementations of [crate::pipeline::Pipeline] implement this trait.
    #[async_trait::async_trait]
    impl<T> Pipeline for T
    where
        T: crate::pipeline::Pipeline + Send + Sync,
    {
        async fn send(&self, request: Request) -> Result<Response> {
            T::send(self, request).await
        }
    }
}

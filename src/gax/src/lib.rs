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

//! Resource Manager client helpers.
//!
//! This crate contains the types shared by the Resource Manager client
//! libraries for Rust: the error type, the request and response types, and
//! the [Pipeline][pipeline::Pipeline] trait used to send requests. The
//! long-running operation helpers in `arm-lro` are written against these
//! types, and `arm-gax-internal` provides the default HTTP implementation of
//! the pipeline.

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// This is the result type used by all functions sending requests.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

pub mod error;
pub mod pipeline;
pub mod request;
pub mod response;

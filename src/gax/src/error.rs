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

mod core_error;
pub use core_error::*;

/// Error details returned by Resource Manager services.
///
/// The client libraries distinguish between errors detected while trying to
/// send a request (e.g. cannot open a connection), errors in the protocol used
/// to track long-running operations, and errors returned by the service
/// itself.
///
/// The types in this module represent the detailed information returned by
/// the services, which always use the same JSON envelope:
///
/// ```json
/// { "error": { "code": "ResourceNotFound", "message": "..." } }
/// ```
///
/// # Examples
///
/// ```
/// # use arm_gax::error;
/// use error::Error;
/// fn handle_error(e: Error) {
///     if let Some(detail) = e.detail() {
///         println!("the service reported {} ({})", detail.code, detail.message)
///     }
/// }
/// ```
pub mod detail;

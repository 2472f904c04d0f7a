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

//! Types and functions to track long-running operations in Resource Manager
//! services.
//!
//! Many Resource Manager requests, such as creating a virtual machine or
//! deleting a database, start a long-running operation (LRO). The initial
//! response indicates the operation started, applications must poll the
//! service to find out when the operation completes and what its result is.
//!
//! Services use one of several conventions to report progress. A status
//! monitor URL in the `Azure-AsyncOperation` or `Operation-Location` headers,
//! a URL in the `Location` header that returns `202 Accepted` until the
//! operation completes, or a `provisioningState` in the resource itself. The
//! [Poller] detects the convention from the initial response and polls
//! accordingly.
//!
//! Pollers can be saved as a [resume token][Poller::resume_token] and
//! restored, possibly in a different process, with
//! [Poller::from_resume_token].

mod detector;
pub mod headers;
mod observer;
mod operation;
mod options;
mod poller;
mod resume_token;
mod status;

pub use observer::{NoopObserver, PollEvent, PollObserver, TracingObserver};
pub use operation::{FinalStateVia, OperationKind};
pub use options::{DEFAULT_FREQUENCY, MIN_FREQUENCY, PollUntilDoneOptions, PollerOptions};
pub use poller::Poller;
pub use resume_token::ResumeTokenError;
pub use status::{OperationStatus, TerminalStates};

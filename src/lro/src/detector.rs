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

//! Chooses the long-running operation convention from the initial response.

use crate::headers::is_polling_code;
use crate::operation::{
    AsyncOperation, BodyOperation, LocationOperation, NoOpOperation, Operation, Strategy,
};
use crate::options::Config;
use gax::Result;
use gax::error::Error;
use gax::response::Response;
use http::{Method, StatusCode};

/// Returns the operation described by `response`.
///
/// The conventions are tried in order of precedence: the status monitor
/// headers, then the `Location` header, then the resource body. An operation
/// that matches none of them completed with the initial response.
pub(crate) fn detect(response: &Response, config: &Config) -> Result<Operation> {
    if !is_polling_code(response.status()) {
        return Err(response.to_error());
    }
    if AsyncOperation::applicable(response, config) {
        return AsyncOperation::new(response, config).map(Operation::AsyncOperation);
    }
    if LocationOperation::applicable(response, config) {
        return LocationOperation::new(response, config).map(Operation::Location);
    }
    if BodyOperation::applicable(response, config) {
        return BodyOperation::new(response, config).map(Operation::Body);
    }
    if response.status() == StatusCode::ACCEPTED
        && matches!(*response.method(), Method::DELETE | Method::POST)
    {
        return Err(Error::protocol(format!(
            "{} {} returned 202 Accepted without any polling headers",
            response.method(),
            response.url()
        )));
    }
    NoOpOperation::new(response, config).map(Operation::NoOp)
}

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

//! The conventions used by services to report the progress of long-running
//! operations.
//!
//! Each convention is represented by a type implementing [Strategy]. The
//! [Operation] enum holds exactly one of them, and never changes variant.

use crate::options::Config;
use crate::status::{OperationStatus, TerminalStates};
use bytes::Bytes;
use gax::Result;
use gax::response::Response;
use serde::{Deserialize, Serialize};

mod async_op;
mod body;
mod location;
mod noop;

pub(crate) use async_op::AsyncOperation;
pub(crate) use body::BodyOperation;
pub(crate) use location::LocationOperation;
pub(crate) use noop::NoOpOperation;

/// Identifies the convention used by a long-running operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Poll a status monitor URL returned in the `Azure-AsyncOperation` or
    /// `Operation-Location` headers.
    AsyncOperation,
    /// Poll the URL returned in the `Location` header until it stops
    /// returning `202 Accepted`.
    Location,
    /// Poll the resource until its provisioning state is terminal.
    Body,
    /// The operation completed with the initial response.
    NoOp,
}

impl OperationKind {
    /// The name used in resume tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AsyncOperation => "async",
            Self::Location => "location",
            Self::Body => "body",
            Self::NoOp => "noop",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "async" => Some(Self::AsyncOperation),
            "location" => Some(Self::Location),
            "body" => Some(Self::Body),
            "noop" => Some(Self::NoOp),
            _ => None,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where to find the final result of an operation with a status monitor.
///
/// Services document this value for each operation, typically as
/// `final-state-via` in their API descriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalStateVia {
    /// The final status monitor response contains the result.
    AzureAsyncOperation,
    /// Fetch the result from the `Location` header in the initial response.
    Location,
    /// Fetch the result from the URL of the request that started the
    /// operation.
    #[serde(rename = "original-uri")]
    OriginalUri,
    /// Fetch the result from the `Operation-Location` header in the initial
    /// response.
    OperationLocation,
}

/// The fields shared by all conventions.
///
/// These are persisted in resume tokens.
#[serde_with::serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct State {
    pub poll_url: String,
    pub status: OperationStatus,
    pub status_code: u16,
    #[serde_as(as = "serde_with::base64::Base64")]
    #[serde(default)]
    pub body: Bytes,
    pub terminal_states: TerminalStates,
}

impl State {
    pub fn new(
        poll_url: String,
        status: OperationStatus,
        response: &Response,
        terminal_states: TerminalStates,
    ) -> Self {
        Self {
            poll_url,
            status,
            status_code: response.status().as_u16(),
            body: response.body().clone(),
            terminal_states,
        }
    }

    /// The state after receiving `response`.
    pub fn next(&self, poll_url: String, status: OperationStatus, response: &Response) -> Self {
        Self::new(poll_url, status, response, self.terminal_states.clone())
    }

    pub fn classify(&self, value: &str) -> OperationStatus {
        self.terminal_states.classify(value)
    }
}

/// The capabilities of each long-running operation convention.
pub(crate) trait Strategy: Sized {
    /// Returns true if the initial response uses this convention.
    fn applicable(response: &Response, config: &Config) -> bool;

    /// Extracts the initial state from the response that started the
    /// operation.
    fn new(response: &Response, config: &Config) -> Result<Self>;

    fn state(&self) -> &State;

    fn state_mut(&mut self) -> &mut State;

    /// Computes the state after a successful (2xx) poll response.
    ///
    /// Implementations must not modify `self`, an error leaves the operation
    /// unchanged.
    fn next_state(&self, response: &Response) -> Result<State>;

    /// The URL to fetch the final result, `None` if the result is the last
    /// response body.
    fn final_url(&self) -> Option<&str>;
}

/// A long-running operation, using one of the known conventions.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Operation {
    AsyncOperation(AsyncOperation),
    Location(LocationOperation),
    Body(BodyOperation),
    NoOp(NoOpOperation),
}

macro_rules! dispatch {
    ($self:expr, $op:ident => $body:expr) => {
        match $self {
            Operation::AsyncOperation($op) => $body,
            Operation::Location($op) => $body,
            Operation::Body($op) => $body,
            Operation::NoOp($op) => $body,
        }
    };
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::AsyncOperation(_) => OperationKind::AsyncOperation,
            Self::Location(_) => OperationKind::Location,
            Self::Body(_) => OperationKind::Body,
            Self::NoOp(_) => OperationKind::NoOp,
        }
    }

    pub fn state(&self) -> &State {
        dispatch!(self, op => op.state())
    }

    pub fn state_mut(&mut self) -> &mut State {
        dispatch!(self, op => op.state_mut())
    }

    pub fn next_state(&self, response: &Response) -> Result<State> {
        dispatch!(self, op => op.next_state(response))
    }

    pub fn final_url(&self) -> Option<&str> {
        dispatch!(self, op => op.final_url())
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        dispatch!(self, op => serde_json::to_value(op))
    }

    pub fn from_value(kind: OperationKind, value: serde_json::Value) -> serde_json::Result<Self> {
        match kind {
            OperationKind::AsyncOperation => serde_json::from_value(value).map(Self::AsyncOperation),
            OperationKind::Location => serde_json::from_value(value).map(Self::Location),
            OperationKind::Body => serde_json::from_value(value).map(Self::Body),
            OperationKind::NoOp => serde_json::from_value(value).map(Self::NoOp),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use gax::response::Parts;
    use http::Method;
    use test_case::test_case;

    pub(crate) const ORIGINAL_URL: &str = "https://management.example.com/widgets/w1";

    pub(crate) fn response(
        method: Method,
        status: u16,
        headers: &[(&str, &str)],
        body: &'static str,
    ) -> Response {
        let parts = headers.iter().fold(
            Parts::new()
                .set_status(status)
                .set_method(method)
                .set_url(ORIGINAL_URL),
            |p, (k, v)| p.set_header(k, v),
        );
        Response::from_parts(parts, Bytes::from_static(body.as_bytes()))
    }

    #[test_case(OperationKind::AsyncOperation, "async")]
    #[test_case(OperationKind::Location, "location")]
    #[test_case(OperationKind::Body, "body")]
    #[test_case(OperationKind::NoOp, "noop")]
    fn kind_names(kind: OperationKind, name: &str) {
        assert_eq!(kind.as_str(), name);
        assert_eq!(kind.to_string(), name);
        assert_eq!(OperationKind::from_name(name), Some(kind));
    }

    #[test]
    fn kind_unknown() {
        assert_eq!(OperationKind::from_name("dummy"), None);
        assert_eq!(OperationKind::from_name("Async"), None);
    }

    #[test_case(FinalStateVia::AzureAsyncOperation, "azure-async-operation")]
    #[test_case(FinalStateVia::Location, "location")]
    #[test_case(FinalStateVia::OriginalUri, "original-uri")]
    #[test_case(FinalStateVia::OperationLocation, "operation-location")]
    fn final_state_via_names(via: FinalStateVia, name: &str) -> anyhow::Result<()> {
        assert_eq!(serde_json::to_value(via)?, serde_json::json!(name));
        Ok(())
    }

    #[test]
    fn state_serde() -> anyhow::Result<()> {
        let initial = response(Method::PUT, 201, &[], r#"{"size":3}"#);
        let state = State::new(
            ORIGINAL_URL.to_string(),
            OperationStatus::InProgress,
            &initial,
            TerminalStates::default(),
        );
        let value = serde_json::to_value(&state)?;
        assert_eq!(value["pollUrl"], ORIGINAL_URL);
        assert_eq!(value["status"], "InProgress");
        assert_eq!(value["statusCode"], 201);
        assert_eq!(value["body"], "eyJzaXplIjozfQ==");
        let got = serde_json::from_value::<State>(value)?;
        assert_eq!(got, state);
        Ok(())
    }

    #[test]
    fn state_next_keeps_terminal_states() {
        let states = TerminalStates::default().with_succeeded(["Completed"]);
        let initial = response(Method::PUT, 201, &[], "");
        let state = State::new(
            ORIGINAL_URL.to_string(),
            OperationStatus::InProgress,
            &initial,
            states.clone(),
        );
        let poll = response(Method::GET, 200, &[], "{}");
        let next = state.next("https://example.com/next".to_string(), OperationStatus::Succeeded, &poll);
        assert_eq!(next.terminal_states, states);
        assert_eq!(next.poll_url, "https://example.com/next");
        assert_eq!(next.status_code, 200);
        assert_eq!(next.body, Bytes::from_static(b"{}"));
        assert_eq!(next.classify("completed"), OperationStatus::Succeeded);
    }
}

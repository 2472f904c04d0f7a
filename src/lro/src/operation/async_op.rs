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

use super::{FinalStateVia, State, Strategy};
use crate::headers::{AZURE_ASYNC_OPERATION, LOCATION, OPERATION_LOCATION, polling_url};
use crate::options::Config;
use crate::status::{OperationStatus, monitor_status, provisioning_state};
use gax::Result;
use gax::error::Error;
use gax::response::Response;
use serde::{Deserialize, Serialize};

/// An operation reporting its progress via a status monitor.
///
/// The monitor URL is returned in the `Azure-AsyncOperation` (or
/// `Operation-Location`) header. The monitor returns `{"status": ...}` until
/// the operation completes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AsyncOperation {
    #[serde(flatten)]
    state: State,
    original_url: String,
    method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    final_state_via: Option<FinalStateVia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operation_location_url: Option<String>,
}

impl Strategy for AsyncOperation {
    fn applicable(response: &Response, _config: &Config) -> bool {
        let headers = response.headers();
        headers.contains_key(AZURE_ASYNC_OPERATION) || headers.contains_key(OPERATION_LOCATION)
    }

    fn new(response: &Response, config: &Config) -> Result<Self> {
        let headers = response.headers();
        let operation_location_url = polling_url(headers, &OPERATION_LOCATION)?;
        let poll_url = match polling_url(headers, &AZURE_ASYNC_OPERATION)? {
            Some(url) => url,
            None => operation_location_url.clone().ok_or_else(|| {
                Error::protocol("missing status monitor URL in long-running operation response")
            })?,
        };
        let location_url = polling_url(headers, &LOCATION)?;
        // The initial body is the resource, which may not be JSON.
        let status = provisioning_state(response.body())
            .ok()
            .flatten()
            .map(|s| config.terminal_states.classify(&s))
            .unwrap_or(OperationStatus::InProgress);
        Ok(Self {
            state: State::new(poll_url, status, response, config.terminal_states.clone()),
            original_url: response.url().to_string(),
            method: response.method().as_str().to_string(),
            final_state_via: config.final_state_via,
            location_url,
            operation_location_url,
        })
    }

    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn next_state(&self, response: &Response) -> Result<State> {
        let status = monitor_status(response.body())?
            .map(|s| self.state.classify(&s))
            .unwrap_or(OperationStatus::InProgress);
        Ok(self
            .state
            .next(self.state.poll_url.clone(), status, response))
    }

    fn final_url(&self) -> Option<&str> {
        match self.final_state_via {
            Some(FinalStateVia::AzureAsyncOperation) => None,
            Some(FinalStateVia::OriginalUri) => Some(&self.original_url),
            Some(FinalStateVia::Location) => self.location_url.as_deref(),
            Some(FinalStateVia::OperationLocation) => self.operation_location_url.as_deref(),
            None => match self.method.as_str() {
                "PUT" | "PATCH" => Some(&self.original_url),
                "POST" => self.location_url.as_deref(),
                _ => None,
            },
        }
    }
}

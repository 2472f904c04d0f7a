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

use super::{State, Strategy};
use crate::headers::validate_url;
use crate::options::Config;
use crate::status::{OperationStatus, provisioning_state};
use gax::Result;
use gax::error::Error;
use gax::response::Response;
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};

/// An operation polled by reading the resource until its
/// `properties.provisioningState` is terminal.
///
/// Only `PUT` and `PATCH` requests use this convention, the resource they
/// create or update is available at the original URL.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct BodyOperation {
    #[serde(flatten)]
    state: State,
}

impl Strategy for BodyOperation {
    fn applicable(response: &Response, config: &Config) -> bool {
        if !matches!(*response.method(), Method::PUT | Method::PATCH) {
            return false;
        }
        if provisioning_state(response.body()).ok().flatten().is_some() {
            return true;
        }
        match response.status() {
            StatusCode::CREATED | StatusCode::ACCEPTED => true,
            StatusCode::OK => config.force_body_polling,
            _ => false,
        }
    }

    fn new(response: &Response, config: &Config) -> Result<Self> {
        let poll_url = validate_url(response.url())?;
        let status = match provisioning_state(response.body()).ok().flatten() {
            Some(s) => config.terminal_states.classify(&s),
            None if matches!(
                response.status(),
                StatusCode::CREATED | StatusCode::ACCEPTED
            ) =>
            {
                OperationStatus::InProgress
            }
            None if response.status() == StatusCode::OK && config.force_body_polling => {
                OperationStatus::InProgress
            }
            None => OperationStatus::Succeeded,
        };
        Ok(Self {
            state: State::new(poll_url, status, response, config.terminal_states.clone()),
        })
    }

    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn next_state(&self, response: &Response) -> Result<State> {
        let poll_url = self.state.poll_url.clone();
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(self
                .state
                .next(poll_url, OperationStatus::Succeeded, response));
        }
        if response.body().is_empty() {
            return Err(Error::deser(format!(
                "empty response body polling resource {poll_url}"
            )));
        }
        let status = provisioning_state(response.body())?
            .map(|s| self.state.classify(&s))
            .unwrap_or(OperationStatus::Succeeded);
        Ok(self.state.next(poll_url, status, response))
    }

    fn final_url(&self) -> Option<&str> {
        None
    }
}

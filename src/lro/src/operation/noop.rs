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
use crate::options::Config;
use crate::status::OperationStatus;
use gax::Result;
use gax::response::Response;
use serde::{Deserialize, Serialize};

/// An operation that completed with the initial response.
///
/// Polling never sends a request, the result is the initial body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct NoOpOperation {
    #[serde(flatten)]
    state: State,
}

impl Strategy for NoOpOperation {
    fn applicable(_response: &Response, _config: &Config) -> bool {
        true
    }

    fn new(response: &Response, config: &Config) -> Result<Self> {
        Ok(Self {
            state: State::new(
                response.url().to_string(),
                OperationStatus::Succeeded,
                response,
                config.terminal_states.clone(),
            ),
        })
    }

    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn next_state(&self, _response: &Response) -> Result<State> {
        Ok(self.state.clone())
    }

    fn final_url(&self) -> Option<&str> {
        None
    }
}

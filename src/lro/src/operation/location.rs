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
use crate::headers::{LOCATION, polling_url};
use crate::options::Config;
use crate::status::{OperationStatus, provisioning_state};
use gax::Result;
use gax::error::Error;
use gax::response::Response;
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// An operation polled via the URL in the `Location` header.
///
/// The URL returns `202 Accepted` while the operation is running, and any
/// other success code once it completes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct LocationOperation {
    #[serde(flatten)]
    state: State,
}

impl Strategy for LocationOperation {
    fn applicable(response: &Response, _config: &Config) -> bool {
        response.headers().contains_key(LOCATION)
    }

    fn new(response: &Response, config: &Config) -> Result<Self> {
        let poll_url = polling_url(response.headers(), &LOCATION)?.ok_or_else(|| {
            Error::protocol("missing Location header in long-running operation response")
        })?;
        let status = if response.status() == StatusCode::ACCEPTED {
            OperationStatus::InProgress
        } else {
            provisioning_state(response.body())
                .ok()
                .flatten()
                .map(|s| config.terminal_states.classify(&s))
                .unwrap_or(OperationStatus::Succeeded)
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
        if response.status() == StatusCode::ACCEPTED {
            let poll_url = polling_url(response.headers(), &LOCATION)?
                .unwrap_or_else(|| self.state.poll_url.clone());
            return Ok(self
                .state
                .next(poll_url, OperationStatus::InProgress, response));
        }
        let status = provisioning_state(response.body())?
            .map(|s| self.state.classify(&s))
            .unwrap_or(OperationStatus::Succeeded);
        Ok(self
            .state
            .next(self.state.poll_url.clone(), status, response))
    }

    fn final_url(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::response;
    use super::*;
    use http::Method;
    use test_case::test_case;

    const LOCATION_URL: &str = "https://management.example.com/operations/op1";

    fn initial() -> anyhow::Result<LocationOperation> {
        let initial = response(Method::DELETE, 202, &[("location", LOCATION_URL)], "");
        Ok(LocationOperation::new(&initial, &Config::default())?)
    }

    #[test]
    fn applicable() {
        let initial = response(Method::POST, 202, &[("Location", LOCATION_URL)], "");
        assert!(LocationOperation::applicable(&initial, &Config::default()));
        let initial = response(Method::POST, 202, &[], "");
        assert!(!LocationOperation::applicable(&initial, &Config::default()));
    }

    #[test]
    fn new() -> anyhow::Result<()> {
        let op = initial()?;
        assert_eq!(op.state().poll_url, LOCATION_URL);
        assert_eq!(op.state().status, OperationStatus::InProgress);
        assert_eq!(op.final_url(), None);
        Ok(())
    }

    #[test_case(200, "", OperationStatus::Succeeded)]
    #[test_case(201, r#"{"properties": {"provisioningState": "Creating"}}"#, OperationStatus::InProgress)]
    #[test_case(200, r#"{"properties": {"provisioningState": "Failed"}}"#, OperationStatus::Failed)]
    #[test_case(200, "not json", OperationStatus::Succeeded)]
    fn new_not_accepted(code: u16, body: &'static str, want: OperationStatus) -> anyhow::Result<()> {
        let initial = response(Method::PUT, code, &[("location", LOCATION_URL)], body);
        let op = LocationOperation::new(&initial, &Config::default())?;
        assert_eq!(op.state().status, want);
        Ok(())
    }

    #[test]
    fn new_invalid_url() {
        let initial = response(Method::POST, 202, &[("location", "/operations/op1")], "");
        let got = LocationOperation::new(&initial, &Config::default());
        assert!(matches!(&got, Err(e) if e.is_protocol()), "{got:?}");
    }

    #[test]
    fn next_state_accepted() -> anyhow::Result<()> {
        let op = initial()?;
        let poll = response(Method::GET, 202, &[], "");
        let got = op.next_state(&poll)?;
        assert_eq!(got.status, OperationStatus::InProgress);
        assert_eq!(got.poll_url, LOCATION_URL);
        assert_eq!(got.status_code, 202);
        Ok(())
    }

    #[test]
    fn next_state_accepted_new_location() -> anyhow::Result<()> {
        let op = initial()?;
        let next = "https://management.example.com/operations/op1?step=2";
        let poll = response(Method::GET, 202, &[("location", next)], "");
        let got = op.next_state(&poll)?;
        assert_eq!(got.status, OperationStatus::InProgress);
        assert_eq!(got.poll_url, next);
        assert_eq!(op.state().poll_url, LOCATION_URL);
        Ok(())
    }

    #[test_case(200, r#"{"name": "w1"}"#, OperationStatus::Succeeded)]
    #[test_case(204, "", OperationStatus::Succeeded)]
    #[test_case(200, r#"{"properties": {"provisioningState": "Canceled"}}"#, OperationStatus::Canceled)]
    #[test_case(200, r#"{"properties": {"provisioningState": "Failed"}}"#, OperationStatus::Failed)]
    fn next_state_done(code: u16, body: &'static str, want: OperationStatus) -> anyhow::Result<()> {
        let op = initial()?;
        let poll = response(Method::GET, code, &[], body);
        let got = op.next_state(&poll)?;
        assert_eq!(got.status, want);
        assert_eq!(got.status_code, code);
        assert_eq!(got.poll_url, LOCATION_URL);
        Ok(())
    }

    #[test]
    fn next_state_bad_json() -> anyhow::Result<()> {
        let op = initial()?;
        let poll = response(Method::GET, 200, &[], "<html>");
        let got = op.next_state(&poll);
        assert!(matches!(&got, Err(e) if e.is_deserialization()), "{got:?}");
        Ok(())
    }

    #[test]
    fn serde() -> anyhow::Result<()> {
        let op = initial()?;
        let value = serde_json::to_value(&op)?;
        assert_eq!(value["pollUrl"], LOCATION_URL);
        let got = serde_json::from_value::<LocationOperation>(value)?;
        assert_eq!(got, op);
        Ok(())
    }
}

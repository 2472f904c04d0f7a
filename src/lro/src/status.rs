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

//! Operation status and the rules to interpret status strings.

use bytes::Bytes;
use gax::Result;
use gax::error::Error;
use serde::{Deserialize, Serialize};

/// The status of a long-running operation.
///
/// Once an operation reaches a terminal status (`Succeeded`, `Failed`, or
/// `Canceled`) it never changes status again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationStatus {
    /// The operation has not completed.
    InProgress,
    /// The operation completed successfully.
    Succeeded,
    /// The operation completed with an error.
    Failed,
    /// The operation was canceled before completing.
    Canceled,
}

impl OperationStatus {
    /// Returns true if the operation will never change status again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// The name of the status, as used by the services.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InProgress => "InProgress",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Canceled => "Canceled",
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The status strings that indicate an operation is complete.
///
/// Services report the status of an operation as a string. The strings are
/// compared ignoring case. Any string not in these sets, including the empty
/// string, means the operation is still in progress.
///
/// Some services use additional values, for example `Completed` as a synonym
/// for `Succeeded`. Applications can add such synonyms:
///
/// ```
/// # use arm_lro::{OperationStatus, TerminalStates};
/// let states = TerminalStates::default().with_succeeded(["Completed"]);
/// assert_eq!(states.classify("completed"), OperationStatus::Succeeded);
/// assert_eq!(states.classify("Updating"), OperationStatus::InProgress);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalStates {
    succeeded: Vec<String>,
    failed: Vec<String>,
    canceled: Vec<String>,
}

impl Default for TerminalStates {
    fn default() -> Self {
        Self {
            succeeded: vec!["Succeeded".to_string()],
            failed: vec!["Failed".to_string()],
            canceled: vec!["Canceled".to_string(), "Cancelled".to_string()],
        }
    }
}

impl TerminalStates {
    /// Adds values that map to [OperationStatus::Succeeded].
    pub fn with_succeeded<I, V>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.succeeded.extend(v.into_iter().map(Into::into));
        self
    }

    /// Adds values that map to [OperationStatus::Failed].
    pub fn with_failed<I, V>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.failed.extend(v.into_iter().map(Into::into));
        self
    }

    /// Adds values that map to [OperationStatus::Canceled].
    pub fn with_canceled<I, V>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.canceled.extend(v.into_iter().map(Into::into));
        self
    }

    /// Maps a status string reported by the service to an [OperationStatus].
    pub fn classify(&self, value: &str) -> OperationStatus {
        let matches = |set: &[String]| set.iter().any(|s| s.eq_ignore_ascii_case(value));
        if matches(&self.succeeded) {
            OperationStatus::Succeeded
        } else if matches(&self.failed) {
            OperationStatus::Failed
        } else if matches(&self.canceled) {
            OperationStatus::Canceled
        } else {
            OperationStatus::InProgress
        }
    }
}

/// Returns the `properties.provisioningState` field of a resource.
///
/// An empty body has no provisioning state. A body that is not JSON is an
/// error.
pub(crate) fn provisioning_state(body: &Bytes) -> Result<Option<String>> {
    let value = parse(body)?;
    Ok(value
        .as_ref()
        .and_then(|v| v.get("properties"))
        .and_then(|p| p.get("provisioningState"))
        .and_then(|s| s.as_str())
        .map(str::to_string))
}

/// Returns the `status` field of a status monitor response.
pub(crate) fn monitor_status(body: &Bytes) -> Result<Option<String>> {
    let value = parse(body)?;
    Ok(value
        .as_ref()
        .and_then(|v| v.get("status"))
        .and_then(|s| s.as_str())
        .map(str::to_string))
}

fn parse(body: &Bytes) -> Result<Option<serde_json::Value>> {
    if body.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(body).map(Some).map_err(Error::deser)
}

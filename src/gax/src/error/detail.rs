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

use super::Error;
use serde::{Deserialize, Serialize};

/// The error details returned by Resource Manager services.
///
/// Services report errors using a JSON envelope with a single `error` field.
/// The `code` is a short, stable, string identifier (e.g. `Conflict` or
/// `ResourceGroupNotFound`). The `message` is intended for humans and may
/// change without notice.
///
/// Long-running operations that end in the `Failed` or `Canceled` states
/// report their errors using the same format, as part of the payload returned
/// by the status monitor.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct ErrorDetail {
    /// The error code.
    pub code: String,

    /// A developer-facing error message.
    pub message: String,

    /// The target of the error, typically the name of a field or resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Additional errors, typically one per invalid field.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,
}

impl ErrorDetail {
    /// Sets the value of [code][ErrorDetail::code].
    pub fn set_code<T: Into<String>>(mut self, v: T) -> Self {
        self.code = v.into();
        self
    }

    /// Sets the value of [message][ErrorDetail::message].
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }

    /// Sets the value of [target][ErrorDetail::target].
    pub fn set_target<T: Into<String>>(mut self, v: T) -> Self {
        self.target = Some(v.into());
        self
    }

    /// Sets the value of [details][ErrorDetail::details].
    pub fn set_details<T, I>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = I>,
        I: Into<ErrorDetail>,
    {
        self.details = v.into_iter().map(|i| i.into()).collect();
        self
    }
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorDetail,
}

impl TryFrom<&bytes::Bytes> for ErrorDetail {
    type Error = Error;

    fn try_from(value: &bytes::Bytes) -> Result<Self, Self::Error> {
        serde_json::from_slice::<ErrorWrapper>(value)
            .map(|w| w.error)
            .map_err(Error::deser)
    }
}

impl TryFrom<&serde_json::Value> for ErrorDetail {
    type Error = Error;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        let error = value
            .get("error")
            .ok_or_else(|| Error::deser("missing `error` field"))?;
        serde_json::from_value::<ErrorDetail>(error.clone()).map_err(Error::deser)
    }
}

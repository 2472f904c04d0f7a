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

//! Header names and helpers to interpret long-running operation responses.

use gax::Result;
use gax::error::Error;
use http::{HeaderMap, HeaderName, StatusCode};
use std::time::Duration;

/// The header carrying the status monitor URL.
pub const AZURE_ASYNC_OPERATION: HeaderName = HeaderName::from_static("azure-asyncoperation");

/// An alternative header carrying the status monitor URL.
pub const OPERATION_LOCATION: HeaderName = HeaderName::from_static("operation-location");

/// The header carrying the URL polled by the location convention.
pub const LOCATION: HeaderName = http::header::LOCATION;

/// The header carrying the recommended delay, in seconds, before the next poll.
pub const RETRY_AFTER: HeaderName = http::header::RETRY_AFTER;

/// Returns the delay requested via `Retry-After`, if any.
///
/// Only delays expressed as a positive number of seconds are recognized.
pub(crate) fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|s| *s > 0)
        .map(Duration::from_secs)
}

/// Returns the polling URL in `name`, if the header is present.
///
/// The URL must be absolute, using `http` or `https`.
pub(crate) fn polling_url(headers: &HeaderMap, name: &HeaderName) -> Result<Option<String>> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|e| Error::protocol(format!("the {name} header is not a valid string: {e}")))?;
    validate_url(value).map(Some)
}

/// Verifies `value` is an absolute `http` or `https` URL.
pub(crate) fn validate_url(value: &str) -> Result<String> {
    match url::Url::parse(value) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => Ok(value.to_string()),
        Ok(_) => Err(Error::protocol(format!("invalid polling URL `{value}`"))),
        Err(e) => Err(Error::protocol(format!("invalid polling URL `{value}`: {e}"))),
    }
}

/// The status codes used to report progress or completion.
pub(crate) fn is_polling_code(code: StatusCode) -> bool {
    matches!(
        code,
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED | StatusCode::NO_CONTENT
    )
}

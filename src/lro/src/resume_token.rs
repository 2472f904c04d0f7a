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

//! Encodes and decodes resume tokens.
//!
//! A resume token is a JSON object with the state of the operation, plus a
//! `type` field identifying the result type and convention, and a `version`
//! field. Tokens are only valid for pollers with the same result type.

use crate::operation::{Operation, OperationKind};
use gax::Result;
use gax::error::Error;
use serde_json::{Map, Value};

const TYPE: &str = "type";
const VERSION: &str = "version";
const CURRENT_VERSION: u64 = 1;

/// The reasons a resume token is rejected.
///
/// Returned as the [source][std::error::Error::source] of errors where
/// [is_resume_token][gax::error::Error::is_resume_token] is true.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ResumeTokenError {
    #[error("the token is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("the token is not a JSON object")]
    NotAnObject,
    #[error("missing or invalid `type` field")]
    MissingType,
    #[error("invalid token type `{0}`, expected `<result type>;<kind>`")]
    InvalidType(String),
    #[error("the token is for `{got}` results, the poller expects `{want}`")]
    TypeMismatch { got: String, want: String },
    #[error("unknown operation kind `{0}`")]
    UnknownKind(String),
    #[error("unsupported token version {0:?}")]
    UnsupportedVersion(Option<u64>),
    #[error("invalid operation state: {0}")]
    InvalidState(#[source] serde_json::Error),
}

/// The default name of the result type `T` in resume tokens.
///
/// This is the full path of the type, as reported by the compiler.
/// Applications that need tokens to survive a compiler upgrade, or a type
/// moving between modules, should set an explicit name with
/// [PollerOptions::with_result_type][crate::PollerOptions::with_result_type].
pub(crate) fn type_name<T>() -> String {
    std::any::type_name::<T>().to_string()
}

/// Serializes `operation` as a token for pollers returning `result_type`.
pub(crate) fn encode(result_type: &str, operation: &Operation) -> Result<String> {
    let value = operation.to_value().map_err(Error::ser)?;
    let Value::Object(mut map) = value else {
        return Err(Error::ser("operation state is not a JSON object"));
    };
    map.insert(
        TYPE.to_string(),
        Value::String(format!("{};{}", result_type, operation.kind().as_str())),
    );
    map.insert(VERSION.to_string(), Value::from(CURRENT_VERSION));
    serde_json::to_string(&map).map_err(Error::ser)
}

/// Restores an operation from a token created for pollers returning
/// `result_type`.
pub(crate) fn decode(result_type: &str, token: &str) -> Result<Operation> {
    parse(result_type, token).map_err(Error::resume_token)
}

fn parse(result_type: &str, token: &str) -> std::result::Result<Operation, ResumeTokenError> {
    let value =
        serde_json::from_str::<Value>(token).map_err(ResumeTokenError::InvalidJson)?;
    let Value::Object(mut map) = value else {
        return Err(ResumeTokenError::NotAnObject);
    };
    let kind = kind(result_type, &map)?;
    match map.get(VERSION).and_then(Value::as_u64) {
        Some(CURRENT_VERSION) => {}
        v => return Err(ResumeTokenError::UnsupportedVersion(v)),
    }
    map.remove(TYPE);
    map.remove(VERSION);
    Operation::from_value(kind, Value::Object(map)).map_err(ResumeTokenError::InvalidState)
}

fn kind(
    result_type: &str,
    map: &Map<String, Value>,
) -> std::result::Result<OperationKind, ResumeTokenError> {
    let token_type = map
        .get(TYPE)
        .and_then(Value::as_str)
        .ok_or(ResumeTokenError::MissingType)?;
    let (name, kind) = token_type
        .rsplit_once(';')
        .ok_or_else(|| ResumeTokenError::InvalidType(token_type.to_string()))?;
    if name != result_type {
        return Err(ResumeTokenError::TypeMismatch {
            got: name.to_string(),
            want: result_type.to_string(),
        });
    }
    OperationKind::from_name(kind).ok_or_else(|| ResumeTokenError::UnknownKind(kind.to_string()))
}

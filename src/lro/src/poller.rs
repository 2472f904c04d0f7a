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

use crate::detector::detect;
use crate::headers::retry_after;
use crate::observer::{PollEvent, PollObserver};
use crate::operation::{Operation, OperationKind};
use crate::options::{PollUntilDoneOptions, PollerOptions};
use crate::resume_token;
use crate::status::OperationStatus;
use bytes::Bytes;
use gax::Result;
use gax::error::Error;
use gax::error::detail::ErrorDetail;
use gax::pipeline::SharedPipeline;
use gax::request::Request;
use gax::response::{Parts, Response};
use http::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Tracks a long-running operation until it completes.
///
/// Create a poller from the response that started the operation, or from a
/// resume token saved by a previous poller. Then call
/// [poll_until_done][Poller::poll_until_done], or call [poll][Poller::poll]
/// until [done][Poller::done] returns `true` and get the
/// [result][Poller::result].
///
/// Pollers are not synchronized. All the methods that send requests take
/// `&mut self`, applications that share a poller across tasks must wrap it in
/// a mutex.
///
/// # Parameters
/// * `T` - the type of the final result. Use [serde_json::Value] for
///   operations without a meaningful result.
///
/// # Example
/// ```no_run
/// # use gax::pipeline::SharedPipeline;
/// # use gax::request::Request;
/// # use arm_lro::{Poller, PollerOptions, PollUntilDoneOptions};
/// # use tokio_util::sync::CancellationToken;
/// # async fn sample(pipeline: SharedPipeline) -> gax::Result<()> {
/// let request = Request::new(http::Method::PUT, "https://management.example.com/widgets/w1")
///     .set_body(r#"{"properties": {"size": 3}}"#);
/// let response = pipeline.send(request).await?;
/// let mut poller = Poller::<serde_json::Value>::new(
///     pipeline.clone(),
///     response,
///     PollerOptions::default(),
/// )?;
/// let widget = poller
///     .poll_until_done(&CancellationToken::new(), PollUntilDoneOptions::default())
///     .await?;
/// println!("{widget:?}");
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct Poller<T> {
    operation: Operation,
    pipeline: SharedPipeline,
    observer: Arc<dyn PollObserver>,
    response: Option<T>,
    result_type: String,
    last: Option<Response>,
}

impl<T> Poller<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Creates a poller from the response that started the operation.
    ///
    /// Fails if the response is an error, or if it does not follow any of the
    /// long-running operation conventions.
    pub fn new<P>(pipeline: P, response: Response, options: PollerOptions<T>) -> Result<Self>
    where
        P: Into<SharedPipeline>,
    {
        let operation = detect(&response, &options.config)?;
        let poller = Self {
            operation,
            pipeline: pipeline.into(),
            observer: options.observer,
            response: options.response,
            result_type: options
                .result_type
                .unwrap_or_else(resume_token::type_name::<T>),
            last: Some(response),
        };
        poller.observer.on_event(&PollEvent::Created {
            kind: poller.kind(),
            status: poller.status(),
            poll_url: poller.operation.state().poll_url.clone(),
        });
        poller.notify_terminal();
        Ok(poller)
    }

    /// Creates a poller from a token returned by [resume_token][Poller::resume_token].
    ///
    /// The token must have been created by a poller with the same result
    /// type, or the same name set via
    /// [with_result_type][PollerOptions::with_result_type]. Only the response
    /// template, the result type name, and the observer are used from
    /// `options`, the remaining settings are restored from the token.
    pub fn from_resume_token<P>(pipeline: P, token: &str, options: PollerOptions<T>) -> Result<Self>
    where
        P: Into<SharedPipeline>,
    {
        let result_type = options
            .result_type
            .unwrap_or_else(resume_token::type_name::<T>);
        let operation = resume_token::decode(&result_type, token)?;
        let poller = Self {
            operation,
            pipeline: pipeline.into(),
            observer: options.observer,
            response: options.response,
            result_type,
            last: None,
        };
        poller.observer.on_event(&PollEvent::Resumed {
            kind: poller.kind(),
            status: poller.status(),
            poll_url: poller.operation.state().poll_url.clone(),
        });
        Ok(poller)
    }

    /// Returns a token to resume polling, possibly in a different process.
    ///
    /// Tokens can be created at any time, including after the operation
    /// completes.
    pub fn resume_token(&self) -> Result<String> {
        resume_token::encode(&self.result_type, &self.operation)
    }

    /// Returns true if the operation reached a terminal status.
    pub fn done(&self) -> bool {
        self.status().is_terminal()
    }

    /// The current status of the operation.
    pub fn status(&self) -> OperationStatus {
        self.operation.state().status
    }

    /// The convention used to track the operation.
    pub fn kind(&self) -> OperationKind {
        self.operation.kind()
    }

    /// Sends a single poll request and updates the status.
    ///
    /// Once the operation is done this returns the last response without
    /// sending any requests. On error the status is unchanged and the
    /// application may call this function again.
    ///
    /// Unsuccessful responses, for example `429 Too Many Requests`, are
    /// returned as errors.
    pub async fn poll(&mut self) -> Result<Response> {
        if self.done() {
            return Ok(self.last.clone().unwrap_or_else(|| self.restored_response()));
        }
        let url = self.operation.state().poll_url.clone();
        let response = self.pipeline.send(Request::get(url.as_str())).await?;
        if !response.status().is_success() {
            return Err(response.to_error());
        }
        let state = self.operation.next_state(&response)?;
        let status = state.status;
        *self.operation.state_mut() = state;
        self.observer.on_event(&PollEvent::Polled {
            kind: self.kind(),
            url,
            status_code: response.status().as_u16(),
            status,
        });
        self.notify_terminal();
        self.last = Some(response.clone());
        Ok(response)
    }

    /// Returns the result of a completed operation.
    ///
    /// Depending on the operation this may send a request to fetch the final
    /// resource. Fails with [Error::is_incomplete] if the operation is still
    /// in progress, and with a service error if the operation failed or was
    /// canceled.
    pub async fn result(&self) -> Result<T> {
        let state = self.operation.state();
        match state.status {
            OperationStatus::InProgress => Err(Error::incomplete()),
            OperationStatus::Failed | OperationStatus::Canceled => Err(self.failure()),
            OperationStatus::Succeeded => {
                let body = match self.operation.final_url() {
                    Some(url) => self.fetch(url).await?,
                    None => state.body.clone(),
                };
                self.decode(body)
            }
        }
    }

    /// Polls until the operation completes and returns its result.
    ///
    /// Waits for the interval in the `Retry-After` header of the last
    /// response, or for the configured frequency, between polls. Returns
    /// [Error::is_cancelled] if `cancel` is triggered first, the status is
    /// unchanged in that case.
    pub async fn poll_until_done(
        &mut self,
        cancel: &CancellationToken,
        options: PollUntilDoneOptions,
    ) -> Result<T> {
        if !self.done() {
            if let Some(delay) = self.last.as_ref().and_then(|r| retry_after(r.headers())) {
                sleep(cancel, delay).await?;
            }
        }
        while !self.done() {
            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::cancelled()),
                r = self.poll() => r?,
            };
            if self.done() {
                break;
            }
            let delay = retry_after(response.headers()).unwrap_or(options.frequency());
            sleep(cancel, delay).await?;
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::cancelled()),
            r = self.result() => r,
        }
    }

    fn notify_terminal(&self) {
        if self.done() {
            self.observer.on_event(&PollEvent::Terminal {
                kind: self.kind(),
                status: self.status(),
            });
        }
    }

    /// A response equivalent to the last one, for pollers restored from a
    /// token.
    fn restored_response(&self) -> Response {
        let state = self.operation.state();
        let parts = Parts::new()
            .set_status(state.status_code)
            .set_url(state.poll_url.as_str());
        Response::from_parts(parts, state.body.clone())
    }

    async fn fetch(&self, url: &str) -> Result<Bytes> {
        let response = self.pipeline.send(Request::get(url)).await?;
        if !response.status().is_success() {
            return Err(response.to_error());
        }
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Bytes::new());
        }
        Ok(response.into_body())
    }

    fn failure(&self) -> Error {
        let state = self.operation.state();
        let detail = serde_json::from_slice::<Value>(&state.body)
            .ok()
            .and_then(|v| ErrorDetail::try_from(&v).ok())
            .unwrap_or_else(|| {
                ErrorDetail::default()
                    .set_code(state.status.name())
                    .set_message(format!(
                        "the long-running operation ended in the {} state",
                        state.status
                    ))
            });
        Error::service_with_http_metadata(
            detail,
            Some(state.status_code),
            self.last.as_ref().map(|r| r.headers().clone()),
        )
    }

    fn decode(&self, body: Bytes) -> Result<T> {
        let template = self
            .response
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(Error::ser)?;
        let value = match (template, body.is_empty()) {
            (None, true) => return Ok(T::default()),
            (Some(t), true) => t,
            (None, false) => serde_json::from_slice::<Value>(&body).map_err(Error::deser)?,
            (Some(mut t), false) => {
                let payload = serde_json::from_slice::<Value>(&body).map_err(Error::deser)?;
                merge(&mut t, payload);
                t
            }
        };
        serde_json::from_value(value).map_err(Error::deser)
    }
}

/// Replaces the fields in `target` with the fields in `patch`, recursing into
/// nested objects.
fn merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (k, v) in patch {
                match target.get_mut(&k) {
                    Some(t) => merge(t, v),
                    None => {
                        target.insert(k, v);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

async fn sleep(cancel: &CancellationToken, delay: Duration) -> Result<()> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::cancelled()),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}

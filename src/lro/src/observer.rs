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

//! Observe the progress of long-running operations.
//!
//! Pollers never log. Applications that want to trace polling register a
//! [PollObserver] via [PollerOptions::with_observer][crate::PollerOptions::with_observer].
//! The [TracingObserver] forwards all events to the [tracing] crate.

use crate::operation::OperationKind;
use crate::status::OperationStatus;

/// A change in the state of a [Poller][crate::Poller].
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum PollEvent {
    /// A poller was created from the response that started the operation.
    Created {
        kind: OperationKind,
        status: OperationStatus,
        poll_url: String,
    },
    /// A poller was created from a resume token.
    Resumed {
        kind: OperationKind,
        status: OperationStatus,
        poll_url: String,
    },
    /// A poll request completed and updated the poller.
    Polled {
        kind: OperationKind,
        url: String,
        status_code: u16,
        status: OperationStatus,
    },
    /// The operation reached a terminal status.
    Terminal {
        kind: OperationKind,
        status: OperationStatus,
    },
}

/// Receives [PollEvent] notifications.
///
/// Observers are called synchronously from the poller. They should return
/// quickly.
pub trait PollObserver: Send + Sync + std::fmt::Debug {
    fn on_event(&self, event: &PollEvent);
}

/// Ignores all events. This is the default observer.
#[derive(Clone, Debug, Default)]
pub struct NoopObserver;

impl PollObserver for NoopObserver {
    fn on_event(&self, _event: &PollEvent) {}
}

/// Forwards all events to [tracing].
#[derive(Clone, Debug, Default)]
pub struct TracingObserver;

impl PollObserver for TracingObserver {
    fn on_event(&self, event: &PollEvent) {
        match event {
            PollEvent::Created {
                kind,
                status,
                poll_url,
            } => tracing::debug!(
                kind = kind.as_str(),
                %status,
                poll_url,
                "long-running operation started"
            ),
            PollEvent::Resumed {
                kind,
                status,
                poll_url,
            } => tracing::debug!(
                kind = kind.as_str(),
                %status,
                poll_url,
                "long-running operation resumed"
            ),
            PollEvent::Polled {
                kind,
                url,
                status_code,
                status,
            } => tracing::debug!(
                kind = kind.as_str(),
                url,
                status_code,
                %status,
                "long-running operation polled"
            ),
            PollEvent::Terminal { kind, status } => tracing::info!(
                kind = kind.as_str(),
                %status,
                "long-running operation completed"
            ),
        }
    }
}

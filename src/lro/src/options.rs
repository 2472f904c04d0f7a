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

use crate::observer::{NoopObserver, PollObserver};
use crate::operation::FinalStateVia;
use crate::status::TerminalStates;
use std::sync::Arc;
use std::time::Duration;

/// The smallest interval between polls in [Poller::poll_until_done][crate::Poller::poll_until_done].
pub const MIN_FREQUENCY: Duration = Duration::from_secs(1);

/// The default interval between polls in [Poller::poll_until_done][crate::Poller::poll_until_done].
pub const DEFAULT_FREQUENCY: Duration = Duration::from_secs(30);

/// Configures a new [Poller][crate::Poller].
///
/// # Parameters
/// * `T` - the result type of the long-running operation.
///
/// # Example
/// ```
/// # use arm_lro::{FinalStateVia, PollerOptions, TerminalStates, TracingObserver};
/// let options = PollerOptions::<serde_json::Value>::default()
///     .with_final_state_via(FinalStateVia::Location)
///     .with_terminal_states(TerminalStates::default().with_succeeded(["Completed"]))
///     .with_observer(TracingObserver);
/// ```
pub struct PollerOptions<T> {
    pub(crate) config: Config,
    pub(crate) response: Option<T>,
    pub(crate) result_type: Option<String>,
    pub(crate) observer: Arc<dyn PollObserver>,
}

impl<T> PollerOptions<T> {
    /// Selects where the final result of an operation using a status
    /// monitor is found.
    ///
    /// When not set, the method of the request that started the operation
    /// decides.
    pub fn with_final_state_via(mut self, v: FinalStateVia) -> Self {
        self.config.final_state_via = Some(v);
        self
    }

    /// Sets the status strings recognized as terminal.
    pub fn with_terminal_states(mut self, v: TerminalStates) -> Self {
        self.config.terminal_states = v;
        self
    }

    /// Poll `PUT` and `PATCH` operations that return `200 OK` without polling
    /// headers.
    ///
    /// Such responses usually mean the operation completed synchronously, and
    /// by default the poller is done immediately. Some services return
    /// `200 OK` before the resource is ready. For these services, set this
    /// option to poll the resource until its provisioning state is terminal.
    pub fn with_force_body_polling(mut self, v: bool) -> Self {
        self.config.force_body_polling = v;
        self
    }

    /// Sets the value where the final result is stored.
    ///
    /// Fields present in the final payload replace the values in `v`, the
    /// other fields keep their values.
    pub fn with_response(mut self, v: T) -> Self {
        self.response = Some(v);
        self
    }

    /// Sets the name of the result type recorded in resume tokens.
    ///
    /// Pollers only accept tokens created with the same name. The default is
    /// the full path of `T` as reported by the compiler, which may change
    /// between compiler versions. Set a stable name if tokens are persisted
    /// across application upgrades.
    pub fn with_result_type<V: Into<String>>(mut self, v: V) -> Self {
        self.result_type = Some(v.into());
        self
    }

    /// Sets the observer notified of progress.
    pub fn with_observer<O>(mut self, v: O) -> Self
    where
        O: PollObserver + 'static,
    {
        self.observer = Arc::new(v);
        self
    }
}

impl<T> Default for PollerOptions<T> {
    fn default() -> Self {
        Self {
            config: Config::default(),
            response: None,
            result_type: None,
            observer: Arc::new(NoopObserver),
        }
    }
}

impl<T> std::fmt::Debug for PollerOptions<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollerOptions")
            .field("config", &self.config)
            .field("response", &self.response.as_ref().map(|_| "..."))
            .field("result_type", &self.result_type)
            .field("observer", &self.observer)
            .finish()
    }
}

/// The settings fixed when an operation is detected.
///
/// Only `final_state_via` and `terminal_states` are preserved in resume
/// tokens, `force_body_polling` only matters for the initial response.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Config {
    pub final_state_via: Option<FinalStateVia>,
    pub terminal_states: TerminalStates,
    pub force_body_polling: bool,
}

/// Configures [Poller::poll_until_done][crate::Poller::poll_until_done].
#[derive(Clone, Debug, PartialEq)]
pub struct PollUntilDoneOptions {
    frequency: Duration,
}

impl PollUntilDoneOptions {
    /// Sets the interval between polls when the service does not recommend
    /// one via `Retry-After`.
    ///
    /// Values smaller than [MIN_FREQUENCY] are raised to [MIN_FREQUENCY].
    ///
    /// # Example
    /// ```
    /// # use arm_lro::{MIN_FREQUENCY, PollUntilDoneOptions};
    /// # use std::time::Duration;
    /// let options = PollUntilDoneOptions::default().with_frequency(Duration::from_millis(10));
    /// assert_eq!(options.frequency(), MIN_FREQUENCY);
    /// ```
    pub fn with_frequency(mut self, v: Duration) -> Self {
        self.frequency = v.max(MIN_FREQUENCY);
        self
    }

    /// The interval between polls.
    pub fn frequency(&self) -> Duration {
        self.frequency
    }
}

impl Default for PollUntilDoneOptions {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::TracingObserver;
    use test_case::test_case;

    #[test]
    fn poller_defaults() {
        let options = PollerOptions::<serde_json::Value>::default();
        assert_eq!(options.config, Config::default());
        assert!(options.config.final_state_via.is_none(), "{options:?}");
        assert!(!options.config.force_body_polling, "{options:?}");
        assert!(options.response.is_none(), "{options:?}");
        assert!(options.result_type.is_none(), "{options:?}");
        let got = format!("{options:?}");
        assert!(got.contains("NoopObserver"), "{got}");
    }

    #[test]
    fn poller_setters() {
        let states = TerminalStates::default().with_succeeded(["Completed"]);
        let options = PollerOptions::<i32>::default()
            .with_final_state_via(FinalStateVia::OriginalUri)
            .with_terminal_states(states.clone())
            .with_force_body_polling(true)
            .with_response(42)
            .with_result_type("widgets.Widget")
            .with_observer(TracingObserver);
        assert_eq!(
            options.config.final_state_via,
            Some(FinalStateVia::OriginalUri)
        );
        assert_eq!(options.config.terminal_states, states);
        assert!(options.config.force_body_polling, "{options:?}");
        assert_eq!(options.response, Some(42));
        assert_eq!(options.result_type.as_deref(), Some("widgets.Widget"));
        let got = format!("{options:?}");
        assert!(got.contains("TracingObserver"), "{got}");
    }

    #[test]
    fn until_done_default() {
        let options = PollUntilDoneOptions::default();
        assert_eq!(options.frequency(), DEFAULT_FREQUENCY);
    }

    #[test_case(Duration::ZERO, MIN_FREQUENCY)]
    #[test_case(Duration::from_millis(999), MIN_FREQUENCY)]
    #[test_case(Duration::from_secs(1), Duration::from_secs(1))]
    #[test_case(Duration::from_secs(5), Duration::from_secs(5))]
    fn until_done_frequency(input: Duration, want: Duration) {
        let options = PollUntilDoneOptions::default().with_frequency(input);
        assert_eq!(options.frequency(), want);
    }
}

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

use std::time::Duration;

/// The client configuration for [crate::http::ReqwestPipeline].
///
/// Credentials are provided by the application as a bearer token. Obtaining
/// and refreshing the token is outside the scope of these libraries.
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub(crate) bearer_token: Option<String>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) user_agent: Option<String>,
}

impl ClientConfig {
    /// Sets the bearer token sent in the `authorization` header.
    pub fn with_bearer_token<T: Into<String>>(mut self, v: T) -> Self {
        self.bearer_token = Some(v.into());
        self
    }

    /// Sets the timeout for each request.
    pub fn with_timeout(mut self, v: Duration) -> Self {
        self.timeout = Some(v);
        self
    }

    /// Appends a product token to the `user-agent` header.
    pub fn with_user_agent<T: Into<String>>(mut self, v: T) -> Self {
        self.user_agent = Some(v.into());
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[censored]"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

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

use crate::options::ClientConfig;
use gax::Result;
use gax::error::Error;
use gax::request::Request;
use gax::response::{Parts, Response};
use http::{HeaderValue, Method};
use std::time::Duration;
use tracing::Instrument;

/// A [Pipeline][gax::pipeline::Pipeline] based on [reqwest].
///
/// Each request carries the configured bearer token and a `user-agent`
/// header. The pipeline does not retry, and returns unsuccessful responses
/// to the caller like any other response.
#[derive(Clone, Debug)]
pub struct ReqwestPipeline {
    inner: reqwest::Client,
    authorization: Option<HeaderValue>,
    user_agent: HeaderValue,
    timeout: Option<Duration>,
}

impl ReqwestPipeline {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let user_agent = crate::api_header::user_agent(config.user_agent.as_deref());
        let user_agent = HeaderValue::from_str(&user_agent).map_err(Error::ser)?;
        let authorization = config
            .bearer_token
            .map(|token| {
                let mut value =
                    HeaderValue::from_str(&format!("Bearer {token}")).map_err(Error::ser)?;
                value.set_sensitive(true);
                Ok::<_, Error>(value)
            })
            .transpose()?;
        Ok(Self {
            inner: reqwest::Client::new(),
            authorization,
            user_agent,
            timeout: config.timeout,
        })
    }

    async fn request_attempt(&self, request: Request) -> Result<Response> {
        let (method, url, headers, body) = request.into_parts();
        let mut builder = self
            .inner
            .request(method.clone(), url.as_str())
            .headers(headers)
            .header(http::header::USER_AGENT, self.user_agent.clone());
        if let Some(authorization) = &self.authorization {
            builder = builder.header(http::header::AUTHORIZATION, authorization.clone());
        }
        builder = self.timeout.into_iter().fold(builder, |b, t| b.timeout(t));
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let response = builder.send().await.map_err(Self::map_send_error)?;
        tracing::Span::current().record("http.response.status_code", response.status().as_u16());
        to_response(method, url, response).await
    }

    fn map_send_error(err: reqwest::Error) -> Error {
        match err {
            e if e.is_timeout() => Error::timeout(e),
            e if e.is_builder() => Error::ser(e),
            e => Error::io(e),
        }
    }
}

impl gax::pipeline::Pipeline for ReqwestPipeline {
    async fn send(&self, request: Request) -> Result<Response> {
        let span = tracing::info_span!(
            "arm.http",
            http.request.method = %request.method(),
            url.full = %request.url(),
            http.response.status_code = tracing::field::Empty,
        );
        let result = self.request_attempt(request).instrument(span.clone()).await;
        if let Err(e) = &result {
            tracing::debug!(parent: &span, error = %e, "request failed without a response");
        }
        result
    }
}

async fn to_response(method: Method, url: String, response: reqwest::Response) -> Result<Response> {
    let response = http::Response::from(response);
    let (parts, body) = response.into_parts();

    // The headers arrived, errors reading the body keep them.
    let body = match http_body_util::BodyExt::collect(body).await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is_timeout() => return Err(Error::timeout(e)),
        Err(e) => return Err(Error::transport(parts.headers, e)),
    };

    let parts = Parts::new()
        .set_status(parts.status.as_u16())
        .set_headers(parts.headers)
        .set_method(method)
        .set_url(url);
    Ok(Response::from_parts(parts, body))
}

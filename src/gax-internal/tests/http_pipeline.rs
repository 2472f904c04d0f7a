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

//! These tests verify the reqwest-based pipeline sends the expected headers
//! and returns every response, successful or not, without interpretation.
//!
//! The tests use an HTTP server that returns canned responses.

#[cfg(test)]
mod tests {
    use arm_gax_internal::http::ReqwestPipeline;
    use arm_gax_internal::options::ClientConfig;
    use gax::pipeline::SharedPipeline;
    use gax::request::Request;
    use http::StatusCode;
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use std::time::Duration;

    type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    fn pipeline(config: ClientConfig) -> Result<SharedPipeline> {
        Ok(SharedPipeline::from(ReqwestPipeline::new(config)?))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn success() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/operations/op1")).respond_with(
                status_code(200)
                    .insert_header("content-type", "application/json")
                    .body(r#"{"status": "Succeeded"}"#),
            ),
        );
        let url = format!("http://{}/operations/op1", server.addr());

        let pipeline = pipeline(ClientConfig::default())?;
        let response = pipeline.send(Request::get(&url)).await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.method(), http::Method::GET);
        assert_eq!(response.url(), url);
        assert_eq!(
            response.headers().get("content-type").map(|v| v.as_bytes()),
            Some(b"application/json".as_slice())
        );
        assert_eq!(response.body().as_ref(), br#"{"status": "Succeeded"}"#);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn errors_are_responses() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/widgets/w1")).respond_with(
                status_code(409).body(r#"{"error": {"code": "Conflict", "message": "busy"}}"#),
            ),
        );
        let url = format!("http://{}/widgets/w1", server.addr());

        let pipeline = pipeline(ClientConfig::default())?;
        let response = pipeline.send(Request::get(&url)).await?;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let error = response.to_error();
        assert_eq!(error.detail().map(|d| d.code.as_str()), Some("Conflict"));
        assert_eq!(error.http_status_code(), Some(409));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn sends_body() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("PUT", "/widgets/w1"),
                request::headers(contains(("content-type", "application/json"))),
                request::body(r#"{"size":3}"#),
            ])
            .respond_with(status_code(201).body(r#"{"size":3}"#)),
        );
        let url = format!("http://{}/widgets/w1", server.addr());

        let pipeline = pipeline(ClientConfig::default())?;
        let request = Request::new(http::Method::PUT, &url)
            .set_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            )
            .set_body(r#"{"size":3}"#);
        let response = pipeline.send(request).await?;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.method(), http::Method::PUT);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn authorization_and_user_agent() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/widgets/w1"),
                request::headers(contains(("authorization", "Bearer test-token"))),
                request::headers(contains((
                    "user-agent",
                    matches("^arm-rust/[^ ]+ \\(rustc .*\\) my-app/1.0$")
                ))),
            ])
            .respond_with(status_code(204)),
        );
        let url = format!("http://{}/widgets/w1", server.addr());

        let config = ClientConfig::default()
            .with_bearer_token("test-token")
            .with_user_agent("my-app/1.0");
        let response = pipeline(config)?.send(Request::get(&url)).await?;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.body().is_empty(), "{response:?}");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn no_authorization_by_default() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/widgets/w1"),
                not(request::headers(contains(key("authorization")))),
            ])
            .respond_with(status_code(200)),
        );
        let url = format!("http://{}/widgets/w1", server.addr());

        let response = pipeline(ClientConfig::default())?
            .send(Request::get(&url))
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn timeout() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/slow"))
                .respond_with(delay_and_then(Duration::from_secs(2), status_code(200))),
        );
        let url = format!("http://{}/slow", server.addr());

        let config = ClientConfig::default().with_timeout(Duration::from_millis(50));
        let err = pipeline(config)?
            .send(Request::get(&url))
            .await
            .expect_err("the request should time out");
        assert!(err.is_timeout(), "{err:?}");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn connection_refused() -> Result<()> {
        // Start a server only to find an unused port.
        let addr = {
            let server = Server::run();
            server.addr()
        };
        let url = format!("http://{addr}/widgets/w1");

        let err = pipeline(ClientConfig::default())?
            .send(Request::get(&url))
            .await
            .expect_err("nothing listens on the port");
        assert!(err.is_io(), "{err:?}");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn truncated_body() -> Result<()> {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await?;
            let mut buffer = [0_u8; 4096];
            let _ = stream.read(&mut buffer).await?;
            stream
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\nx-ms-request-id: r1\r\n\r\n{\"status\"",
                )
                .await?;
            stream.shutdown().await
        });
        let url = format!("http://{addr}/operations/op1");

        let pipeline = pipeline(ClientConfig::default())?;
        let got = pipeline.send(Request::get(&url)).await;
        let error = got.err().ok_or("expected an error")?;
        assert!(error.is_transport(), "{error:?}");
        assert_eq!(
            error
                .http_headers()
                .and_then(|h| h.get("x-ms-request-id"))
                .map(|v| v.as_bytes()),
            Some(b"r1".as_slice())
        );
        server.await??;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn emits_span() -> Result<()> {
        use tracing_subscriber::fmt::format::FmtSpan;

        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/traced"))
                .respond_with(status_code(202)),
        );
        let url = format!("http://{}/traced", server.addr());

        let buffer = TestWriter::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_span_events(FmtSpan::CLOSE)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let response = pipeline(ClientConfig::default())?
            .send(Request::get(&url))
            .await?;
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let got = buffer.contents();
        assert!(got.contains("arm.http"), "{got}");
        assert!(got.contains("http.response.status_code=202"), "{got}");
        assert!(got.contains("/traced"), "{got}");
        Ok(())
    }

    #[derive(Clone, Default)]
    struct TestWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl TestWriter {
        fn contents(&self) -> String {
            let buffer = self.0.lock().expect("poisoned mutex");
            String::from_utf8_lossy(&buffer).to_string()
        }
    }

    impl std::io::Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("poisoned mutex").extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for TestWriter {
        type Writer = TestWriter;
        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }
}

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

use super::detail::ErrorDetail;
use http::HeaderMap;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The core error returned by all client libraries.
///
/// The client libraries report errors from multiple sources. For example, the
/// service may return an error, the transport may be unable to create the
/// necessary connection to make a request, the service may violate the
/// protocol used to track long-running operations, or the application may
/// cancel a long-running wait.
///
/// Most applications will just return the error or log it, without any further
/// action. However, some applications may need to interrogate the error
/// details. This type offers a series of predicates to determine the error
/// kind. The type also offers accessors to query the most common error details.
/// Applications can query the error [source][std::error::Error::source] for
/// deeper information.
///
/// # Example
/// ```
/// use arm_gax::error::Error;
/// match example_function() {
///     Err(e) if matches!(e.detail(), Some(_)) => {
///         println!("service error {e}, debug using {:?}", e.detail().unwrap());
///     },
///     Err(e) if e.is_cancelled() => { println!("the application gave up {e}"); },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success, how boring"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # use arm_gax::error::detail::ErrorDetail;
///     # Err(Error::service(ErrorDetail::default().set_code("NotFound").set_message("NOT FOUND")))
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error with the information returned by the service.
    ///
    /// # Example
    /// ```
    /// use arm_gax::error::Error;
    /// use arm_gax::error::detail::ErrorDetail;
    /// let detail = ErrorDetail::default().set_code("Conflict").set_message("try again later");
    /// let error = Error::service(detail.clone());
    /// assert_eq!(error.detail(), Some(&detail));
    /// ```
    pub fn service(detail: ErrorDetail) -> Self {
        Self::service_with_http_metadata(detail, None, None)
    }

    /// Creates a service error including the HTTP metadata of the response.
    pub fn service_with_http_metadata(
        detail: ErrorDetail,
        status_code: Option<u16>,
        headers: Option<HeaderMap>,
    ) -> Self {
        let details = ServiceDetails {
            status_code,
            headers,
            detail,
        };
        Self {
            kind: ErrorKind::Service(Box::new(details)),
            source: None,
        }
    }

    /// The [ErrorDetail] payload associated with this error.
    ///
    /// Resource Manager services return a detailed error including a string
    /// code, a human-readable message, and sometimes a list of nested errors
    /// with more information about what caused the failure.
    ///
    /// Long-running operations that end in the `Failed` or `Canceled` state
    /// also report their outcome using this type.
    ///
    /// # Troubleshooting
    ///
    /// As this error type is typically created by the service, troubleshooting
    /// this problem typically involves reading the service documentation to
    /// root cause the problem. The `std::fmt::Debug` format includes any
    /// nested details.
    pub fn detail(&self) -> Option<&ErrorDetail> {
        match &self.kind {
            ErrorKind::Service(d) => Some(&d.as_ref().detail),
            _ => None,
        }
    }

    /// Creates an error representing a timeout.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use arm_gax::error::Error;
    /// let error = Error::timeout("simulated timeout");
    /// assert!(error.is_timeout());
    /// assert!(error.source().is_some());
    /// ```
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            source: Some(source.into()),
        }
    }

    /// The request could not be completed before its deadline.
    ///
    /// This is always a client-side generated error. Note that the request may
    /// or may not have started, and it may or may not complete in the service.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Creates an error representing a deserialization problem.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use arm_gax::error::Error;
    /// let error = Error::deser("simulated problem");
    /// assert!(error.is_deserialization());
    /// assert!(error.source().is_some());
    /// ```
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// The response could not be deserialized.
    ///
    /// This is always a client-side generated error. When polling a
    /// long-running operation the poller state is unchanged, and the poll can
    /// be attempted again.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// Creates an error representing a serialization problem.
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Serialization,
            source: Some(source.into()),
        }
    }

    /// The request, or a resume token, could not be serialized.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Serialization)
    }

    /// Creates an error representing a violation of the long-running operation
    /// protocol.
    ///
    /// # Example
    /// ```
    /// use arm_gax::error::Error;
    /// let error = Error::protocol("missing polling URL");
    /// assert!(error.is_protocol());
    /// ```
    pub fn protocol<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Protocol,
            source: Some(source.into()),
        }
    }

    /// The service response does not follow any long-running operation
    /// convention.
    ///
    /// For example, a `202 Accepted` response to a `DELETE` or `POST` request
    /// must include a polling URL. No poller is created in this case.
    ///
    /// # Troubleshooting
    ///
    /// This is almost always a bug in the service. Use `format!("{e:?}")` to
    /// find the details and contact the service owners.
    pub fn is_protocol(&self) -> bool {
        matches!(self.kind, ErrorKind::Protocol)
    }

    /// Creates an error representing a request for the result of an
    /// operation that has not completed.
    pub fn incomplete() -> Self {
        Self {
            kind: ErrorKind::Incomplete,
            source: None,
        }
    }

    /// The application asked for the result of a long-running operation
    /// before the operation reached a terminal state.
    pub fn is_incomplete(&self) -> bool {
        matches!(self.kind, ErrorKind::Incomplete)
    }

    /// Creates an error representing an invalid resume token.
    ///
    /// # Example
    /// ```
    /// use arm_gax::error::Error;
    /// let error = Error::resume_token("unknown operation kind `future`");
    /// assert!(error.is_resume_token());
    /// ```
    pub fn resume_token<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::ResumeToken,
            source: Some(source.into()),
        }
    }

    /// The resume token is malformed, was produced for a different result
    /// type, or describes an operation kind this library does not know.
    pub fn is_resume_token(&self) -> bool {
        matches!(self.kind, ErrorKind::ResumeToken)
    }

    /// Creates an error representing a cancellation requested by the
    /// application.
    pub fn cancelled() -> Self {
        Self {
            kind: ErrorKind::Cancelled,
            source: None,
        }
    }

    /// The application cancelled the wait for a long-running operation.
    ///
    /// The operation itself continues in the service. The poller keeps the
    /// state it had before the interrupted step.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled)
    }

    /// Creates an error representing a HTTP response without a structured
    /// error payload.
    pub fn http(status_code: u16, headers: HeaderMap, payload: bytes::Bytes) -> Self {
        let details = TransportDetails {
            status_code: Some(status_code),
            headers: Some(headers),
            payload: Some(payload),
        };
        let kind = ErrorKind::Transport(Box::new(details));
        Self { kind, source: None }
    }

    /// Creates an error representing a problem sending the request or
    /// receiving the response.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        let details = TransportDetails {
            status_code: None,
            headers: None,
            payload: None,
        };
        Self {
            kind: ErrorKind::Transport(Box::new(details)),
            source: Some(source.into()),
        }
    }

    /// A problem reported by the I/O layer.
    pub fn is_io(&self) -> bool {
        matches!(
        &self.kind,
        ErrorKind::Transport(d) if matches!(**d, TransportDetails {
            status_code: None,
            headers: None,
            payload: None,
        }))
    }

    /// Creates a transport error with response headers.
    pub fn transport<T: Into<BoxError>>(headers: HeaderMap, source: T) -> Self {
        let details = TransportDetails {
            headers: Some(headers),
            status_code: None,
            payload: None,
        };
        Self {
            kind: ErrorKind::Transport(Box::new(details)),
            source: Some(source.into()),
        }
    }

    /// A problem in the transport layer without a service error payload.
    ///
    /// This includes I/O errors, and HTTP errors generated by proxies or load
    /// balancers before the request reaches the service.
    pub fn is_transport(&self) -> bool {
        matches!(&self.kind, ErrorKind::Transport { .. })
    }

    /// The HTTP status code, if any, associated with this error.
    ///
    /// Note that `http_status_code()`, `http_headers()`, `http_payload()`, and
    /// `detail()` are represented as different fields, because they may be
    /// set in some errors but not others.
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Transport(d) => d.as_ref().status_code,
            ErrorKind::Service(d) => d.as_ref().status_code,
            _ => None,
        }
    }

    /// The headers, if any, associated with this error.
    ///
    /// Many errors do not have this information, e.g. errors detected before
    /// the request is sent, or cancellations.
    pub fn http_headers(&self) -> Option<&http::HeaderMap> {
        match &self.kind {
            ErrorKind::Transport(d) => d.as_ref().headers.as_ref(),
            ErrorKind::Service(d) => d.as_ref().headers.as_ref(),
            _ => None,
        }
    }

    /// The payload, if any, associated with this error.
    pub fn http_payload(&self) -> Option<&bytes::Bytes> {
        match &self.kind {
            ErrorKind::Transport(d) => d.payload.as_ref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Serialization, Some(e)) => write!(f, "cannot serialize the request {e}"),
            (ErrorKind::Deserialization, Some(e)) => {
                write!(f, "cannot deserialize the response {e}")
            }
            (ErrorKind::Timeout, Some(e)) => {
                write!(f, "the request exceeded the request deadline {e}")
            }
            (ErrorKind::Protocol, Some(e)) => {
                write!(
                    f,
                    "the response does not follow the long-running operation protocol: {e}"
                )
            }
            (ErrorKind::ResumeToken, Some(e)) => write!(f, "invalid resume token: {e}"),
            (ErrorKind::Incomplete, _) => write!(
                f,
                "cannot return the result of a long-running operation in a non-terminal state"
            ),
            (ErrorKind::Cancelled, _) => {
                write!(f, "the application cancelled the long-running operation wait")
            }
            (ErrorKind::Transport(details), _) => details.display(self.source(), f),
            (ErrorKind::Service(d), _) => {
                write!(
                    f,
                    "the service reports an error with code {} described as: {}",
                    d.detail.code, d.detail.message
                )
            }
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

/// The type of error held by an [Error] instance.
#[derive(Debug)]
enum ErrorKind {
    Serialization,
    Deserialization,
    Timeout,
    Protocol,
    Incomplete,
    ResumeToken,
    Cancelled,
    Transport(Box<TransportDetails>),
    Service(Box<ServiceDetails>),
}

#[derive(Debug)]
struct TransportDetails {
    status_code: Option<u16>,
    headers: Option<HeaderMap>,
    payload: Option<bytes::Bytes>,
}

impl TransportDetails {
    fn display(
        &self,
        source: Option<&(dyn StdError + 'static)>,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match (source, &self) {
            (
                _,
                TransportDetails {
                    status_code: Some(code),
                    payload: Some(p),
                    ..
                },
            ) => {
                if let Ok(message) = std::str::from_utf8(p.as_ref()) {
                    write!(f, "the HTTP transport reports a [{code}] error: {message}")
                } else {
                    write!(f, "the HTTP transport reports a [{code}] error: {p:?}")
                }
            }
            (Some(source), _) => {
                write!(f, "the transport reports an error: {source}")
            }
            (None, _) => unreachable!("no Error constructor allows this"),
        }
    }
}

#[derive(Debug)]
struct ServiceDetails {
    status_code: Option<u16>,
    headers: Option<HeaderMap>,
    detail: ErrorDetail,
}

//! Axum implementations of the framework-neutral HTTP traits.
//!
//! `AuthRequest` and `AuthResponseBuilder` live in `bastion_core`, so Axum's
//! types are wrapped in local newtypes to satisfy the orphan rule.
//!
//! ```text
//!   axum::http::Request<B> ──wrap──▶ AxumRequest<B> ──▶ impl AuthRequest
//!   StatusCode + HeaderMap ──────▶ AxumResponseBuilder ──▶ impl AuthResponseBuilder
//! ```
//!
//! Handlers hold the request across awaits, so routes and middleware wrap a
//! `Request<()>` (the head only) and keep the body bytes aside.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, HeaderName, HeaderValue, Request, StatusCode, header},
    response::{IntoResponse, Response},
};
use bastion_core::{AuthRequest, AuthResponseBuilder};

/// An Axum request seen through [`AuthRequest`].
#[repr(transparent)]
pub struct AxumRequest<B = Body>(pub Request<B>);

impl<B> From<Request<B>> for AxumRequest<B> {
    fn from(request: Request<B>) -> Self {
        AxumRequest(request)
    }
}

impl AxumRequest<Body> {
    /// Splits off the body so the head can be shared across awaits.
    pub fn into_head(self) -> (AxumRequest<()>, Body) {
        let (parts, body) = self.0.into_parts();
        (AxumRequest(Request::from_parts(parts, ())), body)
    }
}

impl AxumRequest<()> {
    /// Reattaches a body, typically the buffered original.
    pub fn with_body(self, body: Body) -> Request<Body> {
        let (parts, ()) = self.0.into_parts();
        Request::from_parts(parts, body)
    }
}

impl<B> AuthRequest for AxumRequest<B> {
    fn header(&self, name: &str) -> Option<&str> {
        // HeaderMap lookups are case-insensitive.
        self.0
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        // Several Cookie headers may be present.
        self.0
            .headers()
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|line| line.split(';'))
            .find_map(|pair| {
                let (key, value) = pair.trim().split_once('=')?;
                (key == name).then_some(value)
            })
    }

    fn method(&self) -> &str {
        self.0.method().as_str()
    }

    fn path(&self) -> &str {
        self.0.uri().path()
    }

    fn remote_addr(&self) -> Option<String> {
        self.0
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
    }
}

/// Collects status, headers and a JSON body into an Axum [`Response`].
///
/// Header names or values Axum refuses are dropped with a warning instead of
/// failing the whole response.
#[derive(Debug, Default)]
pub struct AxumResponseBuilder {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<String>,
}

impl AxumResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthResponseBuilder for AxumResponseBuilder {
    type Response = Response;

    fn status(mut self, code: u16) -> Self {
        match StatusCode::from_u16(code) {
            Ok(status) => self.status = status,
            Err(_) => {
                tracing::warn!(code, "Invalid status code, answering 500");
                self.status = StatusCode::INTERNAL_SERVER_ERROR;
            }
        }
        self
    }

    fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping invalid response header"),
        }
        self
    }

    fn json_body(mut self, body: serde_json::Value) -> Self {
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.body = Some(body.to_string());
        self
    }

    fn build(self) -> Self::Response {
        let body = self.body.map(Body::from).unwrap_or_else(Body::empty);
        (self.status, self.headers, body).into_response()
    }
}

/// Fresh builder for the framework-agnostic handlers.
pub fn response_builder() -> AxumResponseBuilder {
    AxumResponseBuilder::new()
}

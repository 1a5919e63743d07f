//! Collection of request fields into a `RequestContext`.

use std::collections::HashMap;

use axum::{
    Json,
    body::{Body, Bytes},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bastion_core::{AuthRequest, RequestContext};
use thiserror::Error;

use crate::adapters::AxumRequest;

/// Largest body buffered to read answer fields from.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Request body too large or unreadable: {0}")]
    Body(String),
}

impl IntoResponse for ContextError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ContextError::Body(_) => (StatusCode::PAYLOAD_TOO_LARGE, "request body too large"),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// A request whose body has been read, with its fields collected.
pub struct BufferedRequest {
    pub head: AxumRequest<()>,
    pub body: Bytes,
    pub context: RequestContext,
}

impl BufferedRequest {
    /// Buffers the body and collects query plus form or JSON fields.
    ///
    /// Body fields override query fields of the same name.
    pub async fn read(request: axum::extract::Request) -> Result<Self, ContextError> {
        let (head, body) = AxumRequest(request).into_head();
        let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| ContextError::Body(e.to_string()))?;

        let mut context = RequestContext::new(head.method(), head.path())
            .with_remote_addr(head.remote_addr());
        let content_type = head.header("content-type").unwrap_or_default();
        if content_type.starts_with("application/x-www-form-urlencoded") {
            context.extend_params(urlencoded_fields(&body));
        } else if content_type.starts_with("application/json") {
            context.extend_params(json_fields(&body));
        }
        if let Some(query) = head.0.uri().query() {
            context.extend_params(urlencoded_fields(query.as_bytes()));
        }

        Ok(Self {
            head,
            body,
            context,
        })
    }

    /// The original request, body restored.
    pub fn into_request(self) -> axum::extract::Request {
        self.head.with_body(Body::from(self.body))
    }
}

fn urlencoded_fields(input: &[u8]) -> Vec<(String, String)> {
    serde_urlencoded::from_bytes(input).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Ignoring undecodable form fields");
        Vec::new()
    })
}

/// Top-level scalar fields of a JSON object, rendered as strings.
fn json_fields(input: &[u8]) -> Vec<(String, String)> {
    let Ok(fields) = serde_json::from_slice::<HashMap<String, serde_json::Value>>(input) else {
        tracing::debug!("Ignoring non-object JSON body");
        return Vec::new();
    };
    fields
        .into_iter()
        .filter_map(|(name, value)| match value {
            serde_json::Value::String(s) => Some((name, s)),
            serde_json::Value::Number(n) => Some((name, n.to_string())),
            serde_json::Value::Bool(b) => Some((name, b.to_string())),
            _ => None,
        })
        .collect()
}

//! Framework-neutral HTTP traits.
//!
//! Handlers for issuing codes, the slider check, the challenge gate and URI
//! authorization are written once against these traits. A web framework
//! plugs in by wrapping its request and response builder types.
//!
//! ```text
//!   bastion_core          AuthRequest / AuthResponseBuilder
//!        │
//!        ▼
//!   bastion_axum          AxumRequest<B>, AxumResponseBuilder
//!        │
//!        ▼
//!   bastion_adapters      handle_issue_code, handle_challenge_gate, ...
//! ```

/// What the challenge handlers read from an inbound request.
///
/// Implementations hand out borrowed strings straight from the framework's
/// request; nothing is copied except the peer address.
///
/// ```ignore
/// impl<B> AuthRequest for AxumRequest<B> {
///     fn header(&self, name: &str) -> Option<&str> {
///         self.0.headers().get(name)?.to_str().ok()
///     }
///     // ...
/// }
/// ```
pub trait AuthRequest {
    /// Header value, looked up case-insensitively. `None` when absent or not
    /// valid UTF-8.
    fn header(&self, name: &str) -> Option<&str>;

    /// Value of the named cookie across all `Cookie` headers.
    fn cookie(&self, name: &str) -> Option<&str>;

    fn method(&self) -> &str;

    /// Path without the query string.
    fn path(&self) -> &str;

    /// Peer address, when the framework exposes one.
    fn remote_addr(&self) -> Option<String> {
        None
    }
}

/// Chained construction of a framework response.
///
/// ```ignore
/// builder
///     .status(206)
///     .cookie("bastion_session=7f0c...; HttpOnly; SameSite=Lax; Path=/")
///     .json_body(json!({ "token": token }))
///     .build()
/// ```
pub trait AuthResponseBuilder: Sized {
    type Response;

    fn status(self, code: u16) -> Self;

    fn header(self, name: &str, value: &str) -> Self;

    /// Adds a `Set-Cookie` header carrying a complete cookie string.
    fn cookie(self, cookie_value: &str) -> Self {
        self.header("set-cookie", cookie_value)
    }

    /// Sets the body and `Content-Type: application/json`.
    fn json_body(self, body: serde_json::Value) -> Self;

    fn build(self) -> Self::Response;
}

/// Shorthands for the responses the handlers produce.
pub trait AuthResponseHelpers: AuthResponseBuilder {
    fn ok_json(self, body: serde_json::Value) -> Self::Response {
        self.status(200).json_body(body).build()
    }

    /// 206: slider phase one passed on a guarded request; the body carries
    /// the second-check token.
    fn partial_content(self, body: serde_json::Value) -> Self::Response {
        self.status(206).json_body(body).build()
    }

    /// `{"error": message}` with the given status.
    fn error_json(self, status: u16, message: &str) -> Self::Response {
        self.status(status)
            .json_body(serde_json::json!({ "error": message }))
            .build()
    }

    fn forbidden(self, message: &str) -> Self::Response {
        self.error_json(403, message)
    }

    fn not_found(self, message: &str) -> Self::Response {
        self.error_json(404, message)
    }

    fn internal_error(self, message: &str) -> Self::Response {
        self.error_json(500, message)
    }
}

impl<T: AuthResponseBuilder> AuthResponseHelpers for T {}

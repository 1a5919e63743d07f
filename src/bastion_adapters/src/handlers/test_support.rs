use std::collections::HashMap;

use bastion_core::{AuthRequest, AuthResponseBuilder};

#[derive(Default)]
pub struct MockRequest {
    pub method: String,
    pub path: String,
    pub cookies: HashMap<String, String>,
}

impl MockRequest {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            cookies: HashMap::new(),
        }
    }

    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_string(), value.to_string());
        self
    }
}

impl AuthRequest for MockRequest {
    fn header(&self, _name: &str) -> Option<&str> {
        None
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, Default)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl MockResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
pub struct MockResponseBuilder(MockResponse);

impl AuthResponseBuilder for MockResponseBuilder {
    type Response = MockResponse;

    fn status(mut self, code: u16) -> Self {
        self.0.status = code;
        self
    }

    fn header(mut self, name: &str, value: &str) -> Self {
        self.0.headers.push((name.to_string(), value.to_string()));
        self
    }

    fn json_body(mut self, body: serde_json::Value) -> Self {
        self.0.body = Some(body);
        self
    }

    fn build(self) -> Self::Response {
        self.0
    }
}

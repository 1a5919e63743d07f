use std::collections::HashMap;

/// Framework-neutral view of an inbound request.
///
/// Generators read input such as the mobile number from it, processors read
/// the client's answer fields.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    method: String,
    path: String,
    remote_addr: Option<String>,
    params: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            remote_addr: None,
            params: HashMap::new(),
        }
    }

    pub fn with_remote_addr(mut self, remote_addr: Option<String>) -> Self {
        self.remote_addr = remote_addr;
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Merge parameters; existing names are kept.
    pub fn extend_params<I>(&mut self, params: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in params {
            self.params.entry(name).or_insert(value);
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn remote_addr(&self) -> Option<&str> {
        self.remote_addr.as_deref()
    }

    /// Trimmed parameter value; blank values count as missing.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

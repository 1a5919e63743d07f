//! Binding of challenges to the client through a session cookie.

use bastion_core::{AuthRequest, OwnerKey};

/// Name and attributes of the cookie carrying the owner key.
#[derive(Debug, Clone)]
pub struct OwnerSession {
    cookie_name: String,
    secure: bool,
}

impl OwnerSession {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            secure: false,
        }
    }

    /// Adds the `Secure` attribute to issued cookies.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Owner key presented by the client, if any and well formed.
    pub fn owner<R: AuthRequest>(&self, request: &R) -> Option<OwnerKey> {
        let value = request.cookie(&self.cookie_name)?;
        OwnerKey::parse(value).ok()
    }

    /// The presented owner key, or a fresh one together with the
    /// `Set-Cookie` value that hands it to the client.
    pub fn owner_or_new<R: AuthRequest>(&self, request: &R) -> (OwnerKey, Option<String>) {
        match self.owner(request) {
            Some(owner) => (owner, None),
            None => {
                let owner = OwnerKey::new();
                let cookie = self.set_cookie(&owner);
                (owner, Some(cookie))
            }
        }
    }

    fn set_cookie(&self, owner: &OwnerKey) -> String {
        let mut cookie = format!("{}={}; HttpOnly; SameSite=Lax; Path=/", self.cookie_name, owner);
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

impl Default for OwnerSession {
    fn default() -> Self {
        Self::new("bastion_session")
    }
}

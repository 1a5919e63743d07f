use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthorizeError {
    /// The deployment never supplied a role permission table.
    #[error("Role based authorization is not configured")]
    Unconfigured,
    #[error("Permission table unavailable: {0}")]
    StoreUnavailable(String),
}

impl PartialEq for AuthorizeError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Unconfigured, Self::Unconfigured)
                | (Self::StoreUnavailable(_), Self::StoreUnavailable(_))
        )
    }
}

/// Why the authorization filter refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizeDenial {
    Unauthenticated,
    Forbidden,
    Unconfigured,
    StoreUnavailable,
}

impl From<&AuthorizeError> for AuthorizeDenial {
    fn from(error: &AuthorizeError) -> Self {
        match error {
            AuthorizeError::Unconfigured => Self::Unconfigured,
            AuthorizeError::StoreUnavailable(_) => Self::StoreUnavailable,
        }
    }
}

impl AuthorizeDenial {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::Unconfigured => "unconfigured",
            Self::StoreUnavailable => "store_unavailable",
        }
    }

    pub fn client_message(&self) -> &'static str {
        match self {
            Self::Unauthenticated | Self::Forbidden => "access denied or not logged in",
            Self::Unconfigured => "authorization is not configured",
            Self::StoreUnavailable => "authorization service unavailable",
        }
    }
}

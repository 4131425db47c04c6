use actix_web::{error, http::StatusCode, HttpResponse, HttpResponseBuilder};
use derive_more::{Display, Error};
use serde_json::{json, Map, Value};

/// Why no identity could be established for a request.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AuthenticationFailure {
    #[display("No request object")]
    NoRequest,
    #[display("No identity header")]
    MissingIdentity,
    #[display("Identity header is not valid JSON")]
    MalformedIdentity,
    #[display("No authorized user.")]
    EmptyIdentity,
}

/// The field or type a `Forbidden` error was raised for.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DeniedTarget {
    #[display("field {_0}")]
    Field(String),
    #[display("type {_0}")]
    Type(String),
}

impl DeniedTarget {
    /// Name of the denied field or type.
    pub fn name(&self) -> &str {
        match self {
            DeniedTarget::Field(name) | DeniedTarget::Type(name) => name,
        }
    }
}

/// Authorization failure raised by a directive gate.
///
/// `Authentication` means the caller has no usable identity at all,
/// `Forbidden` means the identity exists but misses the required roles
/// or scopes of a specific field or type.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum AuthError {
    #[display("{_0}")]
    Authentication(#[error(not(source))] AuthenticationFailure),
    #[display("You are not authorized for this resource")]
    Forbidden {
        #[error(not(source))]
        target: DeniedTarget,
    },
}

impl AuthError {
    pub fn forbidden_field(name: impl Into<String>) -> Self {
        AuthError::Forbidden {
            target: DeniedTarget::Field(name.into()),
        }
    }

    pub fn forbidden_type(name: impl Into<String>) -> Self {
        AuthError::Forbidden {
            target: DeniedTarget::Type(name.into()),
        }
    }

    /// GraphQL error code, as used in the `extensions.code` entry.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Authentication(_) => "UNAUTHENTICATED",
            AuthError::Forbidden { .. } => "FORBIDDEN",
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, AuthError::Authentication(_))
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, AuthError::Forbidden { .. })
    }

    /// Returns the denied field or type, for `Forbidden` errors.
    pub fn denied_target(&self) -> Option<&DeniedTarget> {
        match self {
            AuthError::Forbidden { target } => Some(target),
            AuthError::Authentication(_) => None,
        }
    }

    /// Error extensions: the code, plus `field` or `type` for `Forbidden`.
    pub fn extensions(&self) -> Map<String, Value> {
        let mut extensions = Map::new();
        extensions.insert("code".to_string(), json!(self.code()));
        match self.denied_target() {
            Some(DeniedTarget::Field(name)) => {
                extensions.insert("field".to_string(), json!(name));
            }
            Some(DeniedTarget::Type(name)) => {
                extensions.insert("type".to_string(), json!(name));
            }
            None => {}
        }
        extensions
    }
}

impl From<AuthenticationFailure> for AuthError {
    fn from(failure: AuthenticationFailure) -> Self {
        AuthError::Authentication(failure)
    }
}

impl error::ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponseBuilder::new(self.status_code()).body(self.to_string())
    }
}

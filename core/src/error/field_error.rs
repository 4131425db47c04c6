use derive_more::{Display, Error, From};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::AuthError;

/// Error returned by a field resolver.
///
/// Resolvers return `Result<Value, FieldError>`, so authorization
/// failures propagate with `?` unchanged.
#[derive(Debug, Clone, PartialEq, Display, Error, From)]
pub enum FieldError {
    #[display("{_0}")]
    Auth(AuthError),
    #[display("{message}")]
    #[from(ignore)]
    Resolver {
        #[error(not(source))]
        message: String,
    },
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        FieldError::Resolver {
            message: message.into(),
        }
    }

    /// Returns the authorization failure, if this error is one.
    pub fn as_auth(&self) -> Option<&AuthError> {
        match self {
            FieldError::Auth(err) => Some(err),
            FieldError::Resolver { .. } => None,
        }
    }

    pub fn extensions(&self) -> Map<String, Value> {
        match self {
            FieldError::Auth(err) => err.extensions(),
            FieldError::Resolver { .. } => {
                let mut extensions = Map::new();
                extensions.insert("code".to_string(), json!("INTERNAL_SERVER_ERROR"));
                extensions
            }
        }
    }
}

/// One step of a response path: a field name or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// A located error in an execution response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQLError {
    pub message: String,
    pub path: Vec<PathSegment>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extensions: Map<String, Value>,
    #[serde(skip)]
    pub source: FieldError,
}

impl GraphQLError {
    pub fn new(source: FieldError, path: Vec<PathSegment>) -> Self {
        GraphQLError {
            message: source.to_string(),
            extensions: source.extensions(),
            path,
            source,
        }
    }

    /// Error code from the extensions, if any.
    pub fn code(&self) -> Option<&str> {
        self.extensions.get("code").and_then(Value::as_str)
    }
}

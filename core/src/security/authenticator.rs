//! Header-based identity extraction.

use serde_json::Value;

use crate::error::{AuthError, AuthenticationFailure};
use crate::security::carrier::HeaderSource;
use crate::security::config::{DirectiveConfig, DEFAULT_REQUIRED_SCOPE};
use crate::security::identity::Identity;

/// Trait for extracting the caller's identity from a request.
///
/// `carrier` is `None` when the resolver context has no request attached.
pub trait Authenticator {
    /// Extracts the identity, or the reason none could be established.
    fn authenticate(&self, carrier: Option<&dyn HeaderSource>) -> Result<Identity, AuthError>;

    /// Scopes required by a `@hasScope` declared without scopes.
    fn default_scopes(&self) -> Vec<String> {
        vec![DEFAULT_REQUIRED_SCOPE.to_string()]
    }
}

/// Reads the identity from a JSON payload in a request header.
///
/// # Example
/// ```
/// use std::collections::HashMap;
/// use graphql_auth_core::security::{Authenticator, DirectiveConfig, HeaderAuthenticator};
///
/// let authenticator = HeaderAuthenticator::new(DirectiveConfig::new());
///
/// let mut headers = HashMap::new();
/// headers.insert("x-user".to_string(), r#"{"roles":["admin"]}"#.to_string());
///
/// let identity = authenticator.authenticate(Some(&headers)).unwrap();
/// assert!(identity.has_role("admin"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct HeaderAuthenticator {
    config: DirectiveConfig,
}

impl HeaderAuthenticator {
    pub fn new(config: DirectiveConfig) -> Self {
        HeaderAuthenticator { config }
    }

    pub fn config(&self) -> &DirectiveConfig {
        &self.config
    }
}

impl Authenticator for HeaderAuthenticator {
    fn authenticate(&self, carrier: Option<&dyn HeaderSource>) -> Result<Identity, AuthError> {
        let carrier = carrier.ok_or(AuthenticationFailure::NoRequest)?;

        let header = self.config.get_identity_header();
        let raw = carrier.header(header).ok_or_else(|| {
            log::debug!("identity header {} missing", header);
            AuthenticationFailure::MissingIdentity
        })?;

        let payload: Value = serde_json::from_str(raw).map_err(|e| {
            log::debug!("identity header {} is not valid JSON: {}", header, e);
            AuthenticationFailure::MalformedIdentity
        })?;

        if is_falsy(&payload) {
            return Err(AuthenticationFailure::EmptyIdentity.into());
        }

        let identity = Identity::from_value(payload).ok_or_else(|| {
            log::debug!("identity header {} is not a JSON object", header);
            AuthenticationFailure::EmptyIdentity
        })?;

        Ok(identity
            .role_claim_key(self.config.get_role_claim_key())
            .scope_claim_key(self.config.get_scope_claim_key()))
    }

    fn default_scopes(&self) -> Vec<String> {
        self.config.get_default_scopes().to_vec()
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

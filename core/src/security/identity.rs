//! Identity model for authorization decisions.
//!
//! An [`Identity`] wraps the claims parsed from the identity header. Role
//! and scope claims are resolved lazily, once, from the claim-key override
//! if configured, else from the first non-empty conventional claim.

use std::fmt;
use std::sync::OnceLock;

use serde_json::{Map, Value};

use crate::security::config::{ROLE_CLAIM_FALLBACKS, SCOPE_CLAIM_FALLBACKS};

/// Immutable view of the caller's claims.
///
/// # Example
/// ```
/// use graphql_auth_core::security::Identity;
/// use serde_json::json;
///
/// let identity = Identity::from_value(json!({
///     "roles": ["admin", "user"],
///     "scope": "User:Read Item:Read",
/// }))
/// .unwrap();
///
/// assert!(identity.has_roles(&["admin"]));
/// assert!(identity.has_scopes(&["Item:Read", "Item:Create"]));
/// assert!(!identity.has_scopes(&["User:Create"]));
/// ```
#[derive(Debug)]
pub struct Identity {
    claims: Map<String, Value>,
    role_claim_key: Option<String>,
    scope_claim_key: Option<String>,
    role_claims: OnceLock<Vec<String>>,
    scope_claims: OnceLock<Vec<String>>,
}

impl Identity {
    /// Creates an identity resolving roles and scopes from the
    /// conventional claim names.
    pub fn new(claims: Map<String, Value>) -> Self {
        Identity {
            claims,
            role_claim_key: None,
            scope_claim_key: None,
            role_claims: OnceLock::new(),
            scope_claims: OnceLock::new(),
        }
    }

    /// Creates an identity from a parsed payload.
    ///
    /// Returns `None` unless the payload is a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(claims) => Some(Self::new(claims)),
            _ => None,
        }
    }

    /// Reads roles only from `key` (builder pattern).
    pub fn role_claim_key(mut self, key: Option<&str>) -> Self {
        self.role_claim_key = key.map(str::to_string);
        self.role_claims = OnceLock::new();
        self
    }

    /// Reads scopes only from `key` (builder pattern).
    pub fn scope_claim_key(mut self, key: Option<&str>) -> Self {
        self.scope_claim_key = key.map(str::to_string);
        self.scope_claims = OnceLock::new();
        self
    }

    /// Returns all claims of the payload.
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// Returns a single claim.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// Returns the role claims, resolved on first use.
    pub fn role_claims(&self) -> &[String] {
        self.role_claims.get_or_init(|| {
            resolve_claims(
                &self.claims,
                self.role_claim_key.as_deref(),
                ROLE_CLAIM_FALLBACKS,
            )
        })
    }

    /// Returns the scope claims, resolved on first use.
    pub fn scope_claims(&self) -> &[String] {
        self.scope_claims.get_or_init(|| {
            resolve_claims(
                &self.claims,
                self.scope_claim_key.as_deref(),
                SCOPE_CLAIM_FALLBACKS,
            )
        })
    }

    /// Checks if the identity has a specific role.
    pub fn has_role(&self, role: &str) -> bool {
        self.role_claims().iter().any(|r| r == role)
    }

    /// Checks if the identity has ANY of the specified roles (OR logic).
    pub fn has_roles<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|role| self.has_role(role.as_ref()))
    }

    /// Checks if the identity has a specific scope.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope_claims().iter().any(|s| s == scope)
    }

    /// Checks if the identity has ANY of the specified scopes (OR logic).
    pub fn has_scopes<S: AsRef<str>>(&self, scopes: &[S]) -> bool {
        scopes.iter().any(|scope| self.has_scope(scope.as_ref()))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Identity {{ roles: {:?}, scopes: {:?} }}",
            self.role_claims(),
            self.scope_claims()
        )
    }
}

/// Looks up the override key alone when set, else the first non-empty
/// fallback claim.
fn resolve_claims(
    claims: &Map<String, Value>,
    override_key: Option<&str>,
    fallbacks: &[&str],
) -> Vec<String> {
    match override_key {
        Some(key) => claims.get(key).and_then(claim_values).unwrap_or_default(),
        None => fallbacks
            .iter()
            .find_map(|key| claims.get(*key).and_then(claim_values))
            .unwrap_or_default(),
    }
}

/// Reads a claim as a list of strings; `None` for absent or empty values.
///
/// A string claim is split on whitespace (`"scope": "read write"`).
fn claim_values(value: &Value) -> Option<Vec<String>> {
    let values: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Value::String(s) => s.split_whitespace().map(str::to_string).collect(),
        _ => return None,
    };

    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

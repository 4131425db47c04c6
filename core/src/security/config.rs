//! Directive configuration.
//!
//! Claim-key overrides and defaults are passed explicitly when the schema
//! is built. [`DirectiveConfig::from_env`] is the one place the process
//! environment is consulted.

use std::env;

/// Header carrying the JSON identity payload.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-user";

/// Environment variable overriding the claim holding roles.
pub const ROLE_KEY_ENV: &str = "AUTH_DIRECTIVES_ROLE_KEY";

/// Environment variable overriding the claim holding scopes.
pub const SCOPE_KEY_ENV: &str = "AUTH_DIRECTIVES_SCOPE_KEY";

/// Scopes required by `@hasScope` when none are declared.
///
/// No identity is expected to carry it, so an unconfigured `@hasScope`
/// denies every request.
pub const DEFAULT_REQUIRED_SCOPE: &str = "none:read";

/// Claim names searched for roles, in order, when no override is set.
pub const ROLE_CLAIM_FALLBACKS: &[&str] = &["groups", "Roles", "roles", "Role", "role"];

/// Claim names searched for scopes, in order, when no override is set.
pub const SCOPE_CLAIM_FALLBACKS: &[&str] = &[
    "scp",
    "permissions",
    "Permissions",
    "Scopes",
    "scopes",
    "Scope",
    "scope",
];

/// Configuration shared by all directive gates of a schema.
///
/// # Example
/// ```
/// use graphql_auth_core::security::DirectiveConfig;
///
/// let config = DirectiveConfig::new()
///     .identity_header("x-identity")
///     .role_claim_key("https://example.com/roles")
///     .default_scopes(&["api:read"]);
///
/// assert_eq!(config.get_identity_header(), "x-identity");
/// assert_eq!(config.get_role_claim_key(), Some("https://example.com/roles"));
/// assert_eq!(config.get_scope_claim_key(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveConfig {
    identity_header: String,
    role_claim_key: Option<String>,
    scope_claim_key: Option<String>,
    default_scopes: Vec<String>,
}

impl DirectiveConfig {
    /// Creates a configuration with the default header, no claim-key
    /// overrides and `["none:read"]` as default scopes.
    pub fn new() -> Self {
        DirectiveConfig {
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
            role_claim_key: None,
            scope_claim_key: None,
            default_scopes: vec![DEFAULT_REQUIRED_SCOPE.to_string()],
        }
    }

    /// Creates a configuration with claim-key overrides read from
    /// `AUTH_DIRECTIVES_ROLE_KEY` and `AUTH_DIRECTIVES_SCOPE_KEY`.
    ///
    /// Unset or empty variables leave the fallback search in place.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        config.role_claim_key = non_empty_var(ROLE_KEY_ENV);
        config.scope_claim_key = non_empty_var(SCOPE_KEY_ENV);
        config
    }

    /// Sets the header carrying the identity payload (default: `x-user`).
    pub fn identity_header(mut self, header: &str) -> Self {
        self.identity_header = header.to_string();
        self
    }

    /// Reads roles from this claim only, skipping the fallback list.
    pub fn role_claim_key(mut self, key: &str) -> Self {
        self.role_claim_key = Some(key.to_string());
        self
    }

    /// Reads scopes from this claim only, skipping the fallback list.
    pub fn scope_claim_key(mut self, key: &str) -> Self {
        self.scope_claim_key = Some(key.to_string());
        self
    }

    /// Scopes required by a `@hasScope` declared without arguments.
    pub fn default_scopes(mut self, scopes: &[&str]) -> Self {
        self.default_scopes = scopes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn get_identity_header(&self) -> &str {
        &self.identity_header
    }

    pub fn get_role_claim_key(&self) -> Option<&str> {
        self.role_claim_key.as_deref()
    }

    pub fn get_scope_claim_key(&self) -> Option<&str> {
        self.scope_claim_key.as_deref()
    }

    pub fn get_default_scopes(&self) -> &[String] {
        &self.default_scopes
    }
}

impl Default for DirectiveConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

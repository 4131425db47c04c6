//! Request-scoped resolver context.
//!
//! One [`ResolverContext`] is created per request and passed mutably down
//! the resolution chain. The first gate to run extracts the identity and
//! caches it here; every later gate of the same request reuses it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use actix_web::dev::Extensions;

use crate::error::AuthError;
use crate::security::authenticator::Authenticator;
use crate::security::carrier::HeaderSource;
use crate::security::gate::Requirement;
use crate::security::identity::Identity;

/// A type-level gate: directive name, type name and what it requires.
type DecisionKey = (String, String, Requirement);

/// Per-request state shared by resolvers and directive gates.
///
/// # Example
/// ```
/// use std::collections::HashMap;
/// use std::sync::Arc;
/// use graphql_auth_core::security::{HeaderAuthenticator, ResolverContext};
///
/// let mut headers = HashMap::new();
/// headers.insert("x-user".to_string(), r#"{"roles":["admin"]}"#.to_string());
///
/// let mut ctx = ResolverContext::new(Arc::new(HeaderAuthenticator::default()))
///     .with_request(headers);
///
/// assert!(ctx.identity().is_none());
/// let identity = ctx.authenticate().unwrap();
/// assert!(identity.has_role("admin"));
/// assert!(ctx.identity().is_some());
/// ```
pub struct ResolverContext {
    carrier: Option<Box<dyn HeaderSource>>,
    authenticator: Arc<dyn Authenticator + Send + Sync>,
    identity: Option<Arc<Identity>>,
    decisions: HashMap<DecisionKey, bool>,
    default_scopes: Vec<String>,
    data: Extensions,
}

impl ResolverContext {
    /// Creates a context with no request attached.
    ///
    /// Default scopes come from the authenticator.
    pub fn new(authenticator: Arc<dyn Authenticator + Send + Sync>) -> Self {
        ResolverContext {
            carrier: None,
            default_scopes: authenticator.default_scopes(),
            authenticator,
            identity: None,
            decisions: HashMap::new(),
            data: Extensions::new(),
        }
    }

    /// Attaches the request the identity header is read from.
    pub fn with_request<R: HeaderSource + 'static>(mut self, request: R) -> Self {
        self.carrier = Some(Box::new(request));
        self
    }

    /// Scopes required by a `#[has_scope]` resolver declared without scopes.
    pub fn with_default_scopes(mut self, scopes: &[String]) -> Self {
        self.default_scopes = scopes.to_vec();
        self
    }

    /// Adds application data (builder pattern).
    pub fn with_data<T: 'static>(mut self, value: T) -> Self {
        self.data.insert(value);
        self
    }

    /// Returns the attached request, if any.
    pub fn request(&self) -> Option<&dyn HeaderSource> {
        self.carrier.as_deref()
    }

    pub fn default_scopes(&self) -> &[String] {
        &self.default_scopes
    }

    /// Returns the identity extracted earlier in this request.
    pub fn identity(&self) -> Option<&Arc<Identity>> {
        self.identity.as_ref()
    }

    /// Injects an identity, e.g. one established by an outer layer.
    pub fn set_identity(&mut self, identity: Arc<Identity>) {
        self.identity = Some(identity);
    }

    /// Returns the cached identity, extracting it on first use.
    ///
    /// Failures are not cached: a later call extracts again.
    pub fn authenticate(&mut self) -> Result<Arc<Identity>, AuthError> {
        if let Some(identity) = &self.identity {
            return Ok(Arc::clone(identity));
        }

        let identity = Arc::new(self.authenticator.authenticate(self.request())?);
        self.identity = Some(Arc::clone(&identity));
        Ok(identity)
    }

    /// Returns the decision already taken for a type-level directive.
    ///
    /// Two directives of the same name on one type are told apart by
    /// their requirement.
    pub fn decision(
        &self,
        directive: &str,
        type_name: &str,
        requirement: &Requirement,
    ) -> Option<bool> {
        self.decisions
            .get(&decision_key(directive, type_name, requirement))
            .copied()
    }

    /// Records the decision of a type-level directive for this request.
    pub fn record_decision(
        &mut self,
        directive: &str,
        type_name: &str,
        requirement: &Requirement,
        allowed: bool,
    ) {
        self.decisions
            .insert(decision_key(directive, type_name, requirement), allowed);
    }

    /// Returns application data of type `T`.
    pub fn data<T: 'static>(&self) -> Option<&T> {
        self.data.get::<T>()
    }

    /// Returns application data of type `T` mutably.
    pub fn data_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.data.get_mut::<T>()
    }

    /// Inserts application data, returning the previous value of that type.
    pub fn insert_data<T: 'static>(&mut self, value: T) -> Option<T> {
        self.data.insert(value)
    }
}

fn decision_key(directive: &str, type_name: &str, requirement: &Requirement) -> DecisionKey {
    (
        directive.to_string(),
        type_name.to_string(),
        requirement.clone(),
    )
}

impl fmt::Debug for ResolverContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverContext")
            .field("has_request", &self.carrier.is_some())
            .field("identity", &self.identity)
            .field("decisions", &self.decisions)
            .finish()
    }
}

//! Authorization gates wrapping field resolvers.
//!
//! A [`Gate`] is the runtime form of one directive on one field or type.
//! [`wrap`] composes it with the field's resolver once, at schema-build
//! time; the returned resolver runs the check before delegating.

use std::fmt;
use std::sync::Arc;

use crate::directive::AuthDirective;
use crate::error::{AuthError, DeniedTarget};
use crate::schema::resolver::{default_resolver, resolver, Resolver};
use crate::security::config::DirectiveConfig;
use crate::security::context::ResolverContext;
use crate::security::identity::Identity;

/// What an identity must carry to pass a gate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// Any identity passes.
    Authenticated,
    /// ANY of these roles.
    Roles(Vec<String>),
    /// ANY of these scopes.
    Scopes(Vec<String>),
}

impl Requirement {
    pub fn roles(roles: &[&str]) -> Self {
        Requirement::Roles(roles.iter().map(|r| r.to_string()).collect())
    }

    pub fn scopes(scopes: &[&str]) -> Self {
        Requirement::Scopes(scopes.iter().map(|s| s.to_string()).collect())
    }

    /// Evaluates the requirement (any-of semantics).
    pub fn is_satisfied_by(&self, identity: &Identity) -> bool {
        match self {
            Requirement::Authenticated => true,
            Requirement::Roles(roles) => identity.has_roles(roles.as_slice()),
            Requirement::Scopes(scopes) => identity.has_scopes(scopes.as_slice()),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Authenticated => write!(f, "authenticated"),
            Requirement::Roles(roles) => write!(f, "any role of {:?}", roles),
            Requirement::Scopes(scopes) => write!(f, "any scope of {:?}", scopes),
        }
    }
}

/// One directive applied to one field or type.
///
/// # Example
/// ```
/// use std::collections::HashMap;
/// use std::sync::Arc;
/// use graphql_auth_core::security::{Gate, HeaderAuthenticator, Requirement, ResolverContext};
///
/// let gate = Gate::field("hasRole", Requirement::roles(&["admin"]), "deleteUser");
///
/// let mut headers = HashMap::new();
/// headers.insert("x-user".to_string(), r#"{"roles":["user"]}"#.to_string());
/// let mut ctx = ResolverContext::new(Arc::new(HeaderAuthenticator::default()))
///     .with_request(headers);
///
/// let err = gate.enforce(&mut ctx).unwrap_err();
/// assert!(err.is_forbidden());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate {
    directive: String,
    requirement: Requirement,
    target: DeniedTarget,
}

impl Gate {
    pub fn new(directive: &str, requirement: Requirement, target: DeniedTarget) -> Self {
        Gate {
            directive: directive.to_string(),
            requirement,
            target,
        }
    }

    /// Gate on a single field.
    pub fn field(directive: &str, requirement: Requirement, field_name: &str) -> Self {
        Self::new(directive, requirement, DeniedTarget::Field(field_name.to_string()))
    }

    /// Gate applied to every field of a type.
    pub fn object(directive: &str, requirement: Requirement, type_name: &str) -> Self {
        Self::new(directive, requirement, DeniedTarget::Type(type_name.to_string()))
    }

    /// Builds the gate for a schema directive; `@hasScope` without scopes
    /// requires the configured default scopes.
    pub fn for_directive(
        directive: &AuthDirective,
        target: DeniedTarget,
        config: &DirectiveConfig,
    ) -> Self {
        Self::new(directive.name(), directive.requirement(config), target)
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    pub fn target(&self) -> &DeniedTarget {
        &self.target
    }

    /// Runs the check, returning the identity to resolve with.
    ///
    /// Authentication failures propagate unchanged. A type-level gate
    /// records its decision on the context and reuses it for the sibling
    /// fields of the same request; each field still gets the outcome.
    pub fn enforce(&self, ctx: &mut ResolverContext) -> Result<Arc<Identity>, AuthError> {
        let identity = ctx.authenticate()?;

        let allowed = match &self.target {
            DeniedTarget::Type(type_name) => {
                match ctx.decision(&self.directive, type_name, &self.requirement) {
                    Some(allowed) => allowed,
                    None => {
                        let allowed = self.requirement.is_satisfied_by(&identity);
                        ctx.record_decision(&self.directive, type_name, &self.requirement, allowed);
                        allowed
                    }
                }
            }
            DeniedTarget::Field(_) => self.requirement.is_satisfied_by(&identity),
        };

        if allowed {
            log::trace!("@{} granted on {}", self.directive, self.target);
            Ok(identity)
        } else {
            log::debug!(
                "@{} denied on {}: requires {}",
                self.directive,
                self.target,
                self.requirement
            );
            Err(AuthError::Forbidden {
                target: self.target.clone(),
            })
        }
    }
}

/// Wraps a resolver with a gate.
///
/// Without an inner resolver the field resolves to `parent[field]`.
pub fn wrap(gate: Gate, inner: Option<Resolver>) -> Resolver {
    let gate = Arc::new(gate);
    resolver(move |params| {
        let gate = Arc::clone(&gate);
        let inner = inner.clone();
        Box::pin(async move {
            gate.enforce(params.ctx)?;
            match inner {
                Some(next) => next(params).await,
                None => Ok(default_resolver(params.parent, &params.info.field_name)),
            }
        })
    })
}

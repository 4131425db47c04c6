//! Declarative authorization directives for GraphQL schemas.
//!
//! Three directives guard field resolution:
//!
//! | Directive | Check |
//! |-----------|-------|
//! | `@isAuthenticated` | an identity can be extracted from the request |
//! | `@hasRole(roles: [String])` | the identity carries ANY of the roles |
//! | `@hasScope(scopes: [String])` | the identity carries ANY of the scopes |
//!
//! The identity is read from a JSON payload in a request header (`x-user`
//! by default), extracted once per request and cached on the
//! [`ResolverContext`](security::ResolverContext).
//!
//! # Example
//! ```ignore
//! use graphql_auth_core::directive::AuthDirective;
//! use graphql_auth_core::schema::{Field, ObjectType, Schema};
//! use graphql_auth_core::security::DirectiveConfig;
//!
//! let schema = Schema::builder(DirectiveConfig::from_env())
//!     .object(
//!         ObjectType::new("Query").field(
//!             Field::new("userById", "User")
//!                 .resolver(resolve_user)
//!                 .directive(AuthDirective::has_scope(&["User:Read"])),
//!         ),
//!     )
//!     .build();
//! ```

pub mod directive;
pub mod error;
pub mod schema;
pub mod security;

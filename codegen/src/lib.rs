//! Attribute macros guarding individual resolver functions.
//!
//! The macros mirror the schema directives for resolvers written as
//! plain functions:
//!
//! | Schema directive | Macro |
//! |------------------|-------|
//! | `@isAuthenticated` | `#[is_authenticated]` |
//! | `@hasRole(roles: ["admin"])` | `#[has_role("admin")]` |
//! | `@hasScope(scopes: ["User:Read"])` | `#[has_scope("User:Read")]` |
//! | `@hasScope` | `#[has_scope]` |
//!
//! # Usage
//!
//! ```ignore
//! use graphql_auth_codegen::{has_role, has_scope};
//! use graphql_auth_core::schema::{FieldResult, ResolveParams};
//! use graphql_auth_core::security::ResolverContext;
//! use serde_json::json;
//!
//! // Resolver taking the full resolution arguments
//! #[has_scope("User:Read")]
//! async fn user_by_id(params: ResolveParams<'_>) -> FieldResult {
//!     Ok(json!({ "id": params.arg_str("userId") }))
//! }
//!
//! // Plain function taking the context; denials name the function
//! #[has_role("admin", "auditor")]
//! fn audit_log(ctx: &mut ResolverContext) -> FieldResult {
//!     Ok(json!([]))
//! }
//! ```

use proc_macro::TokenStream;

mod directive;
mod helpers;

/// Requires a valid identity.
///
/// # Usage
/// ```ignore
/// #[is_authenticated]
/// async fn me(params: ResolveParams<'_>) -> FieldResult {
///     let identity = params.ctx.identity().cloned();
///     Ok(json!(identity.map(|i| i.to_string())))
/// }
/// ```
#[proc_macro_attribute]
pub fn is_authenticated(attrs: TokenStream, input: TokenStream) -> TokenStream {
    directive::is_authenticated_impl(attrs, input)
}

/// Requires ANY of the listed roles.
///
/// # Usage
/// ```ignore
/// #[has_role("admin", "user")]
/// async fn users(params: ResolveParams<'_>) -> FieldResult {
///     Ok(json!([]))
/// }
/// ```
///
/// At least one role must be given.
#[proc_macro_attribute]
pub fn has_role(attrs: TokenStream, input: TokenStream) -> TokenStream {
    directive::has_role_impl(attrs, input)
}

/// Requires ANY of the listed scopes.
///
/// Without arguments the context's default scopes apply
/// (`["none:read"]` unless configured otherwise).
///
/// # Usage
/// ```ignore
/// #[has_scope("User:Create")]
/// async fn create_user(params: ResolveParams<'_>) -> FieldResult {
///     Ok(json!({ "id": params.arg_str("id") }))
/// }
/// ```
#[proc_macro_attribute]
pub fn has_scope(attrs: TokenStream, input: TokenStream) -> TokenStream {
    directive::has_scope_impl(attrs, input)
}

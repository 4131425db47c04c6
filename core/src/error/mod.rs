//! Error types raised by the authorization directives and resolvers.

mod auth_error;
mod field_error;

pub use auth_error::{AuthError, AuthenticationFailure, DeniedTarget};
pub use field_error::{FieldError, GraphQLError, PathSegment};

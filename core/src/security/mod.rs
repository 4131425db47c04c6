//! Identity extraction and authorization gates.
//!
//! # Module Structure
//!
//! - `config` - Directive configuration (identity header, claim-key overrides)
//! - `identity` - Identity model with lazily resolved role/scope claims
//! - `carrier` - Request types the identity header can be read from
//! - `authenticator` - Header-based identity extraction
//! - `context` - Request-scoped resolver context
//! - `gate` - Authorization gates and resolver wrapping

pub use authenticator::{Authenticator, HeaderAuthenticator};
pub use carrier::HeaderSource;
pub use config::DirectiveConfig;
pub use context::ResolverContext;
pub use gate::{wrap, Gate, Requirement};
pub use identity::Identity;

pub mod authenticator;
pub mod carrier;
pub mod config;
pub mod context;
pub mod gate;
pub mod identity;

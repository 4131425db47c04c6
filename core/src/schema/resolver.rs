//! Resolver function types.

use std::sync::Arc;

use futures_util::future::LocalBoxFuture;
use serde_json::{Map, Value};

use crate::error::{FieldError, PathSegment};
use crate::security::ResolverContext;

/// Result of a single resolution step.
pub type FieldResult = Result<Value, FieldError>;

/// A field resolver: `(parent, arguments, context, info) -> value`.
pub type Resolver =
    Arc<dyn for<'a> Fn(ResolveParams<'a>) -> LocalBoxFuture<'a, FieldResult> + Send + Sync>;

/// Where in the response a field is being resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolveInfo {
    pub parent_type: String,
    pub field_name: String,
    pub return_type: String,
    pub path: Vec<PathSegment>,
}

impl ResolveInfo {
    pub fn new(parent_type: &str, field_name: &str, return_type: &str) -> Self {
        ResolveInfo {
            parent_type: parent_type.to_string(),
            field_name: field_name.to_string(),
            return_type: return_type.to_string(),
            path: vec![PathSegment::Field(field_name.to_string())],
        }
    }
}

/// Arguments of a resolution step.
pub struct ResolveParams<'a> {
    /// Value resolved for the parent object (`null` at the root).
    pub parent: &'a Value,
    pub args: &'a Map<String, Value>,
    pub ctx: &'a mut ResolverContext,
    pub info: &'a ResolveInfo,
}

impl ResolveParams<'_> {
    /// Returns a string argument.
    pub fn arg_str(&self, name: &str) -> Option<&str> {
        self.args.get(name).and_then(Value::as_str)
    }
}

/// Boxes an async resolver.
///
/// # Example
/// ```ignore
/// let resolve = resolver(|params| Box::pin(async move {
///     Ok(json!({ "id": params.arg_str("userId") }))
/// }));
/// ```
pub fn resolver<F>(f: F) -> Resolver
where
    F: for<'a> Fn(ResolveParams<'a>) -> LocalBoxFuture<'a, FieldResult> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Boxes a synchronous resolver.
pub fn sync_resolver<F>(f: F) -> Resolver
where
    F: for<'a> Fn(ResolveParams<'a>) -> FieldResult + Send + Sync + 'static,
{
    resolver(move |params| {
        let result = f(params);
        Box::pin(async move { result })
    })
}

/// Resolver used for fields without one: reads `parent[field]`.
pub fn default_resolver(parent: &Value, field_name: &str) -> Value {
    parent.get(field_name).cloned().unwrap_or(Value::Null)
}

//! Schema model with directive-wrapped resolvers.
//!
//! Object types and fields are declared with builders, each optionally
//! annotated with [`AuthDirective`]s. [`SchemaBuilder::build`] installs the
//! gates once: type-level gates wrap every field of the type, field-level
//! gates wrap outermost so they run first.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::directive::{auth_directive_sdl, AuthDirective};
use crate::error::{DeniedTarget, FieldError, PathSegment};
use crate::security::gate::{wrap, Gate};
use crate::security::{DirectiveConfig, HeaderAuthenticator, HeaderSource, ResolverContext};

pub use executor::{ExecutionRequest, OperationType, Response, Selection};
pub use resolver::{
    default_resolver, resolver, sync_resolver, FieldResult, ResolveInfo, ResolveParams, Resolver,
};

mod executor;
pub mod resolver;

/// A field of an object type.
///
/// # Example
/// ```ignore
/// let field = Field::new("createUser", "User")
///     .resolver(create_user)
///     .directive(AuthDirective::has_scope(&["User:Create"]));
/// ```
#[derive(Clone)]
pub struct Field {
    name: String,
    ty: String,
    resolver: Option<Resolver>,
    directives: Vec<AuthDirective>,
}

impl Field {
    /// `ty` is the return type as written in SDL, e.g. `User`, `[Item]`, `ID!`.
    pub fn new(name: &str, ty: &str) -> Self {
        Field {
            name: name.to_string(),
            ty: ty.to_string(),
            resolver: None,
            directives: Vec::new(),
        }
    }

    pub fn resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn directive(mut self, directive: AuthDirective) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An object type and its fields.
#[derive(Clone)]
pub struct ObjectType {
    name: String,
    fields: Vec<Field>,
    directives: Vec<AuthDirective>,
}

impl ObjectType {
    pub fn new(name: &str) -> Self {
        ObjectType {
            name: name.to_string(),
            fields: Vec::new(),
            directives: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Annotates the type; the directive applies to each of its fields.
    pub fn directive(mut self, directive: AuthDirective) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Collects object types, then installs the directive gates.
pub struct SchemaBuilder {
    config: DirectiveConfig,
    types: Vec<ObjectType>,
}

impl SchemaBuilder {
    pub fn new(config: DirectiveConfig) -> Self {
        SchemaBuilder {
            config,
            types: Vec::new(),
        }
    }

    /// Adds an object type. A type added twice keeps the last definition.
    pub fn object(mut self, object: ObjectType) -> Self {
        if let Some(pos) = self.types.iter().position(|t| t.name == object.name) {
            log::warn!("object type {} defined twice, replacing", object.name);
            self.types.remove(pos);
        }
        self.types.push(object);
        self
    }

    pub fn build(self) -> Schema {
        let mut types = HashMap::new();

        for object in &self.types {
            let fields = object
                .fields
                .iter()
                .map(|field| {
                    let mut resolver = field.resolver.clone();
                    for directive in &object.directives {
                        let target = DeniedTarget::Type(object.name.clone());
                        let gate = Gate::for_directive(directive, target, &self.config);
                        resolver = Some(wrap(gate, resolver));
                    }
                    for directive in &field.directives {
                        let target = DeniedTarget::Field(field.name.clone());
                        let gate = Gate::for_directive(directive, target, &self.config);
                        resolver = Some(wrap(gate, resolver));
                    }
                    (
                        field.name.clone(),
                        InstalledField {
                            return_type: field.ty.clone(),
                            resolver,
                        },
                    )
                })
                .collect();
            types.insert(object.name.clone(), fields);
        }

        Schema {
            authenticator: Arc::new(HeaderAuthenticator::new(self.config.clone())),
            config: self.config,
            definitions: self.types,
            types,
        }
    }
}

struct InstalledField {
    return_type: String,
    resolver: Option<Resolver>,
}

/// A built schema: field resolvers with their gates installed.
pub struct Schema {
    config: DirectiveConfig,
    authenticator: Arc<HeaderAuthenticator>,
    definitions: Vec<ObjectType>,
    types: HashMap<String, HashMap<String, InstalledField>>,
}

impl Schema {
    pub fn builder(config: DirectiveConfig) -> SchemaBuilder {
        SchemaBuilder::new(config)
    }

    pub fn config(&self) -> &DirectiveConfig {
        &self.config
    }

    /// Creates a context for a request without headers.
    pub fn context(&self) -> ResolverContext {
        ResolverContext::new(self.authenticator.clone())
    }

    /// Creates the context for one request.
    pub fn context_for<R: HeaderSource + 'static>(&self, request: R) -> ResolverContext {
        self.context().with_request(request)
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Runs the resolution step of one field, gates included.
    pub async fn resolve_field(
        &self,
        type_name: &str,
        field_name: &str,
        parent: &Value,
        args: &Map<String, Value>,
        ctx: &mut ResolverContext,
    ) -> FieldResult {
        let path = vec![PathSegment::Field(field_name.to_string())];
        self.resolve_at(type_name, field_name, parent, args, ctx, path)
            .await
    }

    async fn resolve_at(
        &self,
        type_name: &str,
        field_name: &str,
        parent: &Value,
        args: &Map<String, Value>,
        ctx: &mut ResolverContext,
        path: Vec<PathSegment>,
    ) -> FieldResult {
        let field = self.installed(type_name, field_name)?;
        let info = ResolveInfo {
            parent_type: type_name.to_string(),
            field_name: field_name.to_string(),
            return_type: field.return_type.clone(),
            path,
        };

        match &field.resolver {
            Some(resolve) => {
                resolve(ResolveParams {
                    parent,
                    args,
                    ctx,
                    info: &info,
                })
                .await
            }
            None => Ok(default_resolver(parent, field_name)),
        }
    }

    fn installed(&self, type_name: &str, field_name: &str) -> Result<&InstalledField, FieldError> {
        self.types
            .get(type_name)
            .and_then(|fields| fields.get(field_name))
            .ok_or_else(|| {
                FieldError::new(format!(
                    "Cannot query field \"{}\" on type \"{}\"",
                    field_name, type_name
                ))
            })
    }

    /// Return type of a field as declared, e.g. `[User]`.
    fn return_type(&self, type_name: &str, field_name: &str) -> Option<&str> {
        self.installed(type_name, field_name)
            .ok()
            .map(|field| field.return_type.as_str())
    }

    /// Named object type returned by a field, if it is one of this schema's.
    fn object_return_type(&self, type_name: &str, field_name: &str) -> Option<&str> {
        let return_type = self.return_type(type_name, field_name)?;
        let named = return_type.trim_matches(|c| c == '[' || c == ']' || c == '!');
        if self.types.contains_key(named) {
            Some(named)
        } else {
            None
        }
    }

    /// Renders the directive declarations and the annotated types as SDL.
    pub fn sdl(&self) -> String {
        let mut sdl = auth_directive_sdl(&self.config);
        for object in &self.definitions {
            let _ = write!(sdl, "\n\ntype {}", object.name);
            for directive in &object.directives {
                let _ = write!(sdl, " {}", directive);
            }
            sdl.push_str(" {");
            for field in &object.fields {
                let _ = write!(sdl, "\n  {}: {}", field.name, field.ty);
                for directive in &field.directives {
                    let _ = write!(sdl, " {}", directive);
                }
            }
            sdl.push_str("\n}");
        }
        sdl
    }
}

//! Selection execution.
//!
//! Walks an already-parsed selection tree against a [`Schema`]: fields are
//! resolved in order, nested selections are completed against the
//! field's object type, and failed fields resolve to `null` with an error
//! recorded at their path.

use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FieldError, GraphQLError, PathSegment};
use crate::schema::Schema;
use crate::security::ResolverContext;

/// Root operation of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Query,
    Mutation,
}

impl OperationType {
    /// Name of the root object type.
    pub fn root_type(&self) -> &'static str {
        match self {
            OperationType::Query => "Query",
            OperationType::Mutation => "Mutation",
        }
    }
}

/// A field selection with its arguments and sub-selection.
///
/// # Example
/// ```
/// use graphql_auth_core::schema::Selection;
///
/// // { userById(userId: "123456") { id name } }
/// let selection = Selection::field("userById")
///     .arg("userId", "123456")
///     .fields(&["id", "name"]);
///
/// assert_eq!(selection.selection.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub arguments: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selection: Vec<Selection>,
}

impl Selection {
    pub fn field(name: &str) -> Self {
        Selection {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    pub fn arg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.to_string(), value.into());
        self
    }

    pub fn select(mut self, selection: Selection) -> Self {
        self.selection.push(selection);
        self
    }

    /// Selects leaf fields by name.
    pub fn fields(mut self, names: &[&str]) -> Self {
        self.selection
            .extend(names.iter().map(|name| Selection::field(name)));
        self
    }

    /// Key of this field in the response object.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Request body accepted by HTTP integrations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub operation: OperationType,
    pub selection: Vec<Selection>,
}

/// Execution result: data plus located errors.
#[derive(Debug, Serialize)]
pub struct Response {
    pub data: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
}

impl Response {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Schema {
    /// Executes a selection set against the operation's root type.
    pub async fn execute(
        &self,
        operation: OperationType,
        selection: &[Selection],
        ctx: &mut ResolverContext,
    ) -> Response {
        let root = operation.root_type();
        let mut errors = Vec::new();

        if !self.has_type(root) {
            errors.push(GraphQLError::new(
                FieldError::new(format!("Schema does not define the {} type", root)),
                Vec::new(),
            ));
            return Response {
                data: Value::Null,
                errors,
            };
        }

        let data = self
            .execute_selection(root, &Value::Null, selection, ctx, Vec::new(), &mut errors)
            .await;
        Response { data, errors }
    }

    /// Executes a request body.
    pub async fn execute_request(
        &self,
        request: &ExecutionRequest,
        ctx: &mut ResolverContext,
    ) -> Response {
        self.execute(request.operation, &request.selection, ctx)
            .await
    }

    fn execute_selection<'a>(
        &'a self,
        type_name: &'a str,
        parent: &'a Value,
        selection: &'a [Selection],
        ctx: &'a mut ResolverContext,
        path: Vec<PathSegment>,
        errors: &'a mut Vec<GraphQLError>,
    ) -> LocalBoxFuture<'a, Value> {
        Box::pin(async move {
            let mut object = Map::new();

            for field in selection {
                let key = field.response_key().to_string();
                let mut field_path = path.clone();
                field_path.push(PathSegment::Field(key.clone()));

                let object_type = self.object_return_type(type_name, &field.name);
                if object_type.is_some() && field.selection.is_empty() {
                    let err = FieldError::new(format!(
                        "Field \"{}\" of type \"{}\" must have a selection of subfields.",
                        field.name,
                        self.return_type(type_name, &field.name).unwrap_or_default()
                    ));
                    errors.push(GraphQLError::new(err, field_path));
                    object.insert(key, Value::Null);
                    continue;
                }

                let resolved = self
                    .resolve_at(
                        type_name,
                        &field.name,
                        parent,
                        &field.arguments,
                        &mut *ctx,
                        field_path.clone(),
                    )
                    .await;

                let value = match (resolved, object_type) {
                    (Ok(value), Some(object_type)) => {
                        self.complete(
                            object_type,
                            value,
                            &field.selection,
                            &mut *ctx,
                            field_path,
                            &mut *errors,
                        )
                        .await
                    }
                    (Ok(value), None) => value,
                    (Err(err), _) => {
                        log::debug!("field {} failed: {}", key, err);
                        errors.push(GraphQLError::new(err, field_path));
                        Value::Null
                    }
                };

                object.insert(key, value);
            }

            Value::Object(object)
        })
    }

    /// Completes an object (or list of objects) against its sub-selection.
    fn complete<'a>(
        &'a self,
        type_name: &'a str,
        value: Value,
        selection: &'a [Selection],
        ctx: &'a mut ResolverContext,
        path: Vec<PathSegment>,
        errors: &'a mut Vec<GraphQLError>,
    ) -> LocalBoxFuture<'a, Value> {
        Box::pin(async move {
            match value {
                Value::Array(items) => {
                    let mut completed = Vec::with_capacity(items.len());
                    for (index, item) in items.into_iter().enumerate() {
                        let mut item_path = path.clone();
                        item_path.push(PathSegment::Index(index));
                        completed.push(
                            self.complete(
                                type_name,
                                item,
                                selection,
                                &mut *ctx,
                                item_path,
                                &mut *errors,
                            )
                            .await,
                        );
                    }
                    Value::Array(completed)
                }
                Value::Object(_) => {
                    self.execute_selection(type_name, &value, selection, ctx, path, errors)
                        .await
                }
                other => other,
            }
        })
    }
}

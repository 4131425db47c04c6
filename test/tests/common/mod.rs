//! Common test utilities and configuration.
//!
//! This module provides shared test infrastructure including:
//! - A users/items test schema with call counters
//! - Test app builder
//! - Request helpers

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::{get, post, test, web, App, HttpRequest, HttpResponse, Responder};
use serde_json::{json, Value};

use graphql_auth_codegen::{has_role, has_scope, is_authenticated};
use graphql_auth_core::directive::AuthDirective;
use graphql_auth_core::error::AuthError;
use graphql_auth_core::schema::{
    resolver, sync_resolver, ExecutionRequest, Field, FieldResult, ObjectType, ResolveParams,
    Schema,
};
use graphql_auth_core::security::{DirectiveConfig, ResolverContext};

// =============================================================================
// Test Configuration
// =============================================================================

/// Counts how often each resolver body ran.
#[derive(Default)]
pub struct Calls {
    pub user_by_id: AtomicUsize,
    pub create_user: AtomicUsize,
    pub items: AtomicUsize,
}

impl Calls {
    pub fn user_by_id(&self) -> usize {
        self.user_by_id.load(Ordering::SeqCst)
    }

    pub fn create_user(&self) -> usize {
        self.create_user.load(Ordering::SeqCst)
    }

    pub fn items(&self) -> usize {
        self.items.load(Ordering::SeqCst)
    }
}

/// Scopes of a caller allowed to read and create everything.
pub const ALL_SCOPES: [&str; 4] = ["User:Read", "Item:Read", "User:Create", "Item:Create"];

/// Builds the `x-user` header value.
pub fn user(roles: &[&str], scopes: &[&str]) -> Value {
    json!({ "roles": roles, "scopes": scopes })
}

fn calls(ctx: &ResolverContext) -> Arc<Calls> {
    ctx.data::<Arc<Calls>>().cloned().unwrap_or_default()
}

// =============================================================================
// Test Resolvers
// =============================================================================

#[has_scope("User:Create")]
async fn create_user(params: ResolveParams<'_>) -> FieldResult {
    calls(params.ctx).create_user.fetch_add(1, Ordering::SeqCst);
    Ok(json!({
        "id": params.arg_str("id"),
        "name": params.arg_str("name"),
        "email": "new@example.com"
    }))
}

#[has_role("admin")]
async fn delete_user(params: ResolveParams<'_>) -> FieldResult {
    Ok(json!(params.arg_str("id").is_some()))
}

#[is_authenticated]
fn whoami(ctx: &mut ResolverContext) -> FieldResult {
    Ok(json!(ctx.identity().and_then(|i| i.claim("sub").cloned())))
}

#[has_scope]
async fn health(_params: ResolveParams<'_>) -> FieldResult {
    Ok(json!("ok"))
}

/// Test schema:
///
/// ```graphql
/// type Query {
///   userById(userId: ID!): User @hasScope(scopes: ["User:Read"])
///   items: [Item] @hasScope(scopes: ["Item:Read"]) @isAuthenticated
///   admins: [User] @hasRole(roles: ["admin"])
///   whoami: String       # #[is_authenticated]
///   health: String       # #[has_scope]
///   public: String
/// }
///
/// type Mutation {
///   createUser(id: ID!, name: String!): User   # #[has_scope("User:Create")]
///   deleteUser(id: ID!): Boolean               # #[has_role("admin")]
/// }
///
/// type User @hasRole(roles: ["admin", "user"]) {
///   id: ID!
///   name: String
///   email: String @hasScope(scopes: ["User:Email"])
/// }
///
/// type Item @isAuthenticated { id: ID! name: String }
/// ```
pub fn test_schema(config: DirectiveConfig) -> Schema {
    Schema::builder(config)
        .object(
            ObjectType::new("Query")
                .field(
                    Field::new("userById", "User")
                        .resolver(sync_resolver(|params| {
                            calls(params.ctx).user_by_id.fetch_add(1, Ordering::SeqCst);
                            Ok(json!({
                                "id": params.arg_str("userId"),
                                "name": "Bob",
                                "email": "bob@example.com"
                            }))
                        }))
                        .directive(AuthDirective::has_scope(&["User:Read"])),
                )
                .field(
                    Field::new("items", "[Item]")
                        .resolver(sync_resolver(|params| {
                            calls(params.ctx).items.fetch_add(1, Ordering::SeqCst);
                            Ok(json!([
                                {"id": "1", "name": "Keyboard"},
                                {"id": "2", "name": "Monitor"}
                            ]))
                        }))
                        .directive(AuthDirective::has_scope(&["Item:Read"]))
                        .directive(AuthDirective::is_authenticated()),
                )
                .field(
                    Field::new("admins", "[User]")
                        .resolver(sync_resolver(|_| Ok(json!([{"id": "0", "name": "root"}]))))
                        .directive(AuthDirective::has_role(&["admin"])),
                )
                .field(
                    Field::new("whoami", "String")
                        .resolver(sync_resolver(|params| whoami(params.ctx))),
                )
                .field(
                    Field::new("health", "String")
                        .resolver(resolver(|params| Box::pin(health(params)))),
                )
                .field(
                    Field::new("public", "String")
                        .resolver(sync_resolver(|_| Ok(json!("hello")))),
                ),
        )
        .object(
            ObjectType::new("Mutation")
                .field(
                    Field::new("createUser", "User")
                        .resolver(resolver(|params| Box::pin(create_user(params)))),
                )
                .field(
                    Field::new("deleteUser", "Boolean")
                        .resolver(resolver(|params| Box::pin(delete_user(params)))),
                ),
        )
        .object(
            ObjectType::new("User")
                .directive(AuthDirective::has_role(&["admin", "user"]))
                .field(Field::new("id", "ID!"))
                .field(Field::new("name", "String"))
                .field(
                    Field::new("email", "String")
                        .directive(AuthDirective::has_scope(&["User:Email"])),
                ),
        )
        .object(
            ObjectType::new("Item")
                .directive(AuthDirective::is_authenticated())
                .field(Field::new("id", "ID!"))
                .field(Field::new("name", "String")),
        )
        .build()
}

// =============================================================================
// Test Handlers
// =============================================================================

#[post("/graphql")]
async fn graphql(
    req: HttpRequest,
    schema: web::Data<Schema>,
    calls: web::Data<Calls>,
    body: web::Json<ExecutionRequest>,
) -> impl Responder {
    let mut ctx = schema
        .context_for(req)
        .with_data(calls.into_inner());
    HttpResponse::Ok().json(schema.execute_request(&body, &mut ctx).await)
}

#[get("/me")]
async fn me(req: HttpRequest, schema: web::Data<Schema>) -> Result<HttpResponse, AuthError> {
    let mut ctx = schema.context_for(req);
    let identity = ctx.authenticate()?;
    Ok(HttpResponse::Ok().json(identity.claims()))
}

#[get("/schema")]
async fn sdl(schema: web::Data<Schema>) -> impl Responder {
    HttpResponse::Ok().body(schema.sdl())
}

// =============================================================================
// Test App
// =============================================================================

/// Creates the test app with the default configuration.
pub async fn create_test_app() -> (
    impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    Arc<Calls>,
) {
    create_test_app_with(DirectiveConfig::new()).await
}

/// Creates the test app with a custom configuration.
pub async fn create_test_app_with(
    config: DirectiveConfig,
) -> (
    impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    Arc<Calls>,
) {
    let calls = web::Data::new(Calls::default());
    let counters = calls.clone().into_inner();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_schema(config)))
            .app_data(calls)
            .service(graphql)
            .service(me)
            .service(sdl),
    )
    .await;

    (app, counters)
}

/// Builds a `POST /graphql` request, with `x-user` set when given.
pub fn graphql_request(user: Option<&Value>, body: Value) -> actix_http::Request {
    let mut req = test::TestRequest::post().uri("/graphql").set_json(body);
    if let Some(user) = user {
        req = req.insert_header(("x-user", user.to_string()));
    }
    req.to_request()
}

/// `{"operation": "query", "selection": [...]}`
pub fn query(selection: Value) -> Value {
    json!({ "operation": "query", "selection": selection })
}

/// `{"operation": "mutation", "selection": [...]}`
pub fn mutation(selection: Value) -> Value {
    json!({ "operation": "mutation", "selection": selection })
}

/// Error codes of a response, in order.
pub fn error_codes(response: &Value) -> Vec<String> {
    response["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["extensions"]["code"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

//! Type-level directive tests.
//!
//! A directive on an object type guards each of its fields; the decision
//! is computed once per request but every field still reports it.

mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::{create_test_app, error_codes, graphql_request, query};

fn user_fields(fields: &[&str]) -> Value {
    let selection: Vec<Value> = fields.iter().map(|f| json!({"name": f})).collect();
    query(json!([{
        "name": "userById",
        "arguments": {"userId": "42"},
        "selection": selection
    }]))
}

#[actix_web::test]
async fn test_type_directive_denies_every_field() {
    let (app, calls) = create_test_app().await;
    let caller = json!({"roles": ["guest"], "scopes": ["User:Read"]});

    let resp: Value = test::call_and_read_body_json(
        &app,
        graphql_request(Some(&caller), user_fields(&["id", "name"])),
    )
    .await;

    assert_eq!(
        resp["data"],
        json!({"userById": {"id": null, "name": null}})
    );
    assert_eq!(error_codes(&resp), vec!["FORBIDDEN", "FORBIDDEN"]);
    assert_eq!(resp["errors"][0]["extensions"]["type"], "User");
    assert_eq!(resp["errors"][0]["path"], json!(["userById", "id"]));
    assert_eq!(resp["errors"][1]["path"], json!(["userById", "name"]));
    assert_eq!(calls.user_by_id(), 1);
}

#[actix_web::test]
async fn test_field_directive_inside_allowed_type() {
    let (app, _) = create_test_app().await;
    let caller = json!({"roles": ["user"], "scopes": ["User:Read"]});

    let resp: Value = test::call_and_read_body_json(
        &app,
        graphql_request(Some(&caller), user_fields(&["name", "email"])),
    )
    .await;

    assert_eq!(
        resp["data"],
        json!({"userById": {"name": "Bob", "email": null}})
    );
    assert_eq!(error_codes(&resp), vec!["FORBIDDEN"]);
    assert_eq!(resp["errors"][0]["extensions"]["field"], "email");
}

#[actix_web::test]
async fn test_field_and_type_directives_both_pass() {
    let (app, _) = create_test_app().await;
    let caller = json!({"roles": ["admin"], "scopes": ["User:Read", "User:Email"]});

    let resp: Value = test::call_and_read_body_json(
        &app,
        graphql_request(Some(&caller), user_fields(&["id", "email"])),
    )
    .await;

    assert_eq!(
        resp["data"],
        json!({"userById": {"id": "42", "email": "bob@example.com"}})
    );
}

#[actix_web::test]
async fn test_list_items_of_guarded_type() {
    let (app, _) = create_test_app().await;
    let caller = json!({"scopes": ["Item:Read"]});

    let body = query(json!([{"name": "items", "selection": [{"name": "id"}]}]));
    let resp: Value =
        test::call_and_read_body_json(&app, graphql_request(Some(&caller), body)).await;

    assert_eq!(resp["data"], json!({"items": [{"id": "1"}, {"id": "2"}]}));
}

#[actix_web::test]
async fn test_object_field_requires_subfields() {
    let (app, calls) = create_test_app().await;
    let caller = json!({"roles": ["guest"], "scopes": ["User:Read"]});

    let body = query(json!([{"name": "userById", "arguments": {"userId": "42"}}]));
    let resp: Value =
        test::call_and_read_body_json(&app, graphql_request(Some(&caller), body)).await;

    assert_eq!(resp["data"], json!({"userById": null}));
    assert_eq!(
        resp["errors"][0]["message"],
        r#"Field "userById" of type "User" must have a selection of subfields."#
    );
    assert_eq!(calls.user_by_id(), 0);
}

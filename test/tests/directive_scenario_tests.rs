//! End-to-end directive scenarios over HTTP.
//!
//! Covers the three reference scenarios: no identity, a fully scoped
//! caller, and a caller missing the mutation's scope.

mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::{create_test_app, error_codes, graphql_request, mutation, query, user, ALL_SCOPES};

fn user_by_id() -> Value {
    json!([{
        "name": "userById",
        "arguments": {"userId": "123456"},
        "selection": [{"name": "id"}, {"name": "name"}]
    }])
}

#[actix_web::test]
async fn test_no_identity_header_is_unauthenticated() {
    let (app, calls) = create_test_app().await;

    let req = graphql_request(None, query(user_by_id()));
    let resp: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp["data"], json!({"userById": null}));
    assert_eq!(error_codes(&resp), vec!["UNAUTHENTICATED"]);
    assert_eq!(resp["errors"][0]["path"], json!(["userById"]));
    assert_eq!(calls.user_by_id(), 0);
}

#[actix_web::test]
async fn test_fully_scoped_caller_succeeds() {
    let (app, calls) = create_test_app().await;
    let caller = user(&["admin", "user"], &ALL_SCOPES);

    let req = graphql_request(Some(&caller), query(user_by_id()));
    let resp: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        resp["data"],
        json!({"userById": {"id": "123456", "name": "Bob"}})
    );
    assert!(resp.get("errors").is_none());
    assert_eq!(calls.user_by_id(), 1);
}

#[actix_web::test]
async fn test_missing_create_scope_is_forbidden() {
    let (app, calls) = create_test_app().await;
    let caller = user(&["admin", "user"], &["User:Read", "Item:Read", "Item:Create"]);

    let body = mutation(json!([{
        "name": "createUser",
        "arguments": {"id": "1234", "name": "Bob"},
        "selection": [{"name": "id"}]
    }]));
    let resp: Value = test::call_and_read_body_json(&app, graphql_request(Some(&caller), body)).await;

    assert_eq!(resp["data"], json!({"createUser": null}));
    assert_eq!(error_codes(&resp), vec!["FORBIDDEN"]);
    assert_eq!(
        resp["errors"][0]["message"],
        "You are not authorized for this resource"
    );
    assert_eq!(resp["errors"][0]["extensions"]["field"], "createUser");
    assert_eq!(calls.create_user(), 0);
}

#[actix_web::test]
async fn test_create_scope_allows_mutation() {
    let (app, calls) = create_test_app().await;
    let caller = user(&["user"], &ALL_SCOPES);

    let body = mutation(json!([{
        "name": "createUser",
        "arguments": {"id": "1234", "name": "Bob"},
        "selection": [{"name": "id"}, {"name": "name"}]
    }]));
    let resp: Value = test::call_and_read_body_json(&app, graphql_request(Some(&caller), body)).await;

    assert_eq!(
        resp["data"],
        json!({"createUser": {"id": "1234", "name": "Bob"}})
    );
    assert_eq!(calls.create_user(), 1);
}

#[actix_web::test]
async fn test_malformed_identity_is_unauthenticated() {
    let (app, _) = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/graphql")
        .insert_header(("x-user", "{not json"))
        .set_json(query(user_by_id()))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(error_codes(&resp), vec!["UNAUTHENTICATED"]);
}

#[actix_web::test]
async fn test_empty_identity_is_unauthenticated() {
    let (app, _) = create_test_app().await;

    for payload in [json!(null), json!(""), json!(false)] {
        let req = graphql_request(Some(&payload), query(user_by_id()));
        let resp: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(error_codes(&resp), vec!["UNAUTHENTICATED"]);
        assert_eq!(resp["errors"][0]["message"], "No authorized user.");
    }
}

#[actix_web::test]
async fn test_unguarded_field_needs_no_identity() {
    let (app, _) = create_test_app().await;

    let req = graphql_request(None, query(json!([{"name": "public"}])));
    let resp: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp, json!({"data": {"public": "hello"}}));
}

//! Claim-key overrides read from the environment.
//!
//! Kept in its own test binary: it is the only test touching these
//! variables.

mod common;

use actix_web::test;
use serde_json::{json, Value};

use graphql_auth_core::security::config::{ROLE_KEY_ENV, SCOPE_KEY_ENV};
use graphql_auth_core::security::DirectiveConfig;

use common::{create_test_app_with, error_codes, graphql_request, query};

#[actix_web::test]
async fn test_env_overrides() {
    std::env::set_var(ROLE_KEY_ENV, "app_roles");
    std::env::set_var(SCOPE_KEY_ENV, "app_scopes");
    let config = DirectiveConfig::from_env();
    std::env::remove_var(ROLE_KEY_ENV);
    std::env::remove_var(SCOPE_KEY_ENV);

    assert_eq!(config.get_role_claim_key(), Some("app_roles"));
    assert_eq!(config.get_scope_claim_key(), Some("app_scopes"));

    let (app, _) = create_test_app_with(config).await;
    let body = query(json!([
        {"name": "admins", "selection": [{"name": "name"}]},
        {"name": "items", "selection": [{"name": "id"}]}
    ]));

    let caller = json!({"roles": ["admin"], "scopes": ["Item:Read"]});
    let resp: Value =
        test::call_and_read_body_json(&app, graphql_request(Some(&caller), body.clone())).await;
    assert_eq!(error_codes(&resp), vec!["FORBIDDEN", "FORBIDDEN"]);

    let caller = json!({"app_roles": ["admin"], "app_scopes": "Item:Read"});
    let resp: Value =
        test::call_and_read_body_json(&app, graphql_request(Some(&caller), body)).await;
    assert!(resp.get("errors").is_none());
}

//! Organization service against a scripted backend.

use std::time::Duration;

use desk_core::{Id, NewOrganization, OrganizationUpdate};
use desk_http::testing::{MockResponse, MockServer};
use desk_http::{ApiClient, ApiError};
use desk_org::{OrgError, OrganizationQuery, OrganizationService};
use desk_session::TokenStore;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn setup() -> (MockServer, OrganizationService) {
    let server = MockServer::start().unwrap();
    let api = ApiClient::new(
        &server.base_url(),
        Duration::from_secs(5),
        TokenStore::in_memory(),
    )
    .unwrap();
    (server, OrganizationService::new(api))
}

fn ok(data: Value) -> MockResponse {
    MockResponse::json(200, &json!({"success": true, "data": data}))
}

#[tokio::test]
async fn list_sends_filters_and_decodes_paginator() {
    let (server, orgs) = setup();
    server.mock(
        "GET",
        "/organisations",
        ok(json!({
            "data": [
                {"id": 1, "name": "Acme", "email": "hi@acme.test"},
                {"id": 2, "name": "Globex"}
            ],
            "current_page": 1,
            "last_page": 3,
            "per_page": 2,
            "total": 6
        })),
    );

    let query = OrganizationQuery {
        name: Some("ac".into()),
        email: Some(String::new()),
        ..OrganizationQuery::page(1, 2)
    };
    let page = orgs.list(&query).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 6);
    assert!(page.has_more());
    let pairs = server.requests()[0].query_pairs();
    let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["page", "per_page", "name"]);
}

#[tokio::test]
async fn list_accepts_bare_array() {
    let (server, orgs) = setup();
    server.mock(
        "GET",
        "/organisations",
        MockResponse::json(200, &json!([{"id": 1, "name": "Acme"}])),
    );

    let page = orgs.list(&OrganizationQuery::default()).await.unwrap();

    assert_eq!(page.items[0].name, "Acme");
    assert!(!page.has_more());
}

#[tokio::test]
async fn failed_list_uses_default_message() {
    let (server, orgs) = setup();
    server.mock(
        "GET",
        "/organisations",
        MockResponse::json(200, &json!({"success": false, "data": []})),
    );

    let err = orgs.list(&OrganizationQuery::default()).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to load organizations");
    assert_eq!(err.kind(), "rejected");
}

#[tokio::test]
async fn get_without_data_is_not_found() {
    let (server, orgs) = setup();
    server.mock(
        "GET",
        "/organisations/7",
        MockResponse::json(200, &json!({"success": true, "data": null})),
    );

    let err = orgs.get(&Id::from(7)).await.unwrap_err();

    assert!(matches!(err, OrgError::NotFound(ref id) if id == "7"));
}

#[tokio::test]
async fn create_posts_validated_payload() {
    let (server, orgs) = setup();
    server.mock(
        "POST",
        "/organisations",
        ok(json!({"id": 9, "name": "Initech", "email": "info@initech.test"})),
    );

    let new = NewOrganization::new(" Initech ", "info@initech.test")
        .unwrap()
        .with_phone("555-0100");
    let created = orgs.create(&new).await.unwrap();

    assert_eq!(created.id, Id::from(9));
    let body = server.requests_to("POST", "/organisations")[0].json();
    assert_eq!(
        body,
        Some(json!({"name": "Initech", "email": "info@initech.test", "phone": "555-0100"}))
    );
}

#[tokio::test]
async fn create_validation_error_surfaces_field_errors() {
    let (server, orgs) = setup();
    server.mock(
        "POST",
        "/organisations",
        MockResponse::json(
            422,
            &json!({
                "success": false,
                "message": "The given data was invalid.",
                "errors": {"email": ["The email must be a valid email address."]}
            }),
        ),
    );

    let new = NewOrganization::new("Initech", "not-an-email").unwrap();
    let err = orgs.create(&new).await.unwrap_err();

    assert!(matches!(err, OrgError::Api(ApiError::Http { status: 422, .. })));
    assert!(err.field_errors().unwrap().contains_key("email"));
}

#[tokio::test]
async fn update_sends_only_set_fields() {
    let (server, orgs) = setup();
    server.mock(
        "PUT",
        "/organisations/42",
        ok(json!({"id": 42, "name": "Acme", "email": "x@y.com"})),
    );

    let update = OrganizationUpdate {
        name: Some("Acme".into()),
        ..OrganizationUpdate::default()
    };
    let returned = orgs.update(&Id::from(42), &update).await.unwrap().unwrap();

    assert_eq!(returned.email.as_deref(), Some("x@y.com"));
    let body = server.requests_to("PUT", "/organisations/42")[0].json();
    assert_eq!(body, Some(json!({"name": "Acme"})));
}

#[tokio::test]
async fn rejected_update_has_descriptive_default() {
    let (server, orgs) = setup();
    server.mock(
        "PUT",
        "/organisations/42",
        MockResponse::json(200, &json!({"success": false})),
    );

    let err = orgs
        .update(&Id::from(42), &OrganizationUpdate::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to update organization");
}

#[tokio::test]
async fn delete_returns_server_message() {
    let (server, orgs) = setup();
    server.mock(
        "DELETE",
        "/organisations/3",
        MockResponse::json(200, &json!({"success": true, "message": "Organisation removed"})),
    );

    let message = orgs.delete(&Id::from(3)).await.unwrap();

    assert_eq!(message, "Organisation removed");
}

#[tokio::test]
async fn search_sends_q_and_limit() {
    let (server, orgs) = setup();
    server.mock(
        "GET",
        "/organisations/search",
        ok(json!([{"id": 1, "name": "Acme"}])),
    );

    let found = orgs.search("acme", 0).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(
        server.requests()[0].query_pairs(),
        vec![
            ("q".to_string(), "acme".to_string()),
            ("limit".to_string(), "10".to_string()),
        ]
    );
}

#[tokio::test]
async fn current_user_organization_may_be_absent() {
    let (server, orgs) = setup();
    server.mock(
        "GET",
        "/user/organisation",
        MockResponse::json(
            200,
            &json!({"success": true, "data": null, "message": "No organisation"}),
        ),
    );

    assert!(orgs.current_user_organization().await.unwrap().is_none());
}

#[tokio::test]
async fn string_ids_are_path_encoded() {
    let (server, orgs) = setup();
    server.mock(
        "GET",
        "/organisations/org%201",
        ok(json!({"id": "org 1", "name": "Spaced"})),
    );

    let org = orgs.get(&Id::from("org 1")).await.unwrap();

    assert_eq!(org.name, "Spaced");
}

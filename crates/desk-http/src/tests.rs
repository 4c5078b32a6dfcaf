use std::io::{BufRead, BufReader, Write};
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use desk_session::TokenStore;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::testing::{MockResponse, MockServer};
use crate::{ApiClient, ApiError, FileUpload, QueryParams};

fn jwt_expiring_in(secs: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + secs;
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"7","exp":{exp}}}"#));
    format!("{header}.{payload}.signature")
}

fn client_for(server: &MockServer, store: &TokenStore) -> ApiClient {
    ApiClient::new(&server.base_url(), Duration::from_secs(5), store.clone()).unwrap()
}

#[tokio::test]
async fn valid_token_is_sent_as_bearer() {
    let server = MockServer::start().unwrap();
    server.mock("GET", "/user", MockResponse::json(200, &json!({"success": true})));
    let store = TokenStore::in_memory();
    let token = jwt_expiring_in(3600);
    store.set_token(&token).unwrap();

    client_for(&server, &store)
        .get("/user", QueryParams::new())
        .await
        .unwrap();

    let requests = server.requests_to("GET", "/user");
    assert_eq!(requests.len(), 1);
    let expected = format!("Bearer {token}");
    assert_eq!(requests[0].header("authorization"), Some(expected.as_str()));
    assert_eq!(requests[0].header("accept"), Some("application/json"));
}

#[tokio::test]
async fn expired_token_is_not_sent_and_session_is_cleared() {
    let server = MockServer::start().unwrap();
    server.mock("GET", "/organisations", MockResponse::json(200, &json!([])));
    let store = TokenStore::in_memory();
    store.set_token(&jwt_expiring_in(-60)).unwrap();
    store.set_refresh_token(Some("r1")).unwrap();

    client_for(&server, &store)
        .get("/organisations", QueryParams::new())
        .await
        .unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].header("authorization").is_none());
    assert!(store.token().is_none());
    assert!(store.refresh_token().is_none());
}

#[tokio::test]
async fn unauthorized_clears_the_session() {
    let server = MockServer::start().unwrap();
    server.mock(
        "GET",
        "/user",
        MockResponse::json(401, &json!({"success": false, "message": "Token revoked"})),
    );
    let store = TokenStore::in_memory();
    store.set_token(&jwt_expiring_in(3600)).unwrap();

    let err = client_for(&server, &store)
        .get("/user", QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(err.to_string(), "authentication required");
    assert!(store.token().is_none());
}

#[tokio::test]
async fn http_error_uses_body_message_and_field_errors() {
    let server = MockServer::start().unwrap();
    server.mock(
        "POST",
        "/organisations",
        MockResponse::json(
            422,
            &json!({
                "success": false,
                "message": "The email has already been taken.",
                "errors": {"email": ["The email has already been taken."]}
            }),
        ),
    );
    let store = TokenStore::in_memory();

    let err = client_for(&server, &store)
        .post("/organisations", &json!({"name": "Acme", "email": "a@b.c"}))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(err.to_string(), "The email has already been taken.");
    let errors = err.field_errors().unwrap();
    assert_eq!(errors["email"], vec!["The email has already been taken.".to_string()]);
}

#[tokio::test]
async fn http_error_without_message_is_synthesized() {
    let server = MockServer::start().unwrap();
    server.mock("GET", "/organisations/9", MockResponse::text(500, "<h1>boom</h1>"));
    let store = TokenStore::in_memory();

    let err = client_for(&server, &store)
        .get("/organisations/9", QueryParams::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "http");
    assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
}

#[tokio::test]
async fn http_error_reads_message_from_body_without_success_key() {
    let server = MockServer::start().unwrap();
    server.mock(
        "POST",
        "/organisations",
        MockResponse::json(
            422,
            &json!({
                "message": "The name field is required.",
                "errors": {"name": ["required"]}
            }),
        ),
    );
    let store = TokenStore::in_memory();

    let err = client_for(&server, &store)
        .post("/organisations", &json!({"email": "a@b.c"}))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(err.to_string(), "The name field is required.");
    assert_eq!(err.field_errors().unwrap()["name"], vec!["required".to_string()]);
}

#[tokio::test]
async fn unauthorized_clears_the_session_before_the_body_arrives() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let stalling = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
            line.clear();
        }
        let head = concat!(
            "HTTP/1.1 401 Unauthorized\r\n",
            "Content-Type: application/json\r\n",
            "Content-Length: 64\r\n\r\n",
        );
        stream.write_all(head.as_bytes()).unwrap();
        stream.flush().unwrap();
        std::thread::sleep(Duration::from_secs(3));
    });

    let store = TokenStore::in_memory();
    store.set_token(&jwt_expiring_in(3600)).unwrap();
    let client = ApiClient::new(
        &format!("http://127.0.0.1:{port}/api"),
        Duration::from_secs(1),
        store.clone(),
    )
    .unwrap();

    let err = client.get("/user", QueryParams::new()).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert!(store.token().is_none());
    stalling.join().unwrap();
}

#[tokio::test]
async fn raw_json_is_wrapped_and_envelopes_pass_through() {
    let server = MockServer::start().unwrap();
    server.mock("GET", "/raw", MockResponse::json(200, &json!({"id": 1})));
    server.mock(
        "GET",
        "/envelope",
        MockResponse::json(200, &json!({"success": false, "message": "nope"})),
    );
    let store = TokenStore::in_memory();
    let client = client_for(&server, &store);

    let raw = client.get("/raw", QueryParams::new()).await.unwrap();
    assert!(raw.success);
    assert_eq!(raw.data, Some(json!({"id": 1})));

    let envelope = client.get("/envelope", QueryParams::new()).await.unwrap();
    assert!(!envelope.success);
    assert_eq!(envelope.message.as_deref(), Some("nope"));
}

#[tokio::test]
async fn non_json_success_becomes_minimal_envelope() {
    let server = MockServer::start().unwrap();
    server.mock("DELETE", "/organisations/3", MockResponse::text(200, "Deleted"));
    let store = TokenStore::in_memory();

    let envelope = client_for(&server, &store)
        .delete("/organisations/3")
        .await
        .unwrap();

    assert!(envelope.success);
    assert_eq!(envelope.message.as_deref(), Some("Deleted"));
    assert!(envelope.data.is_none());
}

#[tokio::test]
async fn unparseable_json_is_malformed() {
    let server = MockServer::start().unwrap();
    server.mock(
        "GET",
        "/user",
        MockResponse::raw(200, "application/json", "{not json"),
    );
    let store = TokenStore::in_memory();

    let err = client_for(&server, &store)
        .get("/user", QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::MalformedResponse(_)));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().unwrap();
    server.mock(
        "GET",
        "/slow",
        MockResponse::json(200, &json!({"success": true})).with_delay(Duration::from_secs(3)),
    );
    let store = TokenStore::in_memory();
    let client = ApiClient::new(&server.base_url(), Duration::from_secs(1), store).unwrap();

    let err = client.get("/slow", QueryParams::new()).await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout(d) if d == Duration::from_secs(1)));
}

#[tokio::test]
async fn closed_port_is_a_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ApiClient::new(
        &format!("http://127.0.0.1:{port}/api"),
        Duration::from_secs(2),
        TokenStore::in_memory(),
    )
    .unwrap();

    let err = client.get("/user", QueryParams::new()).await.unwrap_err();

    assert_eq!(err.kind(), "network");
}

#[tokio::test]
async fn query_is_percent_encoded_and_blanks_dropped() {
    let server = MockServer::start().unwrap();
    server.mock("GET", "/organisations", MockResponse::json(200, &json!([])));
    let store = TokenStore::in_memory();

    let query = QueryParams::new()
        .with("page", 2)
        .with("name", "")
        .with("search", "acme & co");
    client_for(&server, &store)
        .get("/organisations", query)
        .await
        .unwrap();

    let request = &server.requests()[0];
    assert_eq!(
        request.query_pairs(),
        vec![
            ("page".to_string(), "2".to_string()),
            ("search".to_string(), "acme & co".to_string()),
        ]
    );
}

#[tokio::test]
async fn json_bodies_carry_json_content_type() {
    let server = MockServer::start().unwrap();
    server.mock("PUT", "/organisations/42", MockResponse::json(200, &json!({"success": true})));
    let store = TokenStore::in_memory();

    client_for(&server, &store)
        .put("/organisations/42", &json!({"name": "Acme"}))
        .await
        .unwrap();

    let request = &server.requests_to("PUT", "/organisations/42")[0];
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.json(), Some(json!({"name": "Acme"})));
}

#[tokio::test]
async fn upload_sends_multipart_with_auth_and_fields() {
    let server = MockServer::start().unwrap();
    server.mock("POST", "/user/avatar", MockResponse::json(200, &json!({"success": true})));
    let store = TokenStore::in_memory();
    let token = jwt_expiring_in(3600);
    store.set_token(&token).unwrap();

    let file = FileUpload::new("avatar", "me.png", vec![0x89, b'P', b'N', b'G']);
    assert_eq!(file.mime, "image/png");
    client_for(&server, &store)
        .upload("/user/avatar", file, &[("crop".to_string(), "square".to_string())])
        .await
        .unwrap();

    let request = &server.requests_to("POST", "/user/avatar")[0];
    let content_type = request.header("content-type").unwrap();
    assert!(content_type.starts_with("multipart/form-data"), "{content_type}");
    let expected = format!("Bearer {token}");
    assert_eq!(request.header("authorization"), Some(expected.as_str()));
    let body = request.body_text();
    assert!(body.contains(r#"name="avatar"; filename="me.png""#));
    assert!(body.contains(r#"name="crop""#));
    assert!(body.contains("square"));
}

#[tokio::test]
async fn caller_headers_override_defaults() {
    let server = MockServer::start().unwrap();
    server.mock("GET", "/export", MockResponse::text(200, "a,b"));
    let store = TokenStore::in_memory();

    let mut options = crate::RequestOptions::default();
    options.headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("text/csv"),
    );
    client_for(&server, &store)
        .request(crate::Method::GET, "/export", options)
        .await
        .unwrap();

    assert_eq!(server.requests()[0].header("accept"), Some("text/csv"));
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let client = ApiClient::new(
        "http://localhost:8000/api/",
        Duration::from_secs(30),
        TokenStore::in_memory(),
    )
    .unwrap();
    assert_eq!(client.url("/login"), "http://localhost:8000/api/login");
    assert_eq!(client.url("login"), "http://localhost:8000/api/login");
}

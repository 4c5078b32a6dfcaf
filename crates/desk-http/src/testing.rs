//! Scripted HTTP backend for tests.
//!
//! [`MockServer`] binds `tiny_http` to `127.0.0.1:0`, answers each request
//! from a table of canned responses and records everything it receives.
//! Endpoints are registered relative to [`MockServer::base_url`], which ends
//! in `/api`.

use std::io::{self, Read as _};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde_json::Value;

const API_PREFIX: &str = "/api";

/// A canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    content_type: Option<&'static str>,
    body: Vec<u8>,
    delay: Option<Duration>,
}

impl MockResponse {
    /// A JSON body with `Content-Type: application/json`.
    #[must_use]
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            content_type: Some("application/json"),
            body: body.to_string().into_bytes(),
            delay: None,
        }
    }

    /// A plain-text body.
    #[must_use]
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("text/plain; charset=utf-8"),
            body: body.as_bytes().to_vec(),
            delay: None,
        }
    }

    /// Arbitrary bytes with an explicit content type.
    #[must_use]
    pub fn raw(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: Some(content_type),
            body: body.into(),
            delay: None,
        }
    }

    /// No body, no content type.
    #[must_use]
    pub const fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: Vec::new(),
            delay: None,
        }
    }

    /// Hold the response back for `delay` before sending it.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path relative to the `/api` prefix.
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// First header named `name`, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body parsed as JSON.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Percent-decoded query pairs in order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let Some(query) = self.query.as_deref() else {
            return Vec::new();
        };
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect()
    }
}

fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |s| s.into_owned())
}

struct Route {
    method: String,
    endpoint: String,
    response: MockResponse,
}

#[derive(Default)]
struct State {
    routes: Vec<Route>,
    requests: Vec<RecordedRequest>,
}

/// A scripted backend on a random local port.
pub struct MockServer {
    server: Arc<tiny_http::Server>,
    addr: SocketAddr,
    state: Arc<Mutex<State>>,
    worker: Option<JoinHandle<()>>,
}

impl MockServer {
    /// Bind and start answering requests on a background thread.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if no local port can be bound.
    pub fn start() -> io::Result<Self> {
        let server = tiny_http::Server::http("127.0.0.1:0").map_err(io::Error::other)?;
        let addr = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| io::Error::other("mock server did not bind a TCP address"))?;

        let server = Arc::new(server);
        let state = Arc::new(Mutex::new(State::default()));
        let worker = {
            let server = Arc::clone(&server);
            let state = Arc::clone(&state);
            thread::spawn(move || serve(&server, &state))
        };

        Ok(Self {
            server,
            addr,
            state,
            worker: Some(worker),
        })
    }

    /// `http://127.0.0.1:<port>/api`
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}{API_PREFIX}", self.addr)
    }

    /// Answer `method endpoint` with `response`. A later registration for
    /// the same route replaces the earlier one. Unmatched requests get a
    /// JSON 404.
    pub fn mock(&self, method: &str, endpoint: &str, response: MockResponse) {
        self.lock().routes.push(Route {
            method: method.to_ascii_uppercase(),
            endpoint: endpoint.to_string(),
            response,
        });
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests received for `method endpoint`.
    #[must_use]
    pub fn requests_to(&self, method: &str, endpoint: &str) -> Vec<RecordedRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method.eq_ignore_ascii_case(method) && r.path == endpoint)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn serve(server: &tiny_http::Server, state: &Mutex<State>) {
    for mut request in server.incoming_requests() {
        let mut body = Vec::new();
        let _ = request.as_reader().read_to_end(&mut body);

        let (path, query) = match request.url().split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (request.url().to_string(), None),
        };
        let path = path
            .strip_prefix(API_PREFIX)
            .map_or_else(|| path.clone(), str::to_string);

        let recorded = RecordedRequest {
            method: request.method().to_string().to_ascii_uppercase(),
            path,
            query,
            headers: request
                .headers()
                .iter()
                .map(|h| (h.field.to_string(), h.value.to_string()))
                .collect(),
            body,
        };

        let response = {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            let response = state
                .routes
                .iter()
                .rev()
                .find(|route| route.method == recorded.method && route.endpoint == recorded.path)
                .map(|route| route.response.clone());
            state.requests.push(recorded);
            response
        };

        let response = response.unwrap_or_else(|| {
            MockResponse::json(
                404,
                &serde_json::json!({"success": false, "message": "no mock for this route"}),
            )
        });

        if let Some(delay) = response.delay {
            thread::sleep(delay);
        }

        let mut reply =
            tiny_http::Response::from_data(response.body).with_status_code(response.status);
        if let Some(content_type) = response.content_type {
            if let Ok(header) = tiny_http::Header::from_bytes("Content-Type", content_type) {
                reply = reply.with_header(header);
            }
        }
        let _ = request.respond(reply);
    }
}

use std::path::Path;
use std::time::Duration;

use desk_core::ApiResponse;
use desk_session::TokenStore;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::decode::{decode_body, error_details, is_json_content_type};
use crate::error::ApiError;
use crate::query::QueryParams;

const APPLICATION_JSON: &str = "application/json";

/// Request body variants.
pub enum RequestBody {
    Json(Value),
    Multipart(reqwest::multipart::Form),
}

/// Per-request options for [`ApiClient::request`].
#[derive(Default)]
pub struct RequestOptions {
    /// Merged over the default `Content-Type`/`Accept` headers.
    pub headers: HeaderMap,
    pub query: QueryParams,
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    /// Options carrying a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if `body` does not serialize.
    pub fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("serialize body: {e}")))?;
        Ok(Self {
            body: Some(RequestBody::Json(value)),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn query(query: QueryParams) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }
}

/// A file to send as one part of a multipart upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// MIME type is guessed from the file name's extension.
    #[must_use]
    pub fn new(field: &str, file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            field: field.to_string(),
            file_name: file_name.to_string(),
            mime: guess_mime(file_name).to_string(),
            bytes,
        }
    }

    /// Read a file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the file cannot be read.
    pub async fn read(field: &str, path: &Path) -> Result<Self, ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin");
        Ok(Self::new(field, file_name, bytes))
    }
}

fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// HTTP client for the orgdesk backend.
///
/// Cheap to clone; clones share the connection pool and the token store.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    session: TokenStore,
}

impl ApiClient {
    /// Build a client for `base_url` with a fixed per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the underlying client cannot be built.
    pub fn new(base_url: &str, timeout: Duration, session: TokenStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("orgdesk/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout,
            session,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn session(&self) -> &TokenStore {
        &self.session
    }

    /// Base URL + endpoint.
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }

    /// Send one request and decode the response envelope.
    ///
    /// A valid stored token is attached as `Authorization: Bearer`. An expired
    /// stored token clears the session and the request goes out
    /// unauthenticated. A 401 clears the session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for timeouts, transport failures, 401, other
    /// non-2xx statuses and malformed bodies.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse<Value>, ApiError> {
        let mut url = self.url(endpoint);
        if !options.query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&options.query.encode());
        }

        let is_multipart = matches!(options.body, Some(RequestBody::Multipart(_)));
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        if !is_multipart {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        }
        // Caller headers replace defaults of the same name.
        headers.extend(options.headers);

        let token = self.session.valid_token();
        let authenticated = token.is_some();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::InvalidRequest(format!("authorization header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        tracing::debug!(%method, %url, authenticated, "sending request");

        let mut builder = self.http.request(method.clone(), &url).headers(headers);
        builder = match options.body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Multipart(form)) => builder.multipart(form),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| self.transport_error(&e))?;
        let result = self.handle_response(response).await;
        if let Err(error) = &result {
            tracing::warn!(%method, %url, kind = error.kind(), %error, "request failed");
        }
        result
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<ApiResponse<Value>, ApiError> {
        let status = response.status();
        // Before the body: a 401 clears the session even if the body never arrives.
        if status == StatusCode::UNAUTHORIZED {
            self.session.clear_quietly();
            return Err(ApiError::Unauthorized);
        }

        let is_json = is_json_content_type(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&e))?;

        if status.is_success() {
            return decode_body(status, is_json, &body);
        }

        let (message, errors) = error_details(is_json, &body);
        Err(ApiError::Http {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| {
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown Status")
                )
            }),
            errors,
        })
    }

    fn transport_error(&self, error: &reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else if error.is_builder() {
            ApiError::InvalidRequest(error.to_string())
        } else {
            ApiError::Network(error_chain(error))
        }
    }

    // --- Shorthands ---

    /// `GET` with query parameters.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn get(
        &self,
        endpoint: &str,
        query: QueryParams,
    ) -> Result<ApiResponse<Value>, ApiError> {
        self.request(Method::GET, endpoint, RequestOptions::query(query))
            .await
    }

    /// `POST` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<ApiResponse<Value>, ApiError> {
        self.request(Method::POST, endpoint, RequestOptions::json(body)?)
            .await
    }

    /// `PUT` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<ApiResponse<Value>, ApiError> {
        self.request(Method::PUT, endpoint, RequestOptions::json(body)?)
            .await
    }

    /// `PATCH` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<ApiResponse<Value>, ApiError> {
        self.request(Method::PATCH, endpoint, RequestOptions::json(body)?)
            .await
    }

    /// `DELETE` without a body.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn delete(&self, endpoint: &str) -> Result<ApiResponse<Value>, ApiError> {
        self.request(Method::DELETE, endpoint, RequestOptions::default())
            .await
    }

    /// Multipart `POST`: one file part plus extra text fields.
    ///
    /// # Errors
    ///
    /// See [`Self::request`]. Also [`ApiError::InvalidRequest`] for an
    /// unusable MIME type.
    pub async fn upload(
        &self,
        endpoint: &str,
        file: FileUpload,
        fields: &[(String, String)],
    ) -> Result<ApiResponse<Value>, ApiError> {
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)
            .map_err(|e| ApiError::InvalidRequest(format!("mime type: {e}")))?;
        let mut form = reqwest::multipart::Form::new().part(file.field, part);
        for (name, value) in fields {
            form = form.text(name.clone(), value.clone());
        }

        let options = RequestOptions {
            body: Some(RequestBody::Multipart(form)),
            ..RequestOptions::default()
        };
        self.request(Method::POST, endpoint, options).await
    }
}

/// `Display` of a reqwest error plus its sources.
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

//! HTTP binding of the book API.
//!
//! Routes live under `<api_url>/api`:
//!
//! ```text
//! GET  /getbooks        list_books
//! GET  /getbook/{id}    get_book
//! POST /addbook         create_book    (record)
//! POST /editbook        replace_book   (record + "id")
//! POST /deletebook      delete_book    ({"id": ...})
//! POST /login           {email, password} -> {access_token}
//! POST /register        {username, email, password}
//! ```

use super::BookRepository;
use crate::config::NessbookConfig;
use crate::error::{NessbookError, Result};
use crate::model::BookRecord;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const USER_AGENT: &str = concat!("nessbook/", env!("CARGO_PKG_VERSION"));

/// Unauthenticated access to the API: sign-in and registration.
pub trait AuthService {
    /// Exchanges credentials for a bearer token.
    fn login(&self, email: &str, password: &str) -> Result<String>;

    fn register(&self, username: &str, email: &str, password: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct BookEnvelope {
    book: Option<BookRecord>,
}

/// Shared HTTP plumbing: base URL and a configured client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(config: &NessbookConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| NessbookError::Network(e.to_string()))?;
        Ok(Self {
            base_url: api_root(&config.api_url),
            client,
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route.trim_start_matches('/'))
    }

    fn send(&self, request: RequestBuilder, route: &str) -> Result<Response> {
        log::debug!("api request route={}", route);
        request.send().map_err(|e| {
            log::warn!("api transport error route={} error={}", route, e);
            NessbookError::Network(e.to_string())
        })
    }

    /// Attaches a bearer credential, producing a book repository.
    pub fn authenticated(self, token: impl Into<String>) -> HttpRepository {
        HttpRepository {
            api: self,
            token: token.into(),
        }
    }
}

impl AuthService for ApiClient {
    fn login(&self, email: &str, password: &str) -> Result<String> {
        let request = self
            .client
            .post(self.url("login"))
            .json(&json!({ "email": email, "password": password }));
        let response = self.send(request, "login")?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(NessbookError::Validation(
                "Invalid email or password".to_string(),
            ));
        }
        let response = check_status(response, None)?;
        let body: LoginBody = response
            .json()
            .map_err(|e| NessbookError::Network(format!("unexpected login response: {}", e)))?;
        Ok(body.access_token)
    }

    fn register(&self, username: &str, email: &str, password: &str) -> Result<()> {
        let request = self.client.post(self.url("register")).json(&json!({
            "username": username,
            "email": email,
            "password": password,
        }));
        let response = self.send(request, "register")?;
        if response.status() == StatusCode::BAD_REQUEST {
            let message = error_message(response, StatusCode::BAD_REQUEST);
            return Err(NessbookError::Validation(message));
        }
        check_status(response, None)?;
        Ok(())
    }
}

/// Book repository backed by the remote API.
#[derive(Debug, Clone)]
pub struct HttpRepository {
    api: ApiClient,
    token: String,
}

impl HttpRepository {
    fn get(&self, route: &str) -> RequestBuilder {
        self.api.client.get(self.api.url(route)).bearer_auth(&self.token)
    }

    fn post(&self, route: &str, body: &Value) -> RequestBuilder {
        self.api
            .client
            .post(self.api.url(route))
            .bearer_auth(&self.token)
            .json(body)
    }
}

impl BookRepository for HttpRepository {
    fn list_books(&self) -> Result<Vec<BookRecord>> {
        let response = self.api.send(self.get("getbooks"), "getbooks")?;
        let response = check_status(response, None)?;
        let books: Vec<BookRecord> = response
            .json()
            .map_err(|e| NessbookError::Network(format!("unexpected book list: {}", e)))?;
        log::debug!("fetched {} books", books.len());
        Ok(books)
    }

    fn get_book(&self, id: &str) -> Result<BookRecord> {
        let route = format!("getbook/{}", id);
        let response = self.api.send(self.get(&route), "getbook")?;
        let response = check_status(response, Some(id))?;
        response
            .json()
            .map_err(|e| NessbookError::Network(format!("unexpected book: {}", e)))
    }

    fn create_book(&mut self, draft: &BookRecord) -> Result<BookRecord> {
        let body = serde_json::to_value(draft)?;
        let response = self.api.send(self.post("addbook", &body), "addbook")?;
        let response = check_status(response, None)?;
        Ok(created_book(&body_text(response)?, draft))
    }

    fn replace_book(&mut self, id: &str, record: &BookRecord) -> Result<Option<BookRecord>> {
        let body = edit_body(id, record)?;
        let response = self.api.send(self.post("editbook", &body), "editbook")?;
        let response = check_status(response, Some(id))?;
        Ok(envelope_book(&body_text(response)?, "editbook"))
    }

    fn delete_book(&mut self, id: &str) -> Result<()> {
        let body = json!({ "id": id });
        let response = self.api.send(self.post("deletebook", &body), "deletebook")?;
        check_status(response, Some(id))?;
        Ok(())
    }
}

/// `https://host/` -> `https://host/api`
fn api_root(api_url: &str) -> String {
    let root = api_url.trim().trim_end_matches('/');
    if root.ends_with("/api") {
        root.to_string()
    } else {
        format!("{}/api", root)
    }
}

/// The record as flat JSON, keyed by `id` instead of `_id`.
fn edit_body(id: &str, record: &BookRecord) -> Result<Value> {
    let mut body = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut body {
        map.remove("_id");
        map.insert("id".to_string(), Value::String(id.to_string()));
    }
    Ok(body)
}

fn body_text(response: Response) -> Result<String> {
    response
        .text()
        .map_err(|e| NessbookError::Network(format!("unreadable response: {}", e)))
}

/// The `book` of a `{"message": ..., "book": {...}}` reply, if there is one.
fn envelope_book(body: &str, route: &str) -> Option<BookRecord> {
    match serde_json::from_str::<BookEnvelope>(body) {
        Ok(envelope) => envelope.book,
        Err(e) => {
            log::warn!("{} returned an unexpected body: {}", route, e);
            None
        }
    }
}

/// The stored record echoed by `addbook`, or the draft when the reply has none.
fn created_book(body: &str, draft: &BookRecord) -> BookRecord {
    envelope_book(body, "addbook").unwrap_or_else(|| {
        log::warn!("addbook reply carried no book, keeping the draft without an id");
        draft.clone()
    })
}

fn check_status(response: Response, id: Option<&str>) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = error_message(response, status);
    Err(classify_status(status, message, id))
}

fn error_message(response: Response, status: StatusCode) -> String {
    response
        .json::<ErrorBody>()
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| status.to_string())
}

fn classify_status(status: StatusCode, message: String, id: Option<&str>) -> NessbookError {
    match (status, id) {
        (StatusCode::UNAUTHORIZED, _) => NessbookError::AuthExpired,
        (StatusCode::NOT_FOUND | StatusCode::FORBIDDEN, Some(id)) => {
            NessbookError::NotFound(id.to_string())
        }
        (StatusCode::BAD_REQUEST, Some(id)) if message.contains("Invalid book ID") => {
            NessbookError::InvalidId(id.to_string())
        }
        _ => {
            log::warn!("api error status={} message={}", status, message);
            NessbookError::Network(format!("{} ({})", message, status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_root_appends_api_once() {
        assert_eq!(api_root("https://nessbook.example"), "https://nessbook.example/api");
        assert_eq!(api_root("https://nessbook.example/"), "https://nessbook.example/api");
        assert_eq!(api_root("https://nessbook.example/api/"), "https://nessbook.example/api");
    }

    #[test]
    fn unauthorized_is_auth_expired() {
        let err = classify_status(StatusCode::UNAUTHORIZED, "Token has expired".into(), None);
        assert!(matches!(err, NessbookError::AuthExpired));
    }

    #[test]
    fn forbidden_on_single_book_is_not_found() {
        let err = classify_status(
            StatusCode::FORBIDDEN,
            "Book not found or unauthorized".into(),
            Some("abc"),
        );
        assert!(matches!(err, NessbookError::NotFound(id) if id == "abc"));
    }

    #[test]
    fn invalid_object_id_is_invalid_id() {
        let err = classify_status(StatusCode::BAD_REQUEST, "Invalid book ID".into(), Some("xyz"));
        assert!(matches!(err, NessbookError::InvalidId(_)));
    }

    #[test]
    fn server_errors_are_network_failures() {
        let err = classify_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Backend unavailable".into(),
            None,
        );
        assert!(err.is_retryable());
        assert!(err.to_string().contains("Backend unavailable"));
    }

    #[test]
    fn edit_body_carries_plain_id() {
        let mut book = BookRecord::new("A", "B", "C");
        book.id = Some("old".into());
        book.highlights = vec!["kept".into()];

        let body = edit_body("64f0", &book).unwrap();
        assert_eq!(body["id"], "64f0");
        assert!(body.get("_id").is_none());
        assert_eq!(body["highlights"][0], "kept");
    }

    #[test]
    fn created_book_reads_the_envelope() {
        let draft = BookRecord::new("Dune", "Frank Herbert", "Science-Fiction");
        let body = r#"{"message":"Book added","book":{"_id":"x","title":"Dune","author":"Frank Herbert","genre":"Science-Fiction"}}"#;

        let book = created_book(body, &draft);
        assert_eq!(book.id.as_deref(), Some("x"));
        assert_eq!(book.title, "Dune");
    }

    #[test]
    fn created_book_without_book_key_keeps_draft() {
        let draft = BookRecord::new("Dune", "Frank Herbert", "Science-Fiction");
        let book = created_book(r#"{"message":"Book added"}"#, &draft);
        assert_eq!(book, draft);
        assert_eq!(book.id, None);
    }

    #[test]
    fn created_book_survives_non_json_body() {
        let draft = BookRecord::new("Dune", "Frank Herbert", "Science-Fiction");
        assert_eq!(created_book("<html>502</html>", &draft), draft);
        assert_eq!(envelope_book("", "editbook"), None);
    }
}

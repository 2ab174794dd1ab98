//! Pingdom REST backend.
//!
//! Talks to the 2.1 API with a blocking ureq agent. HTTP status codes are
//! not transport errors here: non-2xx responses are decoded from Pingdom's
//! error envelope so the caller sees the service's own message.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::types::{CheckDetail, CheckPayload, CheckSummary, CreatedCheck, Credentials, User};
use base64::Engine;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use ureq::http::Response;
use ureq::{Body, RequestBuilder};

/// Default API root.
pub const DEFAULT_API_BASE: &str = "https://api.pingdom.com/api/2.1";

const USER_AGENT: &str = "heimdallr";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pingdom REST backend.
///
/// # Example
///
/// ```no_run
/// use pingdom::backend::Backend;
/// use pingdom::backend::http::HttpBackend;
/// use pingdom::Credentials;
///
/// let backend = HttpBackend::new(Credentials::new("bob@example.com", "secret", "app-key"));
/// let checks = backend.list_checks("managed-by-heimdallr", true).unwrap();
/// println!("Found {} checks", checks.len());
/// ```
pub struct HttpBackend {
    agent: ureq::Agent,
    api_base: String,
    /// Precomputed `Basic ...` header value
    authorization: String,
    app_key: String,
}

impl HttpBackend {
    /// Create a backend against the public API.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self::with_api_base(credentials, DEFAULT_API_BASE)
    }

    /// Create a backend against a custom API root (proxies, test servers).
    #[must_use]
    pub fn with_api_base(credentials: Credentials, api_base: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            authorization: basic_auth(&credentials.username, &credentials.password),
            app_key: credentials.app_key,
        }
    }

    /// Get the current API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn check_url(&self, id: u64) -> String {
        self.url(&format!("/checks/{id}"))
    }

    fn authorize<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        request
            .header("Authorization", &self.authorization)
            .header("App-Key", &self.app_key)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
    }
}

fn basic_auth(username: &str, password: &str) -> String {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

impl Backend for HttpBackend {
    fn list_users(&self) -> Result<Vec<User>> {
        let response = self.authorize(self.agent.get(self.url("/users"))).call()?;
        let envelope: UsersEnvelope = decode(response)?;
        Ok(envelope.users)
    }

    fn list_checks(&self, tag: &str, include_tags: bool) -> Result<Vec<CheckSummary>> {
        log::debug!("GET /checks tags={tag} include_tags={include_tags}");
        let response = self
            .authorize(self.agent.get(self.url("/checks")))
            .query("tags", tag)
            .query("include_tags", include_tags.to_string())
            .call()?;
        let envelope: ChecksEnvelope = decode(response)?;
        Ok(envelope.checks)
    }

    fn read_check(&self, id: u64) -> Result<CheckDetail> {
        log::debug!("GET /checks/{id}");
        let response = self.authorize(self.agent.get(self.check_url(id))).call()?;
        let envelope: CheckEnvelope<CheckDetail> = decode(response)?;
        Ok(envelope.check)
    }

    fn create_check(&self, payload: &CheckPayload) -> Result<CreatedCheck> {
        log::debug!("POST /checks name={}", payload.name);
        let response = self
            .authorize(self.agent.post(self.url("/checks")))
            .send_form(payload.form_fields(true))?;
        let envelope: CheckEnvelope<CreatedCheck> = decode(response)?;
        Ok(envelope.check)
    }

    fn update_check(&self, id: u64, payload: &CheckPayload) -> Result<()> {
        log::debug!("PUT /checks/{id} name={}", payload.name);
        let response = self
            .authorize(self.agent.put(self.check_url(id)))
            .send_form(payload.form_fields(false))?;
        let envelope: MessageEnvelope = decode(response)?;
        log::debug!("update {id}: {}", envelope.message);
        Ok(())
    }

    fn delete_check(&self, id: u64) -> Result<()> {
        log::debug!("DELETE /checks/{id}");
        let response = self
            .authorize(self.agent.delete(self.check_url(id)))
            .call()?;
        let envelope: MessageEnvelope = decode(response)?;
        log::debug!("delete {id}: {}", envelope.message);
        Ok(())
    }
}

/// Decode a success body, or turn an error envelope into [`Error::Api`].
fn decode<T: DeserializeOwned>(mut response: Response<Body>) -> Result<T> {
    let status = response.status();
    let body = response.body_mut().read_to_string()?;
    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body));
    }
    Ok(serde_json::from_str(&body)?)
}

fn api_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let ApiError {
                statusdesc,
                errormessage,
                ..
            } = envelope.error;
            let message = if errormessage.is_empty() {
                statusdesc
            } else {
                format!("{statusdesc}: {errormessage}")
            };
            Error::api(status, message)
        }
        Err(_) => Error::api(status, body.trim().to_string()),
    }
}

// =============================================================================
// Response envelopes
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChecksEnvelope {
    #[serde(default)]
    checks: Vec<CheckSummary>,
}

#[derive(Debug, Deserialize)]
struct CheckEnvelope<T> {
    check: T,
}

#[derive(Debug, Deserialize)]
struct UsersEnvelope {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    statusdesc: String,
    #[serde(default)]
    errormessage: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> HttpBackend {
        HttpBackend::with_api_base(
            Credentials::new("bob@example.com", "secret", "key"),
            "http://localhost:9999/api/2.1/",
        )
    }

    #[test]
    fn test_default_api_base() {
        let backend = HttpBackend::new(Credentials::new("a", "b", "c"));
        assert_eq!(backend.api_base(), DEFAULT_API_BASE);
    }

    #[test]
    fn test_urls_trim_trailing_slash() {
        let backend = backend();
        assert_eq!(backend.api_base(), "http://localhost:9999/api/2.1");
        assert_eq!(
            backend.check_url(42),
            "http://localhost:9999/api/2.1/checks/42"
        );
        assert_eq!(backend.url("/users"), "http://localhost:9999/api/2.1/users");
    }

    #[test]
    fn test_basic_auth() {
        assert_eq!(basic_auth("user", "pass"), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_api_error_envelope() {
        let body = r#"{"error":{"statuscode":403,"statusdesc":"Forbidden","errormessage":"Something went wrong! This user does not have access to this check."}}"#;
        let err = api_error(403, body);
        assert_eq!(
            err,
            Error::api(
                403,
                "Forbidden: Something went wrong! This user does not have access to this check."
            )
        );
    }

    #[test]
    fn test_api_error_without_envelope() {
        let err = api_error(502, "  Bad Gateway\n");
        assert_eq!(err, Error::api(502, "Bad Gateway"));
    }

    #[test]
    fn test_decode_created_envelope() {
        let body = r#"{"check":{"id":138631,"name":"default/example"}}"#;
        let envelope: CheckEnvelope<CreatedCheck> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.check.id, 138631);
    }
}

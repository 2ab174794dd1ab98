//! Wire types for the Pingdom checks and users endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type name Pingdom reports for HTTP checks in listings.
pub const HTTP_CHECK_TYPE: &str = "http";

/// Account credentials.
///
/// Pingdom authenticates with HTTP Basic auth plus an application key
/// sent in the `App-Key` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub app_key: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        app_key: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            app_key: app_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("app_key", &"<redacted>")
            .finish()
    }
}

/// A tag attached to a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    /// "u" for user tags, "a" for auto-tags
    #[serde(rename = "type", default)]
    pub tag_type: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag_type: "u".to_string(),
        }
    }
}

/// One row of `GET /checks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub check_type: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub resolution: u32,
    /// Only populated when the listing was requested with `include_tags`
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl CheckSummary {
    /// Whether the check carries a tag with the given name.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.name == tag)
    }

    /// Whether this is an HTTP check.
    pub fn is_http(&self) -> bool {
        self.check_type == HTTP_CHECK_TYPE
    }
}

/// HTTP-specific settings of a check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default)]
    pub encryption: bool,
    #[serde(default)]
    pub url: Option<String>,
}

/// The `type` object of a detailed check; exactly one member is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpSettings>,
}

/// Full detail of a check, from `GET /checks/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDetail {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub resolution: u32,
    #[serde(rename = "sendnotificationwhendown", default)]
    pub send_notification_when_down: u32,
    #[serde(rename = "notifyagainevery", default)]
    pub notify_again_every: u32,
    #[serde(rename = "notifywhenbackup", default)]
    pub notify_when_backup: bool,
    #[serde(rename = "type", default)]
    pub check_type: CheckType,
    #[serde(rename = "integrationids", default)]
    pub integration_ids: Vec<u64>,
    #[serde(rename = "userids", default)]
    pub user_ids: Vec<u64>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl CheckDetail {
    /// Whether the check connects over TLS. Non-HTTP checks report false.
    pub fn encryption(&self) -> bool {
        self.check_type
            .http
            .as_ref()
            .is_some_and(|http| http.encryption)
    }
}

/// Request body for creating or modifying an HTTP check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckPayload {
    pub name: String,
    pub host: String,
    /// Check interval in minutes
    pub resolution: u32,
    pub encryption: bool,
    pub send_notification_when_down: u32,
    pub notify_again_every: u32,
    pub notify_when_backup: bool,
    pub tags: Vec<String>,
    pub user_ids: Vec<u64>,
    pub integration_ids: Vec<u64>,
}

impl CheckPayload {
    /// Render the payload as form fields.
    ///
    /// `type` is only sent on create; Pingdom rejects attempts to change the
    /// type of an existing check. Empty id lists are omitted.
    pub fn form_fields(&self, for_create: bool) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("host", self.host.clone()),
            ("resolution", self.resolution.to_string()),
            ("encryption", self.encryption.to_string()),
            (
                "sendnotificationwhendown",
                self.send_notification_when_down.to_string(),
            ),
            ("notifyagainevery", self.notify_again_every.to_string()),
            ("notifywhenbackup", self.notify_when_backup.to_string()),
            ("tags", self.tags.join(",")),
        ];
        if for_create {
            fields.push(("type", HTTP_CHECK_TYPE.to_string()));
        }
        if !self.user_ids.is_empty() {
            fields.push(("userids", join_ids(&self.user_ids)));
        }
        if !self.integration_ids.is_empty() {
            fields.push(("integrationids", join_ids(&self.integration_ids)));
        }
        fields
    }
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Response to a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCheck {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEmail {
    pub address: String,
}

/// An account user, from `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Vec<UserEmail>,
}

impl User {
    pub fn has_email(&self, address: &str) -> bool {
        self.email.iter().any(|e| e.address == address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CheckPayload {
        CheckPayload {
            name: "default/example".into(),
            host: "example.com".into(),
            resolution: 5,
            encryption: true,
            send_notification_when_down: 1,
            notify_again_every: 10,
            notify_when_backup: true,
            tags: vec!["managed-by-heimdallr".into()],
            user_ids: vec![7],
            integration_ids: vec![],
        }
    }

    fn field<'a>(fields: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_form_fields_create_includes_type() {
        let fields = payload().form_fields(true);
        assert_eq!(field(&fields, "type"), Some("http"));
        assert_eq!(field(&fields, "host"), Some("example.com"));
        assert_eq!(field(&fields, "encryption"), Some("true"));
        assert_eq!(field(&fields, "userids"), Some("7"));
        assert_eq!(field(&fields, "integrationids"), None);
    }

    #[test]
    fn test_form_fields_update_omits_type() {
        let mut p = payload();
        p.integration_ids = vec![3, 9];
        let fields = p.form_fields(false);
        assert_eq!(field(&fields, "type"), None);
        assert_eq!(field(&fields, "integrationids"), Some("3,9"));
        assert_eq!(field(&fields, "tags"), Some("managed-by-heimdallr"));
    }

    #[test]
    fn test_decode_summary() {
        let json = r#"{
            "id": 85975,
            "name": "default/foo",
            "type": "http",
            "hostname": "foo.io",
            "resolution": 1,
            "lasterrortime": 1297446423,
            "tags": [{"name": "managed-by-heimdallr", "type": "u", "count": "2"}]
        }"#;
        let summary: CheckSummary = serde_json::from_str(json).unwrap();
        assert!(summary.is_http());
        assert!(summary.has_tag("managed-by-heimdallr"));
        assert!(!summary.has_tag("other"));
    }

    #[test]
    fn test_decode_detail() {
        let json = r#"{
            "id": 85975,
            "name": "other/bar",
            "hostname": "bar.com",
            "resolution": 5,
            "sendnotificationwhendown": 2,
            "notifyagainevery": 8,
            "notifywhenbackup": false,
            "type": {"http": {"url": "/", "encryption": true, "port": 443}},
            "integrationids": [11]
        }"#;
        let detail: CheckDetail = serde_json::from_str(json).unwrap();
        assert!(detail.encryption());
        assert_eq!(detail.send_notification_when_down, 2);
        assert_eq!(detail.integration_ids, vec![11]);
        assert!(detail.tags.is_empty());
    }

    #[test]
    fn test_credentials_debug_redacts() {
        let creds = Credentials::new("bob@example.com", "hunter2", "key123");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("bob@example.com"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("key123"));
    }
}

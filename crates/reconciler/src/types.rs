//! The `HTTPCheck` resource and the records kept about it

use serde::{Deserialize, Serialize};

/// API group the resource is registered under
pub const GROUP: &str = "heimdallr.froe.io";
/// API version of the resource
pub const VERSION: &str = "v1alpha1";
/// Resource kind
pub const KIND: &str = "HTTPCheck";
/// Resource kind, pluralized
pub const PLURAL: &str = "httpchecks";
/// Namespace assumed for objects that don't carry one
pub const DEFAULT_NAMESPACE: &str = "default";

/// `group/version`, as it appears in `apiVersion`
pub fn api_version() -> String {
    format!("{GROUP}/{VERSION}")
}

/// Identity of a check: `<namespace>/<name>`, with an empty or missing
/// namespace read as `default`.
///
/// The identity is also the display name of the remote check.
pub fn identity(namespace: Option<&str>, name: &str) -> String {
    let namespace = match namespace {
        Some(ns) if !ns.is_empty() => ns,
        _ => DEFAULT_NAMESPACE,
    };
    format!("{namespace}/{name}")
}

/// Object metadata (the subset we read)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

/// Desired settings of an HTTP check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpCheckSpec {
    pub hostname: String,
    pub interval_minutes: u32,
    /// Consecutive failures before an alert is sent
    pub trigger_threshold: u32,
    /// Failures between repeated alerts
    pub retrigger_threshold: u32,
    pub notify_when_backup: bool,
    #[serde(rename = "enableTLS")]
    pub enable_tls: bool,
    #[serde(rename = "integrationIDs", skip_serializing_if = "Vec::is_empty")]
    pub integration_ids: Vec<u64>,
}

/// Last reconciliation result, as a human-readable message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpCheckStatus {
    #[serde(rename = "status", default)]
    pub state: String,
}

/// A declared HTTP check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpCheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: HttpCheckSpec,
    #[serde(default)]
    pub status: HttpCheckStatus,
}

impl HttpCheck {
    pub fn new(name: impl Into<String>, namespace: Option<&str>, spec: HttpCheckSpec) -> Self {
        Self {
            api_version: Some(api_version()),
            kind: Some(KIND.to_string()),
            metadata: ObjectMeta {
                name: name.into(),
                namespace: namespace.map(str::to_string),
                resource_version: None,
            },
            spec,
            status: HttpCheckStatus::default(),
        }
    }

    pub fn identity(&self) -> String {
        identity(self.metadata.namespace.as_deref(), &self.metadata.name)
    }

    /// Whether `kind`, when present, names this resource.
    pub fn is_expected_kind(&self) -> bool {
        self.kind.as_deref().is_none_or(|kind| kind == KIND)
    }
}

/// A remote check owned by this system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedCheck {
    /// Id assigned by Pingdom
    pub id: u64,
    pub identity: String,
    /// Spec last applied to (or adopted from) the remote check
    pub spec: HttpCheckSpec,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_defaults_namespace() {
        assert_eq!(identity(None, "example"), "default/example");
        assert_eq!(identity(Some(""), "example"), "default/example");
        assert_eq!(identity(Some("other"), "foo"), "other/foo");
    }

    #[test]
    fn test_deserialize_resource() {
        let json = r#"{
            "apiVersion": "heimdallr.froe.io/v1alpha1",
            "kind": "HTTPCheck",
            "metadata": {"name": "foo", "namespace": "other", "resourceVersion": "12"},
            "spec": {
                "hostname": "foo.io",
                "intervalMinutes": 10,
                "triggerThreshold": 3,
                "retriggerThreshold": 30,
                "notifyWhenBackup": true,
                "enableTLS": true,
                "integrationIDs": [4]
            }
        }"#;
        let check: HttpCheck = serde_json::from_str(json).unwrap();
        assert_eq!(check.identity(), "other/foo");
        assert_eq!(check.metadata.resource_version.as_deref(), Some("12"));
        assert!(check.spec.enable_tls);
        assert_eq!(check.spec.integration_ids, vec![4]);
        assert!(check.status.state.is_empty());
        assert!(check.is_expected_kind());
    }

    #[test]
    fn test_deserialize_sparse_spec() {
        let json = r#"{"metadata": {"name": "bare"}, "spec": {"hostname": "bare.io"}}"#;
        let check: HttpCheck = serde_json::from_str(json).unwrap();
        assert_eq!(check.identity(), "default/bare");
        assert_eq!(check.spec.interval_minutes, 0);
        assert!(!check.spec.enable_tls);
    }

    #[test]
    fn test_status_serializes_under_status_key() {
        let mut check = HttpCheck::new("foo", None, HttpCheckSpec::default());
        check.status.state = "successfully created check".into();
        let value = serde_json::to_value(&check).unwrap();
        assert_eq!(value["status"]["status"], "successfully created check");
        assert_eq!(value["apiVersion"], "heimdallr.froe.io/v1alpha1");
        assert!(value["spec"].get("integrationIDs").is_none());
    }

    #[test]
    fn test_unexpected_kind() {
        let mut check = HttpCheck::new("foo", None, HttpCheckSpec::default());
        check.kind = Some("ConfigMap".into());
        assert!(!check.is_expected_kind());
        check.kind = None;
        assert!(check.is_expected_kind());
    }
}

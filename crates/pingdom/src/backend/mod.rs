//! Backend trait and implementations for the Pingdom API.
//!
//! [`http::HttpBackend`] talks to the real service. [`MockBackend`] keeps
//! checks in memory and records every call, for testing code that drives
//! a backend without network access:
//!
//! ```
//! use pingdom::backend::{Backend, Call, MockBackend};
//! use pingdom::CheckPayload;
//!
//! let mock = MockBackend::new().with_next_id(100);
//! let created = mock.create_check(&CheckPayload::default()).unwrap();
//! assert_eq!(created.id, 100);
//! assert!(matches!(mock.calls()[0], Call::CreateCheck(_)));
//! ```

pub mod http;

use crate::error::{Error, Result};
use crate::types::{
    CheckDetail, CheckPayload, CheckSummary, CheckType, CreatedCheck, HTTP_CHECK_TYPE,
    HttpSettings, Tag, User, UserEmail,
};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The subset of the Pingdom API needed to manage checks.
pub trait Backend: Send + Sync {
    /// List the users of the account.
    fn list_users(&self) -> Result<Vec<User>>;

    /// List checks carrying `tag`.
    ///
    /// With `include_tags` the summaries carry their tag lists, which callers
    /// need to verify ownership.
    fn list_checks(&self, tag: &str, include_tags: bool) -> Result<Vec<CheckSummary>>;

    /// Fetch the full detail of a check.
    fn read_check(&self, id: u64) -> Result<CheckDetail>;

    /// Create an HTTP check and return its assigned id.
    fn create_check(&self, payload: &CheckPayload) -> Result<CreatedCheck>;

    /// Replace the settings of an existing check.
    fn update_check(&self, id: u64, payload: &CheckPayload) -> Result<()>;

    /// Delete a check.
    fn delete_check(&self, id: u64) -> Result<()>;
}

/// Backend operations, used to prime [`MockBackend`] failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListUsers,
    ListChecks,
    ReadCheck,
    CreateCheck,
    UpdateCheck,
    DeleteCheck,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ListUsers => "list users",
            Self::ListChecks => "list checks",
            Self::ReadCheck => "read check",
            Self::CreateCheck => "create check",
            Self::UpdateCheck => "update check",
            Self::DeleteCheck => "delete check",
        };
        f.write_str(name)
    }
}

/// A call recorded by [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListUsers,
    ListChecks { tag: String, include_tags: bool },
    ReadCheck(u64),
    CreateCheck(CheckPayload),
    UpdateCheck(u64, CheckPayload),
    DeleteCheck(u64),
}

#[derive(Debug)]
struct MockState {
    /// id -> (listing type, detail)
    checks: BTreeMap<u64, (String, CheckDetail)>,
    users: Vec<User>,
    next_id: u64,
    failures: HashMap<Operation, String>,
    calls: Vec<Call>,
    /// Whether listing honors the `tags` filter
    filter_by_tag: bool,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            checks: BTreeMap::new(),
            users: Vec::new(),
            next_id: 1,
            failures: HashMap::new(),
            calls: Vec::new(),
            filter_by_tag: true,
        }
    }
}

/// In-memory backend for tests.
///
/// Clones share state, so a test can hand one clone to the code under test
/// and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// Create an empty mock backend. Ids are assigned from 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id the next created check receives.
    #[must_use]
    pub fn with_next_id(self, id: u64) -> Self {
        self.lock().next_id = id;
        self
    }

    /// List every check regardless of the requested tag, as a server that
    /// ignores the `tags` parameter would.
    #[must_use]
    pub fn ignoring_tag_filter(self) -> Self {
        self.lock().filter_by_tag = false;
        self
    }

    /// Add an account user.
    #[must_use]
    pub fn with_user(self, id: u64, email: impl Into<String>) -> Self {
        self.lock().users.push(User {
            id,
            name: String::new(),
            email: vec![UserEmail {
                address: email.into(),
            }],
        });
        self
    }

    /// Seed a check that already exists remotely.
    ///
    /// `check_type` is what the listing reports (`"http"`, `"tcp"`, ...).
    pub fn insert_check(&self, check_type: impl Into<String>, detail: CheckDetail) {
        self.lock()
            .checks
            .insert(detail.id, (check_type.into(), detail));
    }

    /// Current remote state of a check.
    pub fn check(&self, id: u64) -> Option<CheckDetail> {
        self.lock().checks.get(&id).map(|(_, detail)| detail.clone())
    }

    /// Number of checks held.
    pub fn check_count(&self) -> usize {
        self.lock().checks.len()
    }

    /// Make every subsequent call of `operation` fail with `message`.
    pub fn fail_on(&self, operation: Operation, message: impl Into<String>) {
        self.lock().failures.insert(operation, message.into());
    }

    /// Remove all primed failures.
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `call`, then fail if `operation` has been primed to.
    fn enter(&self, operation: Operation, call: Call) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        state.calls.push(call);
        if let Some(message) = state.failures.get(&operation).cloned() {
            return Err(Error::api(400, message));
        }
        Ok(state)
    }
}

fn detail_from_payload(id: u64, payload: &CheckPayload) -> CheckDetail {
    CheckDetail {
        id,
        name: payload.name.clone(),
        hostname: payload.host.clone(),
        resolution: payload.resolution,
        send_notification_when_down: payload.send_notification_when_down,
        notify_again_every: payload.notify_again_every,
        notify_when_backup: payload.notify_when_backup,
        check_type: CheckType {
            http: Some(HttpSettings {
                encryption: payload.encryption,
                url: None,
            }),
        },
        integration_ids: payload.integration_ids.clone(),
        user_ids: payload.user_ids.clone(),
        tags: payload.tags.iter().map(Tag::new).collect(),
    }
}

impl Backend for MockBackend {
    fn list_users(&self) -> Result<Vec<User>> {
        let state = self.enter(Operation::ListUsers, Call::ListUsers)?;
        Ok(state.users.clone())
    }

    fn list_checks(&self, tag: &str, include_tags: bool) -> Result<Vec<CheckSummary>> {
        let state = self.enter(
            Operation::ListChecks,
            Call::ListChecks {
                tag: tag.to_string(),
                include_tags,
            },
        )?;
        let summaries = state
            .checks
            .values()
            .filter(|(_, detail)| {
                !state.filter_by_tag || detail.tags.iter().any(|t| t.name == tag)
            })
            .map(|(check_type, detail)| CheckSummary {
                id: detail.id,
                name: detail.name.clone(),
                check_type: check_type.clone(),
                hostname: detail.hostname.clone(),
                resolution: detail.resolution,
                tags: if include_tags {
                    detail.tags.clone()
                } else {
                    Vec::new()
                },
            })
            .collect();
        Ok(summaries)
    }

    fn read_check(&self, id: u64) -> Result<CheckDetail> {
        let state = self.enter(Operation::ReadCheck, Call::ReadCheck(id))?;
        state
            .checks
            .get(&id)
            .map(|(_, detail)| detail.clone())
            .ok_or(Error::NotFound(id))
    }

    fn create_check(&self, payload: &CheckPayload) -> Result<CreatedCheck> {
        let mut state = self.enter(Operation::CreateCheck, Call::CreateCheck(payload.clone()))?;
        let id = state.next_id;
        state.next_id += 1;
        state.checks.insert(
            id,
            (HTTP_CHECK_TYPE.to_string(), detail_from_payload(id, payload)),
        );
        Ok(CreatedCheck {
            id,
            name: payload.name.clone(),
        })
    }

    fn update_check(&self, id: u64, payload: &CheckPayload) -> Result<()> {
        let mut state = self.enter(
            Operation::UpdateCheck,
            Call::UpdateCheck(id, payload.clone()),
        )?;
        let (_, detail) = state.checks.get_mut(&id).ok_or(Error::NotFound(id))?;
        *detail = detail_from_payload(id, payload);
        Ok(())
    }

    fn delete_check(&self, id: u64) -> Result<()> {
        let mut state = self.enter(Operation::DeleteCheck, Call::DeleteCheck(id))?;
        state
            .checks
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(id: u64, name: &str, tag: &str) -> CheckDetail {
        CheckDetail {
            id,
            name: name.to_string(),
            hostname: format!("{id}.example.com"),
            tags: vec![Tag::new(tag)],
            ..CheckDetail::default()
        }
    }

    #[test]
    fn test_mock_backend_new() {
        let mock = MockBackend::new();
        assert!(mock.list_users().unwrap().is_empty());
        assert_eq!(mock.check_count(), 0);
    }

    #[test]
    fn test_mock_list_filters_by_tag() {
        let mock = MockBackend::new();
        mock.insert_check("http", tagged(1, "default/a", "mine"));
        mock.insert_check("http", tagged(2, "default/b", "theirs"));

        let listed = mock.list_checks("mine", true).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, 1);
        assert!(listed[0].has_tag("mine"));

        let untagged = mock.list_checks("mine", false).unwrap();
        assert!(untagged[0].tags.is_empty());
    }

    #[test]
    fn test_mock_ignoring_tag_filter_lists_everything() {
        let mock = MockBackend::new().ignoring_tag_filter();
        mock.insert_check("http", tagged(1, "default/a", "mine"));
        mock.insert_check("http", tagged(2, "default/b", "theirs"));

        let listed = mock.list_checks("mine", true).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(!listed[1].has_tag("mine"));
    }

    #[test]
    fn test_mock_create_assigns_ids() {
        let mock = MockBackend::new().with_next_id(100);
        let payload = CheckPayload {
            name: "default/example".into(),
            encryption: true,
            ..CheckPayload::default()
        };

        assert_eq!(mock.create_check(&payload).unwrap().id, 100);
        assert_eq!(mock.create_check(&payload).unwrap().id, 101);
        assert!(mock.check(100).unwrap().encryption());
    }

    #[test]
    fn test_mock_update_and_delete_missing() {
        let mock = MockBackend::new();
        let payload = CheckPayload::default();
        assert_eq!(
            mock.update_check(9, &payload).unwrap_err(),
            Error::NotFound(9)
        );
        assert_eq!(mock.delete_check(9).unwrap_err(), Error::NotFound(9));
    }

    #[test]
    fn test_mock_fail_on_records_call() {
        let mock = MockBackend::new();
        mock.fail_on(Operation::DeleteCheck, "bad request");

        let err = mock.delete_check(5).unwrap_err();
        assert_eq!(err, Error::api(400, "bad request"));
        assert_eq!(mock.calls(), vec![Call::DeleteCheck(5)]);

        mock.clear_failures();
        assert_eq!(mock.delete_check(5).unwrap_err(), Error::NotFound(5));
    }

    #[test]
    fn test_mock_clones_share_state() {
        let mock = MockBackend::new();
        let handle = mock.clone();
        mock.create_check(&CheckPayload::default()).unwrap();
        assert_eq!(handle.check_count(), 1);
        assert_eq!(handle.calls().len(), 1);
    }
}

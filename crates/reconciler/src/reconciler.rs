//! Converges remote checks onto declared ones
//!
//! The reconciler owns a [`ReconciliationStore`] rebuilt from Pingdom at
//! construction, and turns each [`CheckEvent`] into at most one remote write:
//!
//! - add/update: update the owned check if the identity is known, else create
//! - delete: delete the owned check if the identity is known, else nothing
//!
//! Only checks carrying the ownership tag are ever touched. Callers must not
//! deliver two events for the same identity concurrently; events for distinct
//! identities may be handled in parallel.

use crate::error::{Error, Result};
use crate::event::CheckEvent;
use crate::report::{Action, LogReporter, Outcome, StatusReporter, status_message};
use crate::store::ReconciliationStore;
use crate::types::{HttpCheck, HttpCheckSpec, OwnedCheck};
use pingdom::{Backend, CheckDetail, CheckPayload};
use std::sync::Arc;

/// Tag marking remote checks managed by heimdallr
pub const DEFAULT_TAG: &str = "managed-by-heimdallr";

/// Construction settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Ownership tag
    pub tag: String,
    /// Email of the account user that checks notify
    pub owner_email: String,
}

impl Settings {
    pub fn new(owner_email: impl Into<String>) -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            owner_email: owner_email.into(),
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

/// Keeps Pingdom's tagged HTTP checks in line with declared `HTTPCheck`s.
pub struct Reconciler {
    backend: Box<dyn Backend>,
    store: ReconciliationStore,
    tag: String,
    owner_id: u64,
    reporter: Box<dyn StatusReporter>,
}

impl Reconciler {
    /// Resolve the owner user and adopt every tagged HTTP check.
    ///
    /// Any failure here is fatal: without a complete view of what we own we
    /// would risk creating duplicates or orphaning checks.
    pub fn new(backend: Box<dyn Backend>, settings: Settings) -> Result<Self> {
        let owner_id = resolve_owner(backend.as_ref(), &settings.owner_email)?;
        let reconciler = Self {
            backend,
            store: ReconciliationStore::new(),
            tag: settings.tag,
            owner_id,
            reporter: Box::new(LogReporter),
        };
        let adopted = reconciler.sync()?;
        log::info!(
            "adopted {adopted} existing checks tagged {}",
            reconciler.tag
        );
        Ok(reconciler)
    }

    /// Replace the default [`LogReporter`].
    pub fn with_reporter(mut self, reporter: impl StatusReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn store(&self) -> &ReconciliationStore {
        &self.store
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn owner_id(&self) -> u64 {
        self.owner_id
    }

    /// Handle one change notification.
    ///
    /// Writes the resulting status onto the event's object and reports it.
    /// Returns `None` when the event is an update whose old and new objects
    /// are the same instance; nothing is called or written in that case.
    pub fn handle(&self, event: &mut CheckEvent) -> Option<Result<Outcome>> {
        let identity = event.object().identity();
        if event.is_degenerate_update() {
            log::info!(
                "new and old checks are identical so no further work is required: {identity}"
            );
            return None;
        }

        let result = match &*event {
            CheckEvent::Added(check) | CheckEvent::Updated { new: check, .. } => {
                self.converge_upsert(check)
            }
            CheckEvent::Deleted(check) => self.converge_delete(check),
        };

        Arc::make_mut(event.object_mut()).status.state = status_message(&result);
        self.reporter.report(&identity, &result);
        Some(result)
    }

    /// Make the remote check for `desired` match its spec, creating it if we
    /// own nothing under its identity.
    ///
    /// On failure the store is left as it was.
    pub fn converge_upsert(&self, desired: &HttpCheck) -> Result<Outcome> {
        let identity = desired.identity();
        let payload = self.payload(&identity, &desired.spec);

        match self.store.lookup(&identity) {
            Some(existing) => {
                self.backend
                    .update_check(existing.id, &payload)
                    .map_err(Error::remote(Action::Update))?;
                log::debug!("updated check {identity} ({})", existing.id);
                self.store.put(
                    identity.clone(),
                    OwnedCheck {
                        id: existing.id,
                        identity,
                        spec: desired.spec.clone(),
                    },
                );
                Ok(Outcome::Updated)
            }
            None => {
                let created = self
                    .backend
                    .create_check(&payload)
                    .map_err(Error::remote(Action::Create))?;
                log::debug!("created check {identity} ({})", created.id);
                self.store.put(
                    identity.clone(),
                    OwnedCheck {
                        id: created.id,
                        identity,
                        spec: desired.spec.clone(),
                    },
                );
                Ok(Outcome::Created)
            }
        }
    }

    /// Delete the remote check owned under `desired`'s identity, if any.
    ///
    /// A check Pingdom reports as missing counts as deleted. Any other failure
    /// keeps the entry, since the remote check is presumed to still exist.
    pub fn converge_delete(&self, desired: &HttpCheck) -> Result<Outcome> {
        let identity = desired.identity();
        let Some(existing) = self.store.lookup(&identity) else {
            log::debug!("no owned check for {identity}, nothing to delete");
            return Ok(Outcome::AlreadyAbsent);
        };

        match self.backend.delete_check(existing.id) {
            Ok(()) => {
                self.store.remove(&identity);
                Ok(Outcome::Deleted)
            }
            Err(err) if err.is_not_found() => {
                log::warn!(
                    "check {identity} ({}) was already gone remotely",
                    existing.id
                );
                self.store.remove(&identity);
                Ok(Outcome::AlreadyAbsent)
            }
            Err(err) => Err(Error::remote(Action::Delete)(err)),
        }
    }

    /// Rebuild the store from every HTTP check carrying our tag.
    fn sync(&self) -> Result<usize> {
        let listed = self
            .backend
            .list_checks(&self.tag, true)
            .map_err(Error::List)?;
        log::info!(
            "found {} existing checks, checking if any are managed by heimdallr",
            listed.len()
        );

        let mut adopted = 0;
        for summary in listed {
            if !summary.has_tag(&self.tag) {
                continue;
            }
            if !summary.is_http() {
                log::debug!(
                    "skipping {} check {}: only http checks are managed",
                    summary.check_type,
                    summary.name
                );
                continue;
            }

            let detail = self
                .backend
                .read_check(summary.id)
                .map_err(|source| Error::Read {
                    name: summary.name.clone(),
                    source,
                })?;
            log::info!("found pre-existing check {}", summary.name);
            match self.store.lookup(&summary.name) {
                Some(previous) => log::warn!(
                    "checks {} and {} are both named {}, keeping {}; {} is no longer managed",
                    previous.id,
                    summary.id,
                    summary.name,
                    summary.id,
                    previous.id
                ),
                None => adopted += 1,
            }
            self.store.put(
                summary.name.clone(),
                OwnedCheck {
                    id: summary.id,
                    identity: summary.name,
                    spec: decode_spec(&detail),
                },
            );
        }
        Ok(adopted)
    }

    fn payload(&self, identity: &str, spec: &HttpCheckSpec) -> CheckPayload {
        CheckPayload {
            name: identity.to_string(),
            host: spec.hostname.clone(),
            resolution: spec.interval_minutes,
            encryption: spec.enable_tls,
            send_notification_when_down: spec.trigger_threshold,
            notify_again_every: spec.retrigger_threshold,
            notify_when_backup: spec.notify_when_backup,
            tags: vec![self.tag.clone()],
            user_ids: vec![self.owner_id],
            integration_ids: spec.integration_ids.clone(),
        }
    }
}

fn resolve_owner(backend: &dyn Backend, email: &str) -> Result<u64> {
    let users = backend.list_users().map_err(Error::Users)?;
    users
        .iter()
        .find(|user| user.has_email(email))
        .map(|user| user.id)
        .ok_or_else(|| Error::OwnerNotFound(email.to_string()))
}

/// Inverse of [`Reconciler::payload`].
fn decode_spec(detail: &CheckDetail) -> HttpCheckSpec {
    HttpCheckSpec {
        hostname: detail.hostname.clone(),
        interval_minutes: detail.resolution,
        trigger_threshold: detail.send_notification_when_down,
        retrigger_threshold: detail.notify_again_every,
        notify_when_backup: detail.notify_when_backup,
        enable_tls: detail.encryption(),
        integration_ids: detail.integration_ids.clone(),
    }
}

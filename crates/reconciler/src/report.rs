//! Reconciliation outcomes and the callback that receives them
//!
//! The reconciler never returns remote failures to its caller. Each step's
//! result is written onto the object's status and handed to a
//! [`StatusReporter`], so the caller can log, count or ignore it.

use crate::error::Result;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// A remote write the reconciler can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Result of a successful convergence step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new remote check was created
    Created,
    /// The owned remote check was updated in place
    Updated,
    /// The owned remote check was deleted
    Deleted,
    /// Nothing owned under this identity, so there was nothing to delete
    AlreadyAbsent,
}

impl Outcome {
    pub fn status_message(&self) -> &'static str {
        match self {
            Self::Created => "successfully created check",
            Self::Updated => "successfully updated check",
            Self::Deleted | Self::AlreadyAbsent => "successfully deleted check",
        }
    }

    /// Whether a remote call was made.
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::AlreadyAbsent)
    }
}

/// Status string for a step result.
pub fn status_message(result: &Result<Outcome>) -> String {
    match result {
        Ok(outcome) => outcome.status_message().to_string(),
        Err(err) => err.to_string(),
    }
}

/// Receives the result of every convergence step.
pub trait StatusReporter: Send + Sync {
    fn report(&self, identity: &str, result: &Result<Outcome>);
}

/// Logs successes at info and failures at error
pub struct LogReporter;

impl StatusReporter for LogReporter {
    fn report(&self, identity: &str, result: &Result<Outcome>) {
        match result {
            Ok(outcome) => log::info!("{identity}: {}", outcome.status_message()),
            Err(err) => log::error!("{identity}: {err}"),
        }
    }
}

/// Discards everything
pub struct NoReporter;

impl StatusReporter for NoReporter {
    fn report(&self, _identity: &str, _result: &Result<Outcome>) {}
}

/// Keeps `(identity, status message)` pairs in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<(String, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StatusReporter for RecordingReporter {
    fn report(&self, identity: &str, result: &Result<Outcome>) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((identity.to_string(), status_message(result)));
    }
}

impl<R: StatusReporter + ?Sized> StatusReporter for std::sync::Arc<R> {
    fn report(&self, identity: &str, result: &Result<Outcome>) {
        (**self).report(identity, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_status_messages() {
        assert_eq!(
            status_message(&Ok(Outcome::Created)),
            "successfully created check"
        );
        assert_eq!(
            status_message(&Ok(Outcome::AlreadyAbsent)),
            "successfully deleted check"
        );
        let failed = Err(Error::Remote {
            action: Action::Delete,
            source: pingdom::Error::api(500, "oops"),
        });
        assert_eq!(
            status_message(&failed),
            "failed to delete check: Pingdom API error (500): oops"
        );
    }

    #[test]
    fn test_recording_reporter() {
        let reporter = RecordingReporter::new();
        reporter.report("default/foo", &Ok(Outcome::Updated));
        assert_eq!(
            reporter.reports(),
            vec![(
                "default/foo".to_string(),
                "successfully updated check".to_string()
            )]
        );
    }

    #[test]
    fn test_is_change() {
        assert!(Outcome::Created.is_change());
        assert!(!Outcome::AlreadyAbsent.is_change());
    }
}

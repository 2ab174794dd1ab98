//! Change notifications delivered to the reconciler

use crate::types::HttpCheck;
use std::sync::Arc;

/// A change to a declared check.
///
/// Objects are shared: an `Updated` whose `old` and `new` point at the same
/// allocation is a redelivery of an unchanged object.
#[derive(Debug, Clone)]
pub enum CheckEvent {
    Added(Arc<HttpCheck>),
    Updated {
        old: Arc<HttpCheck>,
        new: Arc<HttpCheck>,
    },
    Deleted(Arc<HttpCheck>),
}

impl CheckEvent {
    /// The object the event is about (`new` for updates).
    pub fn object(&self) -> &Arc<HttpCheck> {
        match self {
            Self::Added(check) | Self::Deleted(check) => check,
            Self::Updated { new, .. } => new,
        }
    }

    pub fn object_mut(&mut self) -> &mut Arc<HttpCheck> {
        match self {
            Self::Added(check) | Self::Deleted(check) => check,
            Self::Updated { new, .. } => new,
        }
    }

    /// Consume the event, keeping its object.
    pub fn into_object(self) -> Arc<HttpCheck> {
        match self {
            Self::Added(check) | Self::Deleted(check) => check,
            Self::Updated { new, .. } => new,
        }
    }

    /// Whether this is an update whose old and new objects are the same
    /// instance.
    ///
    /// Two distinct objects with equal contents are not degenerate.
    pub fn is_degenerate_update(&self) -> bool {
        matches!(self, Self::Updated { old, new } if Arc::ptr_eq(old, new))
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Added(_) => "add",
            Self::Updated { .. } => "update",
            Self::Deleted(_) => "delete",
        }
    }
}

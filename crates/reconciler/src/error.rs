//! Error types for reconciliation

use crate::report::Action;

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or running the reconciler.
///
/// The first four only occur during construction and are fatal; `Remote`
/// is what a single convergence step reports.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to get list of users for account: {0}")]
    Users(#[source] pingdom::Error),

    #[error("failed to get ID of user {0}")]
    OwnerNotFound(String),

    #[error("failed to get current list of heimdallr checks: {0}")]
    List(#[source] pingdom::Error),

    #[error("failed to get information for check {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: pingdom::Error,
    },

    /// A create, update or delete call was rejected or never completed.
    #[error("failed to {action} check: {source}")]
    Remote {
        action: Action,
        #[source]
        source: pingdom::Error,
    },
}

impl Error {
    pub(crate) fn remote(action: Action) -> impl FnOnce(pingdom::Error) -> Self {
        move |source| Self::Remote { action, source }
    }
}

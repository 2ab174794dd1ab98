// Reconcile a watch stream
pub mod run;

// Diagnostics
pub mod list;

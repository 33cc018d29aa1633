//! Error types for diagram clustering.

use thiserror::Error;

/// Hard failures of a clustering call.
///
/// Non-fatal conditions (deadline or iteration cap reached, exact fallbacks)
/// are reported on the [`super::Report`] instead.
#[derive(Debug, Error)]
pub enum Error {
    /// No diagrams were supplied.
    #[error("no diagrams to cluster")]
    NoDiagrams,

    /// None of the diagrams carries a pair with positive persistence.
    #[error("all {n} diagrams are empty")]
    EmptyInput { n: usize },

    /// K must be between 1 and the number of diagrams.
    #[error("invalid cluster count: requested {requested}, but only {n_items} diagrams")]
    InvalidClusterCount { requested: usize, n_items: usize },

    /// A configuration value is out of range.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// The worker pool could not be started.
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;

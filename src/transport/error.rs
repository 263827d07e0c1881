//! Transport error types.

use thiserror::Error;

/// Failure to fabricate the upgrade redirect.
#[derive(Debug, Error)]
pub enum RedirectError {
    #[error("cannot build secure URI: {0}")]
    Uri(#[from] axum::http::uri::InvalidUriParts),

    #[error("cannot build redirect response: {0}")]
    Response(#[from] axum::http::Error),
}

/// Error returned by the enforcing service.
#[derive(Debug, Error)]
pub enum TransportError<E> {
    /// The wrapped executor failed; its error is passed through untouched.
    #[error(transparent)]
    Upstream(E),

    /// The request had to be upgraded but no redirect could be constructed.
    #[error("HSTS redirect failed: {0}")]
    Redirect(#[from] RedirectError),
}

impl<E> TransportError<E> {
    /// The executor's error, if that is what failed.
    pub fn into_upstream(self) -> Option<E> {
        match self {
            TransportError::Upstream(e) => Some(e),
            TransportError::Redirect(_) => None,
        }
    }
}

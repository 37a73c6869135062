//! Shared error taxonomy for request handling.
//!
//! Four buckets cover the backend: unknown record ids, rejected input,
//! broker-side failures, and missing credential configuration. The HTTP
//! layer maps each variant to a status code.

use thiserror::Error;

/// Errors surfaced by repositories, token routes, and market-data proxies.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Record lookup by id found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing or malformed required field, or an unparseable value.
    #[error("validation error: {0}")]
    Validation(String),

    /// The broker collaborator failed; the upstream message is attached
    /// verbatim and never swallowed.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// No credential record (or stored token) exists for the requested broker.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Anything else (database failures, serialization bugs).
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

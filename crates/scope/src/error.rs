//! Error types for the scoping engine.
//!
//! Denial and contract-violation outcomes are deliberately *not* errors:
//! scope resolution is total and infallible, and a denied kind is a normal
//! result. The types here cover what genuinely can fail — store fetches,
//! hand-built principals, and configuration parsing.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use vetra_model::{EntityKind, TenantId};

/// The primary error type for scoping-engine operations.
#[derive(Error, Debug)]
pub enum ScopeError {
    /// Store fetch errors
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Principal construction errors
    #[error(transparent)]
    Principal(#[from] PrincipalError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors reported by a record store.
///
/// An empty result is not an error; these cover the store being unable to
/// answer at all. Timeouts are applied by the bootstrap aggregator around
/// the fetch, so backends never need their own deadline variant.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store is currently unavailable.
    #[error("store unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// The store cannot resolve a nested-relation traversal in the filter.
    #[error("invalid relation traversal for {kind}: {path}")]
    InvalidTraversal { kind: EntityKind, path: String },

    /// Row content could not be serialized or deserialized.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// Internal store error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Errors raised when constructing a principal by hand.
///
/// These surface upstream contract violations eagerly. A principal that
/// reaches the resolver anyway (for example via deserialization) is never an
/// error there; the resolver fails closed instead.
#[derive(Error, Debug)]
pub enum PrincipalError {
    /// A client-role principal must carry its client binding.
    #[error("client principal for tenant {tenant_id} has no client binding")]
    MissingClientBinding { tenant_id: TenantId },

    /// The tenant id must be non-empty.
    #[error("principal has an empty tenant id")]
    EmptyTenant,

    /// The client binding, when present, must be non-empty.
    #[error("principal for tenant {tenant_id} has an empty client binding")]
    EmptyClientBinding { tenant_id: TenantId },
}

/// Errors raised when parsing bootstrap options.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A duration field could not be parsed.
    #[error("invalid duration for {field}: '{value}': {message}")]
    InvalidDuration {
        field: String,
        value: String,
        message: String,
    },

    /// The fetch concurrency bound must allow at least one fetch.
    #[error("fetch concurrency must be at least 1, got {value}")]
    InvalidConcurrency { value: usize },
}

/// Result type alias for scoping-engine operations.
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Result type alias for store fetches.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization {
            message: err.to_string(),
        }
    }
}

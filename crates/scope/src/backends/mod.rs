//! Record store backends.
//!
//! Each backend is feature-gated so deployments compile only what they
//! run. The in-memory backend doubles as the reference implementation of
//! the filter semantics and as the fixture store for tests.

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub use memory::MemoryStore;

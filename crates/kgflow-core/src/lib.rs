#![forbid(unsafe_code)]
//! kgflow-core: shared vocabulary for workflow planning.
//!
//! - `config`: the run configuration a workflow plan is built from
//! - `types`: a lightweight table value used to resolve deferred parameters
//! - `hash`/`manifest`: stable fingerprints and compilation records
//!
//! Pure data; no I/O and no execution live here.

pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod manifest;
pub mod prelude;
pub mod types;

/// Crate version stamped into compilation manifests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

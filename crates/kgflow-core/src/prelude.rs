//! Convenient re-exports for downstream crates.

pub use crate::config::{EmbedConfig, EmbedStrategy, ResolvedEmbedSettings, RunConfig};
pub use crate::error::{Error, Result};
pub use crate::hash::{hash_serde, Hash256};
pub use crate::id::StepId;
pub use crate::manifest::{ManifestId, PlanManifest};
pub use crate::types::{Column, RowBatch, Scalar};

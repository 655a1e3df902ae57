//! YAML loading for run configurations and YAML output for plans.
//!
//! Example:
//! ```yaml
//! text_embed:
//!   strategy: { type: openai_embedding, model: text-embedding-3-small }
//! entity_name_embed:
//!   strategy: { type: openai_embedding, vector_store: { type: lancedb } }
//! skip_description_embedding: false
//! ```

use kgflow_core::config::RunConfig;
use kgflow_core::error::{Error, Result};

use crate::descriptor::StepDescriptor;

/// Parse a YAML document into a `RunConfig`. An empty or `null` document is
/// the all-defaults config.
pub fn parse_yaml_config(yaml_src: &str) -> Result<RunConfig> {
    if yaml_src.trim().is_empty() {
        return Ok(RunConfig::default());
    }
    let config: Option<RunConfig> = serde_yaml::from_str(yaml_src)?;
    Ok(config.unwrap_or_default())
}

/// Serialize descriptors as a YAML sequence.
pub fn descriptors_to_yaml(descriptors: &[StepDescriptor]) -> Result<String> {
    serde_yaml::to_string(descriptors).map_err(|e| Error::Plan(e.to_string()))
}

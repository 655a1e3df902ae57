//! Run configuration that workflow plans are built from.
//!
//! Every field is optional. Defaults are applied once, by `RunConfig::resolve`,
//! so planning code never has to chase nested fallbacks.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Environment override for `skip_name_embedding`.
pub const ENV_SKIP_NAME_EMBEDDING: &str = "KGFLOW_SKIP_NAME_EMBEDDING";
/// Environment override for `skip_description_embedding`.
pub const ENV_SKIP_DESCRIPTION_EMBEDDING: &str = "KGFLOW_SKIP_DESCRIPTION_EMBEDDING";

/// How an embedding provider persists its vectors.
///
/// Only `vector_store` is interpreted; everything else is provider-specific
/// and passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedStrategy {
    /// `Some(Some(_))` when vectors are written to an external store instead
    /// of being kept as inline table columns. An explicit `null` is kept as
    /// `Some(None)` so it reaches the engine, but does not count as a store.
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub vector_store: Option<Option<Value>>,

    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// Options for one embedding invocation (`text_embed` and its overrides).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// `Some(None)` records an explicit `strategy: null`.
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub strategy: Option<Option<EmbedStrategy>>,

    /// Opaque provider options (model, batch sizes, ...).
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// Present-but-null becomes `Some(None)`; an absent key stays `None` through
/// `#[serde(default)]`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl EmbedConfig {
    pub fn is_empty(&self) -> bool {
        self.strategy.is_none() && self.options.is_empty()
    }

    /// True when `strategy.vector_store` is present and non-null.
    pub fn uses_vector_store(&self) -> bool {
        matches!(
            &self.strategy,
            Some(Some(EmbedStrategy {
                vector_store: Some(Some(store)),
                ..
            })) if !store.is_null()
        )
    }

    /// Flatten into the top-level parameter mapping an engine receives.
    /// Explicit nulls are passed through as `null`.
    pub fn to_parameters(&self) -> Map<String, Value> {
        let mut out = self.options.clone();
        match &self.strategy {
            None => {}
            Some(None) => {
                out.insert("strategy".to_string(), Value::Null);
            }
            Some(Some(strategy)) => {
                let mut s = strategy.options.clone();
                if let Some(vs) = &strategy.vector_store {
                    s.insert(
                        "vector_store".to_string(),
                        vs.clone().unwrap_or(Value::Null),
                    );
                }
                out.insert("strategy".to_string(), Value::Object(s));
            }
        }
        out
    }
}

/// Caller-supplied configuration for the final-entities workflow.
///
/// Unknown keys are ignored so a shared pipeline config can be handed in as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Base embedding options shared by every embedding step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_embed: Option<EmbedConfig>,

    /// Overrides `text_embed` for entity names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name_embed: Option<EmbedConfig>,

    /// Overrides `text_embed` for the name+description composite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name_description_embed: Option<EmbedConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_name_embedding: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_description_embedding: Option<bool>,
}

/// Embedding settings after defaults have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEmbedSettings {
    pub name_embed: EmbedConfig,
    pub name_description_embed: EmbedConfig,
    pub skip_name: bool,
    pub skip_description: bool,
    /// Decided by the *name* embedding's strategy only.
    pub using_vector_store: bool,
}

impl RunConfig {
    /// Deserialize from an arbitrary JSON mapping.
    pub fn from_json(value: Value) -> crate::error::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Apply defaults: overrides fall back to `text_embed`, which falls back
    /// to an empty mapping; skip flags default to false.
    pub fn resolve(&self) -> ResolvedEmbedSettings {
        let base = self.text_embed.clone().unwrap_or_default();
        let name_embed = self
            .entity_name_embed
            .clone()
            .unwrap_or_else(|| base.clone());
        let name_description_embed = self.entity_name_description_embed.clone().unwrap_or(base);
        let using_vector_store = name_embed.uses_vector_store();

        ResolvedEmbedSettings {
            name_embed,
            name_description_embed,
            skip_name: self.skip_name_embedding.unwrap_or(false),
            skip_description: self.skip_description_embedding.unwrap_or(false),
            using_vector_store,
        }
    }

    /// Apply environment overrides, falling back to the current values.
    ///
    /// Environment variables:
    /// - `KGFLOW_SKIP_NAME_EMBEDDING`: `true|false|1|0|yes|no`
    /// - `KGFLOW_SKIP_DESCRIPTION_EMBEDDING`: same
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Same as `with_env_overrides`, reading from an arbitrary lookup.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_SKIP_NAME_EMBEDDING).and_then(|s| parse_flag(&s)) {
            self.skip_name_embedding = Some(v);
        }
        if let Some(v) = lookup(ENV_SKIP_DESCRIPTION_EMBEDDING).and_then(|s| parse_flag(&s)) {
            self.skip_description_embedding = Some(v);
        }
        self
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

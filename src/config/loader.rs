//! Load entity configurations from JSON: `{ "<entity_type>": { ...EntityConfig } }`.

use crate::config::{EntityConfig, EntityType, RegistryBuilder};
use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::path::Path;

/// Parse a JSON document of entity configurations and register each into `builder`.
/// Returns the number of entities read.
pub fn load_from_str(builder: &mut RegistryBuilder, json: &str) -> Result<usize, ConfigError> {
    let configs: BTreeMap<EntityType, EntityConfig> = serde_json::from_str(json)?;
    let n = configs.len();
    builder.extend(configs);
    Ok(n)
}

/// Read a JSON file of entity configurations and register each into `builder`.
pub async fn load_from_path(builder: &mut RegistryBuilder, path: impl AsRef<Path>) -> Result<usize, ConfigError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    let n = load_from_str(builder, &json)?;
    tracing::info!(path = %path.display(), entities = n, "entity configs loaded");
    Ok(n)
}

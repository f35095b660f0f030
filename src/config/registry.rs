//! Entity configuration registry.
//!
//! Built once at startup with [`RegistryBuilder`], then frozen into a [`ConfigRegistry`]
//! and shared read-only (usually behind an `Arc` in [`crate::AppState`]).

use crate::config::{EntityConfig, EntityType};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    by_type: HashMap<EntityType, EntityConfig>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        RegistryBuilder::default()
    }

    /// Store the configuration for `entity_type`. The last registration for a key wins;
    /// the previous configuration, if any, is returned.
    pub fn register(&mut self, entity_type: EntityType, config: EntityConfig) -> Option<EntityConfig> {
        let previous = self.by_type.insert(entity_type.clone(), config);
        if previous.is_some() {
            tracing::debug!(entity_type = %entity_type, "entity config replaced");
        }
        previous
    }

    pub fn extend(&mut self, configs: impl IntoIterator<Item = (EntityType, EntityConfig)>) {
        for (entity_type, config) in configs {
            self.register(entity_type, config);
        }
    }

    pub fn build(self) -> ConfigRegistry {
        tracing::info!(entities = self.by_type.len(), "entity config registry built");
        ConfigRegistry { by_type: self.by_type }
    }
}

/// Immutable entity configuration lookup.
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    by_type: HashMap<EntityType, EntityConfig>,
}

impl ConfigRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, entity_type: &str) -> Option<&EntityConfig> {
        self.by_type.get(entity_type)
    }

    /// The stored key for `entity_type`, if registered.
    pub fn entity_type(&self, entity_type: &str) -> Option<&EntityType> {
        self.by_type.get_key_value(entity_type).map(|(k, _)| k)
    }

    /// False when the entity has no configuration or the column is not sortable.
    pub fn is_valid_sort_column(&self, entity_type: &str, column: &str) -> bool {
        self.get(entity_type).map(|c| c.is_sortable(column)).unwrap_or(false)
    }

    /// False when the entity has no configuration or the column is not searchable.
    pub fn is_valid_search_column(&self, entity_type: &str, column: &str) -> bool {
        self.get(entity_type).map(|c| c.is_searchable(column)).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &EntityType> {
        self.by_type.keys()
    }
}

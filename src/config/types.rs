//! Entity query configuration: what a given entity type may be sorted, searched and preloaded by.

use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const DEFAULT_SOFT_DELETE_COLUMN: &str = "deleted_at";

fn entity_type_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static pattern"))
}

/// Registry key for an entity, e.g. `user` or `base_model`.
/// Always a plain identifier, so it is also safe to use as a default table name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityType(String);

impl EntityType {
    pub fn new(s: &str) -> Result<Self, ConfigError> {
        if entity_type_pattern().is_match(s) {
            Ok(EntityType(s.to_string()))
        } else {
            Err(ConfigError::InvalidEntityType(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for EntityType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::new(s)
    }
}

impl Borrow<str> for EntityType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EntityType::new(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Our row holds the foreign key (`belongs to`).
    ToOne,
    /// Their rows hold a foreign key to us (`has many`).
    ToMany,
}

/// How a preload name maps onto a related table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationConfig {
    pub table: String,
    pub kind: RelationKind,
    /// For to_one: column on our table. For to_many: column on the related table.
    pub foreign_key: String,
    /// Column the foreign key points at (their PK for to_one, our PK for to_many).
    #[serde(default = "default_references")]
    pub references: String,
    /// Soft-delete marker on the related table; `deleted_at` when omitted.
    /// An explicit `null` loads related rows without a soft-delete scope.
    #[serde(default = "default_relation_soft_delete")]
    pub soft_delete_column: Option<String>,
}

fn default_references() -> String {
    "id".into()
}

fn default_relation_soft_delete() -> Option<String> {
    Some(DEFAULT_SOFT_DELETE_COLUMN.into())
}

impl RelationConfig {
    pub fn new(table: impl Into<String>, kind: RelationKind, foreign_key: impl Into<String>) -> Self {
        RelationConfig {
            table: table.into(),
            kind,
            foreign_key: foreign_key.into(),
            references: default_references(),
            soft_delete_column: default_relation_soft_delete(),
        }
    }

    pub fn without_soft_delete(mut self) -> Self {
        self.soft_delete_column = None;
        self
    }
}

/// Queryable configuration for one entity type.
///
/// Only `sortable_columns` and `searchable_columns` are enforced; they are the
/// whitelist that keeps caller-supplied identifiers out of generated SQL.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    #[serde(default)]
    pub searchable_columns: Vec<String>,
    #[serde(default)]
    pub sortable_columns: Vec<String>,
    /// Used (ascending) when a request gives no `sortBy`.
    #[serde(default)]
    pub default_sort: Vec<String>,
    #[serde(default)]
    pub default_includes: Vec<String>,
    /// Physical table; the entity type when unset.
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub soft_delete_column: Option<String>,
    #[serde(default)]
    pub relations: BTreeMap<String, RelationConfig>,
}

impl EntityConfig {
    pub fn new<S: Into<String>>(
        searchable_columns: impl IntoIterator<Item = S>,
        sortable_columns: impl IntoIterator<Item = S>,
        default_sort: impl IntoIterator<Item = S>,
        default_includes: impl IntoIterator<Item = S>,
    ) -> Self {
        EntityConfig {
            searchable_columns: searchable_columns.into_iter().map(Into::into).collect(),
            sortable_columns: sortable_columns.into_iter().map(Into::into).collect(),
            default_sort: default_sort.into_iter().map(Into::into).collect(),
            default_includes: default_includes.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_relation(mut self, name: impl Into<String>, relation: RelationConfig) -> Self {
        self.relations.insert(name.into(), relation);
        self
    }

    pub fn is_sortable(&self, column: &str) -> bool {
        self.sortable_columns.iter().any(|c| c == column)
    }

    pub fn is_searchable(&self, column: &str) -> bool {
        self.searchable_columns.iter().any(|c| c == column)
    }

    pub fn soft_delete_column(&self) -> &str {
        self.soft_delete_column.as_deref().unwrap_or(DEFAULT_SOFT_DELETE_COLUMN)
    }
}

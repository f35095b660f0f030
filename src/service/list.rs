//! Paginated listing and counting for configured entities.

use crate::builder::QueryBuilder;
use crate::config::{ConfigRegistry, EntityConfig, RelationConfig, RelationKind};
use crate::error::AppError;
use crate::options::QueryOptions;
use crate::response::PaginatedResponse;
use crate::service::row_to_json;
use crate::sql::{key_text, select_by_column_in, PgBindValue, QueryBuf, SelectQuery};
use serde_json::Value;
use sqlx::PgPool;
use std::collections::{BTreeSet, HashMap};

pub struct ListService;

impl ListService {
    /// One page of rows plus the total matching count.
    /// `opts.include_archived` selects the soft-deleted partition instead of the active one.
    pub async fn list(
        pool: &PgPool,
        registry: &ConfigRegistry,
        entity_type: &str,
        opts: &QueryOptions,
    ) -> Result<PaginatedResponse<Value>, AppError> {
        let builder = QueryBuilder::new(registry, entity_type);
        let query = Self::select_query(registry, entity_type, opts);

        let mut rows = Self::query_many(pool, &query.to_select()).await?;
        Self::attach_preloads(pool, entity_type, builder.config(), query.preloads(), &mut rows).await?;
        let total = Self::count(pool, registry, entity_type, opts).await?;

        let (page, page_size) = opts.pagination();
        Ok(PaginatedResponse::new(rows, total, page, page_size))
    }

    /// Rows matching the filters, search and partition of `opts`, ignoring paging.
    pub async fn count(
        pool: &PgPool,
        registry: &ConfigRegistry,
        entity_type: &str,
        opts: &QueryOptions,
    ) -> Result<i64, AppError> {
        let q = Self::count_query(registry, entity_type, opts).to_count();
        tracing::debug!(sql = %q.sql, params = ?q.params, "count");
        let mut sql = sqlx::query_scalar::<_, i64>(&q.sql);
        for p in &q.params {
            sql = sql.bind(p.clone());
        }
        Ok(sql.fetch_one(pool).await?)
    }

    /// The page query `list` runs, with every option applied.
    pub fn select_query(registry: &ConfigRegistry, entity_type: &str, opts: &QueryOptions) -> SelectQuery {
        let builder = QueryBuilder::new(registry, entity_type);
        let mut query = SelectQuery::for_entity(entity_type, builder.config());
        builder.apply(&mut query, opts, opts.include_archived);
        query
    }

    /// The query `count` runs.
    pub fn count_query(registry: &ConfigRegistry, entity_type: &str, opts: &QueryOptions) -> SelectQuery {
        let builder = QueryBuilder::new(registry, entity_type);
        builder.prepare_count(
            SelectQuery::for_entity(entity_type, builder.config()),
            opts,
            opts.include_archived,
        )
    }

    /// Load each requested relation in one batched query and set it on every row under the relation name.
    async fn attach_preloads(
        pool: &PgPool,
        entity_type: &str,
        config: Option<&EntityConfig>,
        relations: &[String],
        rows: &mut [Value],
    ) -> Result<(), AppError> {
        for name in relations {
            let relation = config
                .and_then(|c| c.relations.get(name))
                .ok_or_else(|| AppError::BadRequest(format!("unsupported relation '{}' for {}", name, entity_type)))?;
            let related = match preload_query(relation, rows) {
                Some(q) => Self::query_many(pool, &q).await?,
                None => Vec::new(),
            };
            attach_related(rows, name, relation, related);
        }
        Ok(())
    }

    async fn query_many(pool: &PgPool, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let rows = query.fetch_all(pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }
}

/// Batch lookup of the related rows for `rows`, scoped to non-deleted ones. None when no row has a key.
fn preload_query(relation: &RelationConfig, rows: &[Value]) -> Option<QueryBuf> {
    let (our_key, their_key) = relation_keys(relation);
    let keys: BTreeSet<String> = rows
        .iter()
        .filter_map(|r| r.get(our_key).and_then(key_text))
        .collect();
    if keys.is_empty() {
        return None;
    }
    let params: Vec<PgBindValue> = keys.into_iter().map(PgBindValue::String).collect();
    Some(select_by_column_in(
        &relation.table,
        their_key,
        &params,
        relation.soft_delete_column.as_deref(),
    ))
}

/// (column on our rows, column on related rows) joined by the relation.
fn relation_keys(relation: &RelationConfig) -> (&str, &str) {
    match relation.kind {
        RelationKind::ToOne => (relation.foreign_key.as_str(), relation.references.as_str()),
        RelationKind::ToMany => (relation.references.as_str(), relation.foreign_key.as_str()),
    }
}

/// to_one: the matching object or null. to_many: array of matches (possibly empty).
fn attach_related(rows: &mut [Value], name: &str, relation: &RelationConfig, related: Vec<Value>) {
    let (our_key, their_key) = relation_keys(relation);
    let mut by_key: HashMap<String, Vec<Value>> = HashMap::new();
    for r in related {
        if let Some(k) = r.get(their_key).and_then(key_text) {
            by_key.entry(k).or_default().push(r);
        }
    }
    for row in rows.iter_mut() {
        let matches = row.get(our_key).and_then(key_text).and_then(|k| by_key.get(&k));
        let value = match relation.kind {
            RelationKind::ToOne => matches.and_then(|m| m.first()).cloned().unwrap_or(Value::Null),
            RelationKind::ToMany => Value::Array(matches.cloned().unwrap_or_default()),
        };
        if let Value::Object(map) = row {
            map.insert(name.to_string(), value);
        }
    }
}

//! PostgreSQL rendering of a built query: identifiers quoted, values bound as `$n` parameters.

use crate::builder::QueryTarget;
use crate::config::{EntityConfig, DEFAULT_SOFT_DELETE_COLUMN};
use crate::options::{FilterValue, OrderTerm};
use crate::sql::PgBindValue;

/// Quote identifier for PostgreSQL. Dotted names are quoted per segment (`schema.table`).
pub fn quoted(s: &str) -> String {
    s.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf::default()
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Condition {
    Eq(String, FilterValue),
    AnyIlike(Vec<String>, String),
    SoftDeleted(bool),
}

/// A SELECT under construction for one table.
#[derive(Clone, Debug)]
pub struct SelectQuery {
    table: String,
    soft_delete_column: String,
    offset: Option<i64>,
    limit: Option<i64>,
    order: Vec<OrderTerm>,
    conditions: Vec<Condition>,
    preloads: Vec<String>,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>, soft_delete_column: impl Into<String>) -> Self {
        SelectQuery {
            table: table.into(),
            soft_delete_column: soft_delete_column.into(),
            offset: None,
            limit: None,
            order: Vec::new(),
            conditions: Vec::new(),
            preloads: Vec::new(),
        }
    }

    /// Table and soft-delete column from the entity config; the entity type names the table otherwise.
    pub fn for_entity(entity_type: &str, config: Option<&EntityConfig>) -> Self {
        match config {
            Some(c) => SelectQuery::new(
                c.table.as_deref().unwrap_or(entity_type),
                c.soft_delete_column(),
            ),
            None => SelectQuery::new(entity_type, DEFAULT_SOFT_DELETE_COLUMN),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn preloads(&self) -> &[String] {
        &self.preloads
    }

    /// `SELECT * ... ORDER BY ... LIMIT ... OFFSET ...`
    pub fn to_select(&self) -> QueryBuf {
        let mut q = QueryBuf::new();
        let where_clause = self.where_clause(&mut q);
        let order_clause = if self.order.is_empty() {
            String::new()
        } else {
            let terms: Vec<String> = self
                .order
                .iter()
                .map(|t| format!("{} {}", quoted(&t.column), t.direction.as_sql()))
                .collect();
            format!(" ORDER BY {}", terms.join(", "))
        };
        let limit_clause = self.limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default();
        let offset_clause = self.offset.map(|n| format!(" OFFSET {}", n)).unwrap_or_default();
        q.sql = format!(
            "SELECT * FROM {}{}{}{}{}",
            quoted(&self.table),
            where_clause,
            order_clause,
            limit_clause,
            offset_clause
        );
        q
    }

    /// `SELECT COUNT(*)` over the same conditions; paging, order and preloads do not apply.
    pub fn to_count(&self) -> QueryBuf {
        let mut q = QueryBuf::new();
        let where_clause = self.where_clause(&mut q);
        q.sql = format!("SELECT COUNT(*) FROM {}{}", quoted(&self.table), where_clause);
        q
    }

    fn where_clause(&self, q: &mut QueryBuf) -> String {
        let mut parts = Vec::with_capacity(self.conditions.len());
        for cond in &self.conditions {
            let part = match cond {
                Condition::Eq(col, FilterValue::Null) => format!("{} IS NULL", quoted(col)),
                Condition::Eq(col, value @ FilterValue::Text(_)) => {
                    let n = q.push_param(PgBindValue::from(value));
                    format!("{}::text = ${}", quoted(col), n)
                }
                Condition::Eq(col, value) => {
                    let n = q.push_param(PgBindValue::from(value));
                    format!("{} = ${}", quoted(col), n)
                }
                Condition::AnyIlike(cols, pattern) => {
                    let ors: Vec<String> = cols
                        .iter()
                        .map(|c| {
                            let n = q.push_param(PgBindValue::String(pattern.clone()));
                            format!("{}::text ILIKE ${}", quoted(c), n)
                        })
                        .collect();
                    format!("({})", ors.join(" OR "))
                }
                Condition::SoftDeleted(true) => format!("{} IS NOT NULL", quoted(&self.soft_delete_column)),
                Condition::SoftDeleted(false) => format!("{} IS NULL", quoted(&self.soft_delete_column)),
            };
            parts.push(part);
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", parts.join(" AND "))
        }
    }
}

impl QueryTarget for SelectQuery {
    fn offset(&mut self, offset: i64) {
        self.offset = Some(offset);
    }

    fn limit(&mut self, limit: i64) {
        self.limit = Some(limit);
    }

    fn order(&mut self, terms: &[OrderTerm]) {
        self.order.extend_from_slice(terms);
    }

    fn where_eq(&mut self, column: &str, value: &FilterValue) {
        self.conditions.push(Condition::Eq(column.to_string(), value.clone()));
    }

    fn where_any_ilike(&mut self, columns: &[String], pattern: &str) {
        self.conditions.push(Condition::AnyIlike(columns.to_vec(), pattern.to_string()));
    }

    fn preload(&mut self, relation: &str) {
        self.preloads.push(relation.to_string());
    }

    fn soft_delete_scope(&mut self, archived: bool) {
        self.conditions.push(Condition::SoftDeleted(archived));
    }
}

/// `SELECT * FROM table WHERE column::text IN ($1, ...)`. Used for batch-loading related rows.
pub fn select_by_column_in(
    table: &str,
    column_name: &str,
    values: &[PgBindValue],
    soft_delete_column: Option<&str>,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    if values.is_empty() {
        q.sql = format!("SELECT * FROM {} WHERE 1 = 0", quoted(table));
        return q;
    }
    let placeholders: Vec<String> = values
        .iter()
        .map(|v| format!("${}", q.push_param(v.clone())))
        .collect();
    let scope = soft_delete_column
        .map(|c| format!(" AND {} IS NULL", quoted(c)))
        .unwrap_or_default();
    q.sql = format!(
        "SELECT * FROM {} WHERE {}::text IN ({}){}",
        quoted(table),
        quoted(column_name),
        placeholders.join(", "),
        scope
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::QueryBuilder;
    use crate::config::RegistryBuilder;
    use crate::options::{default_query_options, QueryOptions};

    fn registry() -> crate::config::ConfigRegistry {
        let mut b = RegistryBuilder::new();
        b.register(
            "user".parse().unwrap(),
            EntityConfig::new(["name", "email"], ["name", "created_at"], ["created_at"], [])
                .with_table("app.users"),
        );
        b.build()
    }

    fn built(opts: &QueryOptions, archived: bool) -> SelectQuery {
        let reg = registry();
        let mut q = SelectQuery::for_entity("user", reg.get("user"));
        QueryBuilder::new(&reg, "user").apply(&mut q, opts, archived);
        q
    }

    #[test]
    fn quoting_escapes_and_splits_schema() {
        assert_eq!(quoted("users"), "\"users\"");
        assert_eq!(quoted("app.users"), "\"app\".\"users\"");
        assert_eq!(quoted("x\"; DROP TABLE y; --"), "\"x\"\"; DROP TABLE y; --\"");
    }

    #[test]
    fn renders_full_select() {
        let opts = QueryOptions {
            page: 2,
            page_size: 25,
            sort_by: vec!["name".into(), "evil".into()],
            sort_order: vec!["desc".into()],
            search: "jo".into(),
            ..default_query_options()
        }
        .with_filter("status", "active")
        .with_filter("tier", 3);
        let q = built(&opts, false).to_select();
        assert_eq!(
            q.sql,
            "SELECT * FROM \"app\".\"users\" WHERE \"status\"::text = $1 AND \"tier\" = $2 \
             AND (\"name\"::text ILIKE $3 OR \"email\"::text ILIKE $4) AND \"deleted_at\" IS NULL \
             ORDER BY \"name\" DESC LIMIT 25 OFFSET 25"
        );
        assert_eq!(
            q.params,
            vec![
                PgBindValue::String("active".into()),
                PgBindValue::I64(3),
                PgBindValue::String("%jo%".into()),
                PgBindValue::String("%jo%".into()),
            ]
        );
    }

    #[test]
    fn count_ignores_paging_and_order() {
        let opts = default_query_options().with_filter("status", "active");
        let q = built(&opts, true).to_count();
        assert_eq!(
            q.sql,
            "SELECT COUNT(*) FROM \"app\".\"users\" WHERE \"status\"::text = $1 AND \"deleted_at\" IS NOT NULL"
        );
        assert_eq!(q.params.len(), 1);
    }

    #[test]
    fn null_filter_renders_is_null_without_param() {
        let opts = default_query_options().with_filter("manager_id", FilterValue::Null);
        let q = built(&opts, false).to_count();
        assert!(q.sql.contains("\"manager_id\" IS NULL AND \"deleted_at\" IS NULL"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn unconfigured_entity_uses_type_as_table_and_fallback_sort() {
        let reg = RegistryBuilder::new().build();
        let mut q = SelectQuery::for_entity("audit_log", None);
        QueryBuilder::new(&reg, "audit_log").build(&mut q, &default_query_options().without_sort());
        assert_eq!(
            q.to_select().sql,
            "SELECT * FROM \"audit_log\" WHERE \"deleted_at\" IS NULL ORDER BY \"created_at\" DESC LIMIT 20 OFFSET 0"
        );
    }

    #[test]
    fn preloads_are_collected_not_rendered() {
        let opts = QueryOptions { preload: vec!["Role".into()], ..default_query_options() };
        let q = built(&opts, false);
        assert_eq!(q.preloads(), ["Role".to_string()]);
        assert!(!q.to_select().sql.contains("Role"));
    }

    #[test]
    fn batch_lookup_sql() {
        let q = select_by_column_in(
            "roles",
            "id",
            &[PgBindValue::String("1".into()), PgBindValue::String("2".into())],
            Some("deleted_at"),
        );
        assert_eq!(
            q.sql,
            "SELECT * FROM \"roles\" WHERE \"id\"::text IN ($1, $2) AND \"deleted_at\" IS NULL"
        );
        assert_eq!(select_by_column_in("roles", "id", &[], None).sql, "SELECT * FROM \"roles\" WHERE 1 = 0");
    }
}

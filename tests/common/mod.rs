//! In-memory `QueryTarget` over JSON rows, for exercising built queries without a database.

#![allow(dead_code)]

use query_options::{FilterValue, OrderTerm, QueryTarget, SortDirection};
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Clone, Debug)]
enum Cond {
    Eq(String, FilterValue),
    AnyIlike(Vec<String>, String),
    Archived(bool),
}

#[derive(Clone, Debug, Default)]
pub struct MemoryQuery {
    offset: i64,
    limit: Option<i64>,
    order: Vec<OrderTerm>,
    conds: Vec<Cond>,
    pub preloads: Vec<String>,
}

fn text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn matches_eq(row: &Value, col: &str, want: &FilterValue) -> bool {
    let got = row.get(col).unwrap_or(&Value::Null);
    match want {
        FilterValue::Null => got.is_null(),
        FilterValue::Bool(b) => got.as_bool() == Some(*b),
        FilterValue::Int(n) => got.as_i64() == Some(*n),
        FilterValue::Float(f) => got.as_f64() == Some(*f),
        FilterValue::Text(s) => text(got).as_deref() == Some(s.as_str()),
    }
}

fn matches_ilike(row: &Value, cols: &[String], pattern: &str) -> bool {
    let needle = pattern.trim_matches('%').to_lowercase();
    cols.iter().any(|c| {
        row.get(c)
            .and_then(text)
            .map(|v| v.to_lowercase().contains(&needle))
            .unwrap_or(false)
    })
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => text(a).cmp(&text(b)),
    }
}

impl MemoryQuery {
    fn keep(&self, row: &Value) -> bool {
        self.conds.iter().all(|c| match c {
            Cond::Eq(col, v) => matches_eq(row, col, v),
            Cond::AnyIlike(cols, p) => matches_ilike(row, cols, p),
            Cond::Archived(archived) => {
                let deleted = row.get("deleted_at").map(|v| !v.is_null()).unwrap_or(false);
                deleted == *archived
            }
        })
    }

    pub fn fetch(&self, rows: &[Value]) -> Vec<Value> {
        let mut out: Vec<Value> = rows.iter().filter(|r| self.keep(r)).cloned().collect();
        out.sort_by(|a, b| {
            for t in &self.order {
                let null = Value::Null;
                let ord = compare(a.get(&t.column).unwrap_or(&null), b.get(&t.column).unwrap_or(&null));
                let ord = match t.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        let skipped = out.into_iter().skip(self.offset.max(0) as usize);
        match self.limit {
            Some(n) => skipped.take(n.max(0) as usize).collect(),
            None => skipped.collect(),
        }
    }

    pub fn count(&self, rows: &[Value]) -> i64 {
        rows.iter().filter(|r| self.keep(r)).count() as i64
    }

    pub fn order_terms(&self) -> &[OrderTerm] {
        &self.order
    }

    pub fn search_groups(&self) -> Vec<Vec<String>> {
        self.conds
            .iter()
            .filter_map(|c| match c {
                Cond::AnyIlike(cols, _) => Some(cols.clone()),
                _ => None,
            })
            .collect()
    }
}

impl QueryTarget for MemoryQuery {
    fn offset(&mut self, offset: i64) {
        self.offset = offset;
    }

    fn limit(&mut self, limit: i64) {
        self.limit = Some(limit);
    }

    fn order(&mut self, terms: &[OrderTerm]) {
        self.order.extend_from_slice(terms);
    }

    fn where_eq(&mut self, column: &str, value: &FilterValue) {
        self.conds.push(Cond::Eq(column.to_string(), value.clone()));
    }

    fn where_any_ilike(&mut self, columns: &[String], pattern: &str) {
        self.conds.push(Cond::AnyIlike(columns.to_vec(), pattern.to_string()));
    }

    fn preload(&mut self, relation: &str) {
        self.preloads.push(relation.to_string());
    }

    fn soft_delete_scope(&mut self, archived: bool) {
        self.conds.push(Cond::Archived(archived));
    }
}

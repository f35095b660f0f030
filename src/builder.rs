//! Applies [`QueryOptions`] to a query under construction, checking sort and search
//! columns against the entity's whitelist.

use crate::config::{ConfigRegistry, EntityConfig};
use crate::options::{FilterValue, OrderTerm, QueryOptions, SortDirection};

/// Sort used when the request has no `sortBy` and the entity has no default sort.
pub const FALLBACK_SORT_COLUMN: &str = "created_at";

/// Outbound query-construction interface. Implemented by the SQL renderer
/// ([`crate::sql::SelectQuery`]) and by anything else that can be filtered, ordered and paged.
pub trait QueryTarget {
    fn offset(&mut self, offset: i64);
    fn limit(&mut self, limit: i64);
    /// Called at most once per build, with at least one term.
    fn order(&mut self, terms: &[OrderTerm]);
    fn where_eq(&mut self, column: &str, value: &FilterValue);
    /// Case-insensitive LIKE of `pattern` against any of `columns` (OR-group), conjoined
    /// with the other conditions. `columns` is never empty.
    fn where_any_ilike(&mut self, columns: &[String], pattern: &str);
    fn preload(&mut self, relation: &str);
    /// `false`: only rows without a soft-delete marker. `true`: only rows with one.
    fn soft_delete_scope(&mut self, archived: bool);
}

pub struct QueryBuilder<'r> {
    registry: &'r ConfigRegistry,
    entity_type: &'r str,
    config: Option<&'r EntityConfig>,
}

impl<'r> QueryBuilder<'r> {
    pub fn new(registry: &'r ConfigRegistry, entity_type: &'r str) -> Self {
        QueryBuilder {
            registry,
            entity_type,
            config: registry.get(entity_type),
        }
    }

    pub fn entity_type(&self) -> &'r str {
        self.entity_type
    }

    pub fn config(&self) -> Option<&'r EntityConfig> {
        self.config
    }

    /// Active (not soft-deleted) rows.
    pub fn build<T: QueryTarget>(&self, target: &mut T, opts: &QueryOptions) {
        self.apply(target, opts, false);
    }

    /// Soft-deleted rows only.
    pub fn build_archived<T: QueryTarget>(&self, target: &mut T, opts: &QueryOptions) {
        self.apply(target, opts, true);
    }

    /// Apply the same steps to a fresh target for counting. Count renderers ignore
    /// offset, limit, order and preloads.
    pub fn prepare_count<T: QueryTarget>(&self, mut target: T, opts: &QueryOptions, archived: bool) -> T {
        self.apply(&mut target, opts, archived);
        target
    }

    pub fn apply<T: QueryTarget>(&self, target: &mut T, opts: &QueryOptions, archived: bool) {
        self.apply_pagination(target, opts);
        self.apply_sorting(target, opts);
        self.apply_filters(target, opts);
        self.apply_search(target, opts);
        self.apply_preload(target, opts);
        target.soft_delete_scope(archived);
    }

    fn apply_pagination<T: QueryTarget>(&self, target: &mut T, opts: &QueryOptions) {
        let (_, page_size) = opts.pagination();
        target.offset(opts.offset());
        target.limit(page_size);
    }

    fn apply_sorting<T: QueryTarget>(&self, target: &mut T, opts: &QueryOptions) {
        let terms = self.order_terms(opts);
        if !terms.is_empty() {
            target.order(&terms);
        }
    }

    /// Whitelisted order terms for `opts`. Empty means no explicit ordering.
    pub fn order_terms(&self, opts: &QueryOptions) -> Vec<OrderTerm> {
        if opts.sort_by.is_empty() {
            return match self.config.filter(|c| !c.default_sort.is_empty()) {
                Some(config) => config
                    .default_sort
                    .iter()
                    .filter(|col| self.is_sortable(col))
                    .map(|col| OrderTerm::new(col.as_str(), SortDirection::Asc))
                    .collect(),
                None => vec![OrderTerm::new(FALLBACK_SORT_COLUMN, SortDirection::Desc)],
            };
        }

        opts.sort_by
            .iter()
            .enumerate()
            .filter(|(_, col)| self.is_sortable(col))
            .map(|(i, col)| {
                let direction = opts
                    .sort_order
                    .get(i)
                    .map(|o| SortDirection::parse(o))
                    .unwrap_or(SortDirection::Asc);
                OrderTerm::new(col.as_str(), direction)
            })
            .collect()
    }

    fn apply_filters<T: QueryTarget>(&self, target: &mut T, opts: &QueryOptions) {
        for (column, value) in &opts.filters {
            target.where_eq(column, value);
        }
    }

    fn apply_search<T: QueryTarget>(&self, target: &mut T, opts: &QueryOptions) {
        if opts.search.is_empty() {
            return;
        }
        let columns = self.search_columns(opts);
        if columns.is_empty() {
            tracing::trace!(entity_type = self.entity_type, "search ignored: no searchable columns");
            return;
        }
        let pattern = format!("%{}%", opts.search);
        target.where_any_ilike(&columns, &pattern);
    }

    /// Whitelisted columns the search term applies to.
    pub fn search_columns(&self, opts: &QueryOptions) -> Vec<String> {
        let candidates: &[String] = if !opts.search_columns.is_empty() {
            &opts.search_columns
        } else {
            self.config.map(|c| c.searchable_columns.as_slice()).unwrap_or(&[])
        };
        candidates
            .iter()
            .filter(|col| {
                let ok = self.registry.is_valid_search_column(self.entity_type, col);
                if !ok {
                    tracing::trace!(entity_type = self.entity_type, column = %col, "search column dropped");
                }
                ok
            })
            .cloned()
            .collect()
    }

    fn apply_preload<T: QueryTarget>(&self, target: &mut T, opts: &QueryOptions) {
        for relation in &opts.preload {
            target.preload(relation);
        }
    }

    fn is_sortable(&self, column: &str) -> bool {
        let ok = self.registry.is_valid_sort_column(self.entity_type, column);
        if !ok {
            tracing::trace!(entity_type = self.entity_type, column, "sort column dropped");
        }
        ok
    }
}

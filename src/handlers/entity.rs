//! Entity list handlers: active page, archived page, count.

use crate::config::{ConfigRegistry, EntityType};
use crate::error::AppError;
use crate::extractors::ListQuery;
use crate::response::{paginated, success_one_ok};
use crate::service::ListService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

/// Only registered entity types are listable; the type also names the table.
pub fn resolve_entity<'a>(registry: &'a ConfigRegistry, entity_type: &str) -> Result<&'a EntityType, AppError> {
    let key = EntityType::new(entity_type)?;
    registry
        .entity_type(key.as_str())
        .ok_or_else(|| AppError::NotFound(format!("entity type '{}'", key)))
}

/// `GET /:entity_type`: active rows, or archived rows with `includeArchived=true`.
pub async fn list(
    State(state): State<AppState>,
    Path(entity_type): Path<String>,
    ListQuery(opts): ListQuery,
) -> Result<impl IntoResponse, AppError> {
    let entity = resolve_entity(&state.registry, &entity_type)?;
    let page = ListService::list(&state.pool, &state.registry, entity.as_str(), &opts).await?;
    Ok(paginated(page))
}

/// `GET /:entity_type/archived`: soft-deleted rows only.
pub async fn list_archived(
    State(state): State<AppState>,
    Path(entity_type): Path<String>,
    ListQuery(opts): ListQuery,
) -> Result<impl IntoResponse, AppError> {
    let entity = resolve_entity(&state.registry, &entity_type)?;
    let page = ListService::list(&state.pool, &state.registry, entity.as_str(), &opts.archived_only()).await?;
    Ok(paginated(page))
}

/// `GET /:entity_type/count`: `{"data": {"total": n}}` for the same partition rules as `list`.
pub async fn count(
    State(state): State<AppState>,
    Path(entity_type): Path<String>,
    ListQuery(opts): ListQuery,
) -> Result<impl IntoResponse, AppError> {
    let entity = resolve_entity(&state.registry, &entity_type)?;
    let total = ListService::count(&state.pool, &state.registry, entity.as_str(), &opts).await?;
    Ok(success_one_ok(serde_json::json!({ "total": total })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EntityConfig, RegistryBuilder};
    use crate::request::parse_query_options;

    #[test]
    fn resolve_entity_requires_registration() {
        let mut b = RegistryBuilder::new();
        b.register("user".parse().unwrap(), EntityConfig::default());
        let reg = b.build();
        assert_eq!(resolve_entity(&reg, "user").unwrap().as_str(), "user");
        assert!(matches!(resolve_entity(&reg, "orders"), Err(AppError::NotFound(_))));
        assert!(matches!(resolve_entity(&reg, "users;--"), Err(AppError::Config(_))));
    }

    #[test]
    fn archived_route_ignores_include_archived_flag() {
        let mut b = RegistryBuilder::new();
        b.register("user".parse().unwrap(), EntityConfig::default());
        let reg = b.build();
        for query in [&[][..], &[("includeArchived", "0")][..], &[("includeArchived", "true")][..]] {
            let opts = parse_query_options(query).archived_only();
            let sql = ListService::select_query(&reg, "user", &opts).to_select().sql;
            assert!(sql.contains("\"deleted_at\" IS NOT NULL"), "{sql}");
        }
    }
}

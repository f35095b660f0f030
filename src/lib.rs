//! Query Options: turns list-request query strings into whitelisted, parameterized
//! PostgreSQL queries (pagination, sorting, filters, text search, preloads, soft-delete partitions).

pub mod builder;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod options;
pub mod request;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;

pub use builder::{QueryBuilder, QueryTarget};
pub use config::{
    load_from_path, load_from_str, register_default_configs, register_example_configs, ConfigRegistry,
    EntityConfig, EntityType, RegistryBuilder, RelationConfig, RelationKind, Settings,
};
pub use error::{AppError, ConfigError};
pub use extractors::ListQuery;
pub use options::{default_query_options, paginate, FilterValue, OrderTerm, QueryOptions, SortDirection};
pub use request::parse_query_options;
pub use response::{error_response, total_pages, PaginatedResponse, PaginationMeta};
pub use routes::{app, common_routes, common_routes_with_ready, entity_routes};
pub use service::ListService;
pub use sql::SelectQuery;
pub use state::AppState;

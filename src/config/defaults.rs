//! Built-in registrations.

use crate::config::{EntityConfig, RegistryBuilder};
use crate::error::ConfigError;

/// Registers `base_model`: sorting and searching by `id`, `created_at`, `updated_at`.
pub fn register_default_configs(builder: &mut RegistryBuilder) -> Result<(), ConfigError> {
    builder.register(
        "base_model".parse()?,
        EntityConfig::new(
            ["id", "created_at", "updated_at"],
            ["id", "created_at", "updated_at"],
            ["created_at"],
            [],
        ),
    );
    Ok(())
}

/// Sample `user` and `product` registrations, as an application would declare its own.
pub fn register_example_configs(builder: &mut RegistryBuilder) -> Result<(), ConfigError> {
    builder.register(
        "user".parse()?,
        EntityConfig::new(
            ["name", "email", "phone"],
            ["name", "email", "created_at", "updated_at"],
            ["created_at"],
            ["Role"],
        )
        .with_table("users"),
    );
    builder.register(
        "product".parse()?,
        EntityConfig::new(
            ["name", "description", "sku"],
            ["name", "price", "created_at", "updated_at"],
            ["name"],
            ["Category", "Tags"],
        )
        .with_table("products"),
    );
    Ok(())
}

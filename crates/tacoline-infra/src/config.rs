//! Shop configuration loader for Tacoline.
//!
//! Reads `tacoline.toml` and deserializes it into [`ShopConfig`]. Falls back
//! to defaults when the file is missing or malformed. A configured menu is
//! validated when the catalog is built.

use std::path::Path;

use tacoline_core::catalog::Catalog;
use tacoline_types::config::ShopConfig;
use tacoline_types::error::CatalogError;

/// Load shop configuration from `path`.
///
/// - If the file does not exist, returns [`ShopConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_shop_config(path: &Path) -> ShopConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return ShopConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ShopConfig::default();
        }
    };

    match toml::from_str::<ShopConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            ShopConfig::default()
        }
    }
}

/// Build the catalog the config describes: the built-in menu when no menu
/// is configured, otherwise the configured entries.
pub fn build_catalog(config: &ShopConfig) -> Result<Catalog, CatalogError> {
    if config.menu.is_empty() {
        return Ok(Catalog::default());
    }
    let catalog = Catalog::from_entries(config.menu.clone())?;
    tracing::info!(items = catalog.entries().len(), "loaded configured menu");
    Ok(catalog)
}

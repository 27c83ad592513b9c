//! Application state wiring the shop and the LINE adapter together.
//!
//! `Shop` is what every command needs (config, catalog, session router).
//! `AppState` adds the server-only pieces: the reply sender and the channel
//! secret used to verify webhooks.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use tacoline_core::catalog::Catalog;
use tacoline_core::reply::box_sender::BoxReplySender;
use tacoline_core::session::{InMemorySessionStore, SessionRouter};
use tacoline_infra::config::{build_catalog, load_shop_config};
use tacoline_types::config::ShopConfig;

/// Session router pinned to the in-memory store.
pub type ConcreteRouter = SessionRouter<InMemorySessionStore>;

/// Loaded shop configuration and catalog.
pub struct Shop {
    pub config: ShopConfig,
    pub catalog: Arc<Catalog>,
}

impl Shop {
    /// Load the config file and build the catalog it describes.
    pub async fn load(config_path: &Path) -> anyhow::Result<Self> {
        let config = load_shop_config(config_path).await;
        let catalog = build_catalog(&config)
            .map_err(|e| anyhow::anyhow!("invalid menu in {}: {e}", config_path.display()))?;
        Ok(Self {
            config,
            catalog: Arc::new(catalog),
        })
    }

    pub fn router(&self) -> ConcreteRouter {
        SessionRouter::new(
            Arc::clone(&self.catalog),
            &self.config,
            InMemorySessionStore::new(),
        )
    }
}

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ConcreteRouter>,
    pub replies: Arc<BoxReplySender>,
    /// `None` only in dry-run mode without credentials; signatures are then not checked.
    pub channel_secret: Option<Arc<SecretString>>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        router: ConcreteRouter,
        replies: BoxReplySender,
        channel_secret: Option<SecretString>,
    ) -> Self {
        Self {
            router: Arc::new(router),
            replies: Arc::new(replies),
            channel_secret: channel_secret.map(Arc::new),
            started_at: Utc::now(),
        }
    }
}

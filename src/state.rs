use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::food::cache::FoodCache;
use crate::food::source::{NutrientSource, UsdaClient};
use crate::logbook::store::LogStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub source: Arc<dyn NutrientSource>,
    pub food_cache: Arc<FoodCache>,
    pub store: Arc<LogStore>,
    /// Serializes cache-miss resolutions so concurrent misses for the
    /// same name cannot issue duplicate upstream query sequences.
    pub resolve_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("create data dir {}", config.data_dir.display()))?;

        let source =
            Arc::new(UsdaClient::new(config.usda.clone())?) as Arc<dyn NutrientSource>;
        Ok(Self::from_parts(config, source))
    }

    pub fn from_parts(config: Arc<AppConfig>, source: Arc<dyn NutrientSource>) -> Self {
        let food_cache = Arc::new(FoodCache::load(config.food_cache_path()));
        let store = Arc::new(LogStore::new(
            config.food_log_path(),
            config.default_user.clone(),
        ));
        Self {
            config,
            source,
            food_cache,
            store,
            resolve_lock: Arc::new(Mutex::new(())),
        }
    }
}

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UsdaConfig {
    pub api_key: String,
    pub base_url: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub default_user: String,
    pub usda: UsdaConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let usda = UsdaConfig {
            api_key: std::env::var("USDA_API_KEY")?,
            base_url: std::env::var("USDA_API_URL")
                .unwrap_or_else(|_| "https://api.nal.usda.gov/fdc/v1/foods/search".into()),
            page_size: std::env::var("USDA_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(5),
            timeout_secs: std::env::var("USDA_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        };
        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        let default_user = std::env::var("NUTRILOG_USER").unwrap_or_else(|_| "paul".into());
        Ok(Self {
            data_dir,
            default_user,
            usda,
        })
    }

    pub fn food_cache_path(&self) -> PathBuf {
        self.data_dir.join("food_cache.json")
    }

    pub fn food_log_path(&self) -> PathBuf {
        self.data_dir.join("food_log.json")
    }
}

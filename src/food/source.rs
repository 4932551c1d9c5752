use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use serde::Deserialize;

use crate::config::UsdaConfig;

/// USDA data-quality tiers, in query order. The order doubles as the
/// match priority: curated sources are asked first, crowd-sourced
/// branded data last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataTier {
    Foundation,
    SrLegacy,
    Survey,
    Branded,
}

impl DataTier {
    pub const ALL: [DataTier; 4] = [
        DataTier::Foundation,
        DataTier::SrLegacy,
        DataTier::Survey,
        DataTier::Branded,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DataTier::Foundation => "Foundation",
            DataTier::SrLegacy => "SR Legacy",
            DataTier::Survey => "Survey (FNDDS)",
            DataTier::Branded => "Branded",
        }
    }
}

/// One `{nutrientId, value}` pair from a search result. `value` stays a
/// raw JSON value here: depending on the data tier it arrives as a
/// number or as a string with a trailing unit ("120 kcal"). Nothing
/// outside the extractor is allowed to look inside it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodNutrient {
    pub nutrient_id: u32,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFood {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

#[async_trait]
pub trait NutrientSource: Send + Sync {
    /// Returns the candidate records for `query` within one data tier.
    /// An empty vec is a valid answer; errors are transport or decode
    /// failures and the caller decides how far they propagate.
    async fn search(&self, query: &str, tier: DataTier) -> anyhow::Result<Vec<SearchFood>>;
}

pub struct UsdaClient {
    http: reqwest::Client,
    config: UsdaConfig,
}

impl UsdaClient {
    pub fn new(config: UsdaConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build usda http client")?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl NutrientSource for UsdaClient {
    async fn search(&self, query: &str, tier: DataTier) -> anyhow::Result<Vec<SearchFood>> {
        let page_size = self.config.page_size.to_string();
        let params = [
            ("query", query),
            ("dataType", tier.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("pageSize", page_size.as_str()),
        ];
        let response = self
            .http
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("usda search '{}' ({})", query, tier.as_str()))?
            .error_for_status()
            .with_context(|| format!("usda search '{}' ({})", query, tier.as_str()))?;
        let body: SearchResponse = response
            .json()
            .await
            .with_context(|| format!("decode usda response for '{}'", query))?;
        Ok(body.foods)
    }
}

use tracing::{debug, error, info};

use crate::error::AppError;
use crate::food::cache::FoodInfo;
use crate::food::nutrients;
use crate::food::source::{DataTier, SearchFood};
use crate::state::AppState;

/// Resolves a canonical food name to its per-100g macro profile.
///
/// Cache hits return without network traffic. Misses serialize behind
/// the resolution lock (with a re-check) so concurrent lookups of the
/// same name issue a single upstream query sequence, and the cache
/// entry is durable before the caller proceeds.
pub async fn resolve(st: &AppState, name: &str) -> Result<FoodInfo, AppError> {
    if let Some(info) = st.food_cache.get(name) {
        debug!(name = %name, "food info cache hit");
        return Ok(info);
    }

    let _guard = st.resolve_lock.lock().await;
    if let Some(info) = st.food_cache.get(name) {
        debug!(name = %name, "food info resolved while waiting for lock");
        return Ok(info);
    }

    let food = search_tiers(st, name).await?;
    let info = nutrients::extract_food_info(name, &food.food_nutrients)?;
    st.food_cache.insert(name.to_string(), info)?;
    Ok(info)
}

/// Queries each data tier in order; the first tier returning any
/// records wins and its first record is the match. A failing tier is
/// logged and treated as empty, so a partial outage degrades to the
/// next tier instead of failing the lookup.
async fn search_tiers(st: &AppState, name: &str) -> Result<SearchFood, AppError> {
    for tier in DataTier::ALL {
        let foods = match st.source.search(name, tier).await {
            Ok(foods) => foods,
            Err(e) => {
                error!(error = %e, query = %name, tier = tier.as_str(), "tier query failed, skipping");
                continue;
            }
        };
        if let Some(food) = foods.into_iter().next() {
            info!(query = %name, tier = tier.as_str(), description = %food.description, "food matched");
            return Ok(food);
        }
    }
    Err(AppError::NoMatch(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::async_trait;

    use crate::config::{AppConfig, UsdaConfig};
    use crate::food::source::{FoodNutrient, NutrientSource};

    #[derive(Default)]
    struct StubSource {
        foundation: Vec<SearchFood>,
        branded: Vec<SearchFood>,
        fail_foundation: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl NutrientSource for StubSource {
        async fn search(&self, _query: &str, tier: DataTier) -> anyhow::Result<Vec<SearchFood>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match tier {
                DataTier::Foundation if self.fail_foundation => {
                    anyhow::bail!("connection refused")
                }
                DataTier::Foundation => Ok(self.foundation.clone()),
                DataTier::Branded => Ok(self.branded.clone()),
                _ => Ok(Vec::new()),
            }
        }
    }

    fn full_record() -> SearchFood {
        SearchFood {
            description: "Yogurt, Greek, plain, nonfat".into(),
            food_nutrients: vec![
                FoodNutrient {
                    nutrient_id: nutrients::ENERGY_KCAL_ID,
                    value: Some(serde_json::json!(59.0)),
                },
                FoodNutrient {
                    nutrient_id: nutrients::PROTEIN_ID,
                    value: Some(serde_json::json!(10.3)),
                },
                FoodNutrient {
                    nutrient_id: nutrients::CARBS_ID,
                    value: Some(serde_json::json!(3.6)),
                },
                FoodNutrient {
                    nutrient_id: nutrients::FAT_ID,
                    value: Some(serde_json::json!(0.4)),
                },
            ],
        }
    }

    fn state_with(dir: &std::path::Path, source: Arc<StubSource>) -> (AppState, Arc<StubSource>) {
        let config = Arc::new(AppConfig {
            data_dir: dir.to_path_buf(),
            default_user: "paul".into(),
            usda: UsdaConfig {
                api_key: "test".into(),
                base_url: "http://localhost/unused".into(),
                page_size: 5,
                timeout_secs: 1,
            },
        });
        let state = AppState::from_parts(config, source.clone() as Arc<dyn NutrientSource>);
        (state, source)
    }

    #[tokio::test]
    async fn second_resolve_hits_the_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, source) = state_with(
            dir.path(),
            Arc::new(StubSource {
                foundation: vec![full_record()],
                ..Default::default()
            }),
        );

        let first = resolve(&state, "greek yogurt").await.expect("first resolve");
        let calls_after_first = source.calls.load(Ordering::SeqCst);
        assert_eq!(calls_after_first, 1);

        let second = resolve(&state, "greek yogurt").await.expect("second resolve");
        assert_eq!(second, first);
        assert_eq!(source.calls.load(Ordering::SeqCst), calls_after_first);
    }

    #[tokio::test]
    async fn cache_survives_a_restart() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, source) = state_with(
            dir.path(),
            Arc::new(StubSource {
                foundation: vec![full_record()],
                ..Default::default()
            }),
        );
        let info = resolve(&state, "greek yogurt").await.expect("resolve");

        // Fresh state over the same data dir simulates a new process.
        let (restarted, source2) = state_with(dir.path(), Arc::new(StubSource::default()));
        let cached = resolve(&restarted, "greek yogurt")
            .await
            .expect("resolve from durable cache");
        assert_eq!(cached, info);
        assert_eq!(source2.calls.load(Ordering::SeqCst), 0);
        drop(source);
    }

    #[tokio::test]
    async fn failing_tier_falls_through_to_the_next() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, source) = state_with(
            dir.path(),
            Arc::new(StubSource {
                fail_foundation: true,
                branded: vec![full_record()],
                ..Default::default()
            }),
        );

        let info = resolve(&state, "greek yogurt").await.expect("should fall through");
        assert_eq!(info.calories_per_100g, 59.0);
        // All four tiers were attempted before the branded hit.
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn empty_everywhere_is_no_match() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, _) = state_with(dir.path(), Arc::new(StubSource::default()));

        let err = resolve(&state, "unobtainium").await.unwrap_err();
        match err {
            AppError::NoMatch(query) => assert_eq!(query, "unobtainium"),
            other => panic!("expected NoMatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn incomplete_record_is_not_cached() {
        let dir = tempfile::tempdir().expect("tempdir");
        let incomplete = SearchFood {
            description: "mystery bar".into(),
            food_nutrients: vec![FoodNutrient {
                nutrient_id: nutrients::ENERGY_KCAL_ID,
                value: Some(serde_json::json!(100.0)),
            }],
        };
        let (state, source) = state_with(
            dir.path(),
            Arc::new(StubSource {
                foundation: vec![incomplete],
                ..Default::default()
            }),
        );

        let err = resolve(&state, "mystery bar").await.unwrap_err();
        assert!(matches!(err, AppError::MissingNutrient { .. }));
        assert!(state.food_cache.get("mystery bar").is_none());

        // The miss was not cached, so the next attempt queries again.
        resolve(&state, "mystery bar").await.unwrap_err();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}

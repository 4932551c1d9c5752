use anyhow::Context;
use tracing::info;
use uuid::Uuid;

use super::aggregate;
use super::dto::{EntryCreated, EntryDeleted, NewEntryRequest, DATE_FORMAT};
use super::model::{DailyLog, FoodItem};
use crate::error::AppError;
use crate::food::cache::{canonical_name, FoodInfo};
use crate::food::resolver;
use crate::state::AppState;

/// Adds one food item to a meal on a day, resolving its nutrition
/// first. A failed resolution aborts before the log is touched, so the
/// document never gains a partially resolved entry.
pub async fn create_entry(st: &AppState, req: NewEntryRequest) -> Result<EntryCreated, AppError> {
    req.validate()?;
    let name = canonical_name(&req.food_name);

    // Without a weight there is nothing to derive, so no lookup either.
    let info = match req.weight {
        Some(_) => Some(resolver::resolve(st, &name).await?),
        None => None,
    };

    let _guard = st.store.lock().await;
    let mut log = st.store.load()?;
    let day = log.find_or_create_day(&req.date);
    let meal = day.find_or_create_meal(&req.meal);

    let data_id = Uuid::new_v4().to_string();
    let mut item = FoodItem::new(name, data_id.clone());
    item.weight = req.weight;
    item.quantity = req.quantity;
    if let (Some(weight), Some(info)) = (req.weight, info) {
        apply_food_info(&mut item, weight, info);
    }
    meal.items.push(item);

    aggregate::recompute_day(day);
    let totals = aggregate::day_totals(day);
    let date = day.date.clone();
    st.store.save(&log)?;

    info!(data_id = %data_id, date = %date, meal = %req.meal, "food entry added");
    Ok(EntryCreated {
        data_id,
        date,
        meal: req.meal,
        totals,
    })
}

/// Scales the per-100g profile by the consumed weight. The derived
/// fields are written as a unit; an item is never partially filled.
fn apply_food_info(item: &mut FoodItem, weight: f64, info: FoodInfo) {
    let factor = weight / 100.0;
    item.calories = Some(info.calories_per_100g * factor);
    item.protein = Some(info.protein_per_100g * factor);
    item.carbs = Some(info.carbs_per_100g * factor);
    item.fat = Some(info.fat_per_100g * factor);
}

/// An absent day is a benign `None`, not an error.
pub async fn get_day(st: &AppState, date: &str) -> Result<Option<DailyLog>, AppError> {
    let _guard = st.store.lock().await;
    let log = st.store.load()?;
    Ok(log.find_day(date).cloned())
}

pub async fn get_today(st: &AppState) -> Result<Option<DailyLog>, AppError> {
    let today = time::OffsetDateTime::now_utc()
        .date()
        .format(DATE_FORMAT)
        .context("format today's date")?;
    get_day(st, &today).await
}

/// Every day in stored order, totals recomputed on the returned copies.
/// The stored document is left as-is.
pub async fn get_all_days(st: &AppState) -> Result<Vec<DailyLog>, AppError> {
    let _guard = st.store.lock().await;
    let log = st.store.load()?;
    let mut days = log.logs;
    for day in &mut days {
        aggregate::recompute_day(day);
    }
    Ok(days)
}

/// Removes the item with `data_id`, recomputes the owning day and
/// persists. An unknown id is an explicit not-found error, never a
/// silent success.
pub async fn delete_entry(st: &AppState, data_id: &str) -> Result<EntryDeleted, AppError> {
    let _guard = st.store.lock().await;
    let mut log = st.store.load()?;

    let Some((day_idx, item)) = log.remove_item(data_id) else {
        return Err(AppError::EntryNotFound(data_id.to_string()));
    };
    let day = &mut log.logs[day_idx];
    aggregate::recompute_day(day);
    let totals = aggregate::day_totals(day);
    let date = day.date.clone();
    st.store.save(&log)?;

    info!(data_id = %data_id, name = %item.name, date = %date, "food entry removed");
    Ok(EntryDeleted {
        data_id: data_id.to_string(),
        date,
        totals,
    })
}

use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;

use super::aggregate::MacroTotals;
use crate::error::AppError;

pub const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Incoming food entry. The wire field for the food is `food-name`.
#[derive(Debug, Deserialize)]
pub struct NewEntryRequest {
    pub date: String,
    pub meal: String,
    #[serde(rename = "food-name")]
    pub food_name: String,
    pub weight: Option<f64>,
    pub quantity: Option<u32>,
}

impl NewEntryRequest {
    /// Rejects malformed payloads before any state is touched.
    pub fn validate(&self) -> Result<(), AppError> {
        if time::Date::parse(&self.date, DATE_FORMAT).is_err() {
            return Err(AppError::Validation(format!(
                "invalid date '{}', expected YYYY-MM-DD",
                self.date
            )));
        }
        if self.meal.trim().is_empty() {
            return Err(AppError::Validation("meal is required".into()));
        }
        if self.food_name.trim().is_empty() {
            return Err(AppError::Validation("food-name is required".into()));
        }
        if let Some(weight) = self.weight {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(AppError::Validation(
                    "weight must be a positive number of grams".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct EntryCreated {
    pub data_id: String,
    pub date: String,
    pub meal: String,
    pub totals: MacroTotals,
}

#[derive(Debug, Serialize)]
pub struct EntryDeleted {
    pub data_id: String,
    pub date: String,
    pub totals: MacroTotals,
}

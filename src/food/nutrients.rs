use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;
use crate::food::cache::FoodInfo;
use crate::food::source::FoodNutrient;

pub const PROTEIN_ID: u32 = 1003;
pub const FAT_ID: u32 = 1004;
pub const CARBS_ID: u32 = 1005;
pub const ENERGY_KCAL_ID: u32 = 1008;
pub const ENERGY_ATWATER_GENERAL_ID: u32 = 2047;
pub const ENERGY_ATWATER_SPECIFIC_ID: u32 = 2048;

/// Energy ids in lookup priority: Atwater general, Atwater specific,
/// then the plain kcal id.
const ENERGY_IDS: [u32; 3] = [
    ENERGY_ATWATER_GENERAL_ID,
    ENERGY_ATWATER_SPECIFIC_ID,
    ENERGY_KCAL_ID,
];

lazy_static! {
    static ref UNIT_VALUE: Regex =
        Regex::new(r"^(\d+(\.\d+)?)\s*(?:kcal|g)").expect("unit value regex");
}

/// Coerces an upstream nutrient value to a float. Branded records embed
/// the number in a string with a trailing unit ("120 kcal", "4.2 g");
/// only the leading numeric prefix counts.
fn numeric_value(value: &serde_json::Value) -> Option<f64> {
    if let Some(n) = value.as_f64() {
        return Some(n);
    }
    let s = value.as_str()?.trim();
    if let Ok(n) = s.parse::<f64>() {
        return Some(n);
    }
    UNIT_VALUE
        .captures(s)
        .and_then(|c| c.get(1)?.as_str().parse().ok())
}

/// Linear scan for a nutrient id with a usable numeric value.
fn find_nutrient(nutrients: &[FoodNutrient], id: u32) -> Option<f64> {
    nutrients
        .iter()
        .find(|n| n.nutrient_id == id)
        .and_then(|n| n.value.as_ref())
        .and_then(numeric_value)
}

fn require(
    nutrients: &[FoodNutrient],
    id: u32,
    nutrient: &'static str,
    query: &str,
) -> Result<f64, AppError> {
    find_nutrient(nutrients, id).ok_or_else(|| AppError::MissingNutrient {
        nutrient,
        query: query.to_string(),
    })
}

/// Extracts the per-100g macro profile from one search record.
///
/// A missing or unparseable nutrient fails the whole extraction; the
/// cache never holds a partial or zero-filled profile.
pub fn extract_food_info(query: &str, nutrients: &[FoodNutrient]) -> Result<FoodInfo, AppError> {
    let calories = ENERGY_IDS
        .iter()
        .find_map(|&id| find_nutrient(nutrients, id))
        .ok_or_else(|| AppError::MissingNutrient {
            nutrient: "energy",
            query: query.to_string(),
        })?;
    let protein = require(nutrients, PROTEIN_ID, "protein", query)?;
    let carbs = require(nutrients, CARBS_ID, "carbs", query)?;
    let fat = require(nutrients, FAT_ID, "fat", query)?;
    Ok(FoodInfo {
        calories_per_100g: calories,
        protein_per_100g: protein,
        carbs_per_100g: carbs,
        fat_per_100g: fat,
    })
}

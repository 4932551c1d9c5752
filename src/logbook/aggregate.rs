use serde::Serialize;

use super::model::{DailyLog, Meal};

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroTotals {
    fn add(&mut self, other: MacroTotals) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.carbs += other.carbs;
        self.fat += other.fat;
    }
}

/// Sums the non-null item macros of one meal. Items without derived
/// values contribute zero, never an error. Meal totals are computed on
/// demand; they are not part of the persisted meal shape.
pub fn meal_totals(meal: &Meal) -> MacroTotals {
    let mut totals = MacroTotals::default();
    for item in &meal.items {
        totals.calories += item.calories.unwrap_or(0.0);
        totals.protein += item.protein.unwrap_or(0.0);
        totals.carbs += item.carbs.unwrap_or(0.0);
        totals.fat += item.fat.unwrap_or(0.0);
    }
    totals
}

/// Recomputes the day totals from current item state. Totals are reset
/// to zero before summing, so repeated calls are idempotent and prior
/// values never accumulate.
pub fn recompute_day(day: &mut DailyLog) {
    let mut totals = MacroTotals::default();
    for meal in &day.meals {
        totals.add(meal_totals(meal));
    }
    day.total_calories = totals.calories;
    day.total_protein = totals.protein;
    day.total_carbs = totals.carbs;
    day.total_fat = totals.fat;
}

pub fn day_totals(day: &DailyLog) -> MacroTotals {
    MacroTotals {
        calories: day.total_calories,
        protein: day.total_protein,
        carbs: day.total_carbs,
        fat: day.total_fat,
    }
}

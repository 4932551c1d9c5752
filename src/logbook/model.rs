use serde::{Deserialize, Serialize};

/// One consumed food occurrence. `data_id` is the sole handle for
/// deletion and stays stable for the item's lifetime. The derived macro
/// fields are written as a unit: all null (no weight, or never
/// resolved) or all non-null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub data_id: String,
    pub weight: Option<f64>,
    pub quantity: Option<u32>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

impl FoodItem {
    pub fn new(name: String, data_id: String) -> Self {
        Self {
            name,
            data_id,
            weight: None,
            quantity: None,
            calories: None,
            protein: None,
            carbs: None,
            fat: None,
        }
    }
}

/// A named meal within a day. The name is unique within its day; item
/// order is insertion order and user-visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub time: Option<String>,
    pub items: Vec<FoodItem>,
}

impl Meal {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            time: None,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: String,
    pub meals: Vec<Meal>,
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_protein: f64,
    #[serde(default)]
    pub total_carbs: f64,
    #[serde(default)]
    pub total_fat: f64,
}

impl DailyLog {
    pub fn new(date: &str) -> Self {
        Self {
            date: date.to_string(),
            meals: Vec::new(),
            total_calories: 0.0,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fat: 0.0,
        }
    }

    /// O(n) scan by meal name; appends a new empty meal on miss.
    pub fn find_or_create_meal(&mut self, name: &str) -> &mut Meal {
        if let Some(idx) = self.meals.iter().position(|m| m.name == name) {
            return &mut self.meals[idx];
        }
        self.meals.push(Meal::new(name));
        let idx = self.meals.len() - 1;
        &mut self.meals[idx]
    }
}

/// Root persisted document: the whole log is read, mutated and
/// rewritten per operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLog {
    pub user: String,
    pub logs: Vec<DailyLog>,
}

impl UserLog {
    /// O(n) scan by date.
    pub fn find_day(&self, date: &str) -> Option<&DailyLog> {
        self.logs.iter().find(|d| d.date == date)
    }

    /// O(n) scan by date; appends a new empty day at the end on miss.
    /// Insertion order of existing days is preserved and chronological
    /// order is not enforced here.
    pub fn find_or_create_day(&mut self, date: &str) -> &mut DailyLog {
        if let Some(idx) = self.logs.iter().position(|d| d.date == date) {
            return &mut self.logs[idx];
        }
        self.logs.push(DailyLog::new(date));
        let idx = self.logs.len() - 1;
        &mut self.logs[idx]
    }

    /// Full scan across all days and meals for an item id. Removes the
    /// first (and by construction only) match and returns it together
    /// with the index of its owning day, so the caller can recompute
    /// that day's totals.
    pub fn remove_item(&mut self, data_id: &str) -> Option<(usize, FoodItem)> {
        for (day_idx, day) in self.logs.iter_mut().enumerate() {
            for meal in &mut day.meals {
                if let Some(item_idx) = meal.items.iter().position(|i| i.data_id == data_id) {
                    let item = meal.items.remove(item_idx);
                    return Some((day_idx, item));
                }
            }
        }
        None
    }
}

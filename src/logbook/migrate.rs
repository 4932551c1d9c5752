use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

type Step = fn(&mut Value);

/// Structural upgrades applied to the raw document before strict
/// decoding, in declaration order. Every step is idempotent, so running
/// the pipeline on an already-migrated document changes nothing. New
/// upgrades append to this list.
const MIGRATIONS: &[(&str, Step)] = &[("backfill-item-ids", backfill_item_ids)];

pub fn apply(doc: &mut Value) {
    for (name, step) in MIGRATIONS {
        step(doc);
        debug!(migration = name, "applied log migration");
    }
}

/// Items persisted before ids existed get a fresh one. An empty id
/// counts as missing.
fn backfill_item_ids(doc: &mut Value) {
    let Some(logs) = doc.get_mut("logs").and_then(Value::as_array_mut) else {
        return;
    };
    for day in logs {
        let Some(meals) = day.get_mut("meals").and_then(Value::as_array_mut) else {
            continue;
        };
        for meal in meals {
            let Some(items) = meal.get_mut("items").and_then(Value::as_array_mut) else {
                continue;
            };
            for item in items {
                let missing = item
                    .get("data_id")
                    .and_then(Value::as_str)
                    .map_or(true, str::is_empty);
                if missing {
                    if let Some(obj) = item.as_object_mut() {
                        obj.insert("data_id".into(), Value::String(Uuid::new_v4().to_string()));
                    }
                }
            }
        }
    }
}

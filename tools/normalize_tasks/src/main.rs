use dotenvy::dotenv;
use join_board::models::Status;
use join_board::services::board_service::generate_time_based_id;
use join_board::store::{Collection, DocumentStore, FirebaseHttpClient, StoreConfig};
use serde_json::{Map, Value};

fn is_dry_run() -> bool {
    !std::env::args().any(|a| a == "--apply")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let config = StoreConfig::new_from_env()?;
    let store = FirebaseHttpClient::new(config)?;

    let records = store.fetch_all(Collection::Tasks).await?;
    let dry_run = is_dry_run();

    let mut fixed = 0;

    for (key, record) in &records {
        let Some(patch) = plan_fix(record) else {
            continue;
        };

        if dry_run {
            println!("[DRY RUN] Would patch task {} with {}", key, patch);
        } else {
            store.patch(Collection::Tasks, key, &patch).await?;
            println!("Patched task {} with {}", key, patch);
        }

        fixed += 1;
    }

    println!("Tasks fixed: {} / {}", fixed, records.len());

    Ok(())
}

/// Fields a stored task needs before the board can address it: a numeric
/// `id` and one of the four column statuses.
fn plan_fix(record: &Value) -> Option<Value> {
    let mut patch = Map::new();

    if !record.get("id").is_some_and(Value::is_i64) {
        patch.insert("id".to_string(), Value::from(generate_time_based_id()));
    }

    if !has_known_status(record) {
        patch.insert(
            "status".to_string(),
            Value::from(Status::ToDo.as_str()),
        );
    }

    if patch.is_empty() {
        None
    } else {
        Some(Value::Object(patch))
    }
}

fn has_known_status(record: &Value) -> bool {
    let status = match record.get("status").and_then(|s| s.as_str()) {
        Some(s) => s,
        None => return false,
    };

    Status::ALL.iter().any(|known| known.as_str() == status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_complete_record_needs_no_fix() {
        let record = json!({ "id": 1718000000123i64, "title": "Plan", "status": "Done" });
        assert_eq!(plan_fix(&record), None);
    }

    #[test]
    fn test_missing_id_and_unknown_status_are_fixed() {
        let record = json!({ "id": "abc", "title": "Plan", "status": "Backlog" });
        let patch = plan_fix(&record).expect("record needs a fix");

        assert!(patch["id"].is_i64());
        assert_eq!(patch["status"], "To do");
    }

    #[test]
    fn test_missing_status_only() {
        let record = json!({ "id": 5, "title": "Plan" });
        assert_eq!(plan_fix(&record), Some(json!({ "status": "To do" })));
    }
}

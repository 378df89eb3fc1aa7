//! Tolerant field lookup for payloads whose key names vary between
//! backend versions.
//!
//! Paths are dotted (`mission.title`). The first path that resolves to a
//! non-null value of the requested kind wins.

use serde_json::Value;

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.get(key))
        .filter(|found| !found.is_null())
}

pub fn pick<'a>(value: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|path| lookup(value, path))
}

pub fn pick_str(value: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| match lookup(value, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Numbers sent as strings (`"12.50"`) are accepted too.
pub fn pick_f64(value: &Value, paths: &[&str]) -> Option<f64> {
    paths.iter().find_map(|path| match lookup(value, path)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub fn pick_i64(value: &Value, paths: &[&str]) -> Option<i64> {
    paths.iter().find_map(|path| match lookup(value, path)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub fn pick_bool(value: &Value, paths: &[&str]) -> Option<bool> {
    paths
        .iter()
        .find_map(|path| lookup(value, path)?.as_bool())
}

/// A bare array, or the `content` array of a page. Anything else is empty.
pub fn list_items(value: &Value) -> &[Value] {
    value
        .as_array()
        .or_else(|| value.get("content").and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_present_path_wins() {
        let raw = json!({"missionName": "B", "mission": {"title": "A"}, "missionTitle": null});
        assert_eq!(
            pick_str(&raw, &["missionTitle", "mission.title", "missionName"]).as_deref(),
            Some("A")
        );
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let raw = json!({"montant": "12.5", "id": "7"});
        assert_eq!(pick_f64(&raw, &["amount", "montant"]), Some(12.5));
        assert_eq!(pick_i64(&raw, &["id"]), Some(7));
    }

    #[test]
    fn list_items_accepts_page() {
        assert_eq!(list_items(&json!({"content": [1, 2]})).len(), 2);
        assert_eq!(list_items(&json!([1])).len(), 1);
        assert!(list_items(&json!({"foo": 1})).is_empty());
    }
}

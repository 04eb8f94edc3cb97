use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::models::{NewParameter, ParamKind, Parameter};

/// Name given to the single child derived from an array of scalars.
pub const ARRAY_ITEM_NAME: &str = "item";

/// Metadata carried over from a previous import, keyed by parameter name.
struct Preserved<'a> {
    required: bool,
    description: Option<&'a str>,
}

/// Derive a parameter forest from an example JSON object.
///
/// `required` and `description` are copied from any row of `existing` with the
/// same name, wherever it sat in the old tree. When several old rows share a
/// name, the one earliest in sibling order wins.
pub fn derive_parameters(json: &Value, existing: &[Parameter]) -> AppResult<Vec<NewParameter>> {
    let object = json
        .as_object()
        .ok_or_else(|| AppError::Validation("Invalid json object".to_string()))?;

    let mut ordered: Vec<&Parameter> = existing.iter().collect();
    ordered.sort_by_key(|p| (p.order, p.id));

    let mut preserved: HashMap<&str, Preserved<'_>> = HashMap::new();
    for param in ordered {
        preserved.entry(param.name.as_str()).or_insert(Preserved {
            required: param.required,
            description: param.description.as_deref(),
        });
    }

    Ok(convert_object(object, &preserved))
}

fn convert_object(object: &Map<String, Value>, preserved: &HashMap<&str, Preserved<'_>>) -> Vec<NewParameter> {
    object
        .iter()
        .map(|(key, value)| convert_value(key, value, preserved))
        .collect()
}

fn convert_value(name: &str, value: &Value, preserved: &HashMap<&str, Preserved<'_>>) -> NewParameter {
    let (kind, children) = match value {
        Value::Array(items) => {
            let children = match items.first() {
                Some(Value::Object(template)) => convert_object(template, preserved),
                Some(Value::Null) | None => Vec::new(),
                Some(first) => vec![convert_value(ARRAY_ITEM_NAME, first, preserved)],
            };
            (ParamKind::Array, children)
        }
        Value::Object(fields) => (ParamKind::Object, convert_object(fields, preserved)),
        Value::String(_) => (ParamKind::String, Vec::new()),
        Value::Number(_) => (ParamKind::Number, Vec::new()),
        Value::Bool(_) => (ParamKind::Boolean, Vec::new()),
        Value::Null => (ParamKind::String, Vec::new()),
    };

    let mut param = NewParameter::new(name, kind);
    param.children = children;
    if let Some(old) = preserved.get(name) {
        param.required = old.required;
        param.description = old.description.map(str::to_string);
    }
    param
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use serde_json::json;

    fn existing(id: i32, name: &str, order: i32, required: bool, description: Option<&str>) -> Parameter {
        let now = time::OffsetDateTime::now_utc();
        Parameter {
            id,
            api_id: 1,
            parent_id: None,
            name: name.to_string(),
            param_type: ParamKind::String,
            description: description.map(str::to_string),
            required,
            direction: Direction::Request,
            order,
            created_at: now,
            updated_at: now,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_type_inference() {
        let forest = derive_parameters(
            &json!({ "a": "x", "b": [1, 2, 3], "c": { "d": true }, "e": null, "f": 1.5 }),
            &[],
        )
        .unwrap();

        let names: Vec<&str> = forest.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "e", "f"]);

        assert_eq!(forest[0].param_type, ParamKind::String);
        assert!(forest[0].children.is_empty());

        assert_eq!(forest[1].param_type, ParamKind::Array);
        assert_eq!(forest[1].children.len(), 1);
        assert_eq!(forest[1].children[0].name, ARRAY_ITEM_NAME);
        assert_eq!(forest[1].children[0].param_type, ParamKind::Number);

        assert_eq!(forest[2].param_type, ParamKind::Object);
        assert_eq!(forest[2].children.len(), 1);
        assert_eq!(forest[2].children[0].name, "d");
        assert_eq!(forest[2].children[0].param_type, ParamKind::Boolean);

        assert_eq!(forest[3].param_type, ParamKind::String);
        assert_eq!(forest[4].param_type, ParamKind::Number);
        assert!(forest.iter().all(|p| !p.required));
    }

    #[test]
    fn test_array_of_objects_uses_first_element() {
        let forest = derive_parameters(
            &json!({ "users": [{ "id": 1, "name": "a" }, { "other": true }] }),
            &[],
        )
        .unwrap();

        let users = &forest[0];
        assert_eq!(users.param_type, ParamKind::Array);
        let fields: Vec<&str> = users.children.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(fields, vec!["id", "name"]);
    }

    #[test]
    fn test_empty_and_null_arrays_have_no_children() {
        let forest = derive_parameters(&json!({ "a": [], "b": [null, 1] }), &[]).unwrap();
        assert!(forest[0].children.is_empty());
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn test_key_order_preserved() {
        let json: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let forest = derive_parameters(&json, &[]).unwrap();

        let names: Vec<&str> = forest.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_metadata_preserved_by_name() {
        let old = vec![
            existing(10, "email", 0, true, Some("user email")),
            existing(11, "gone", 1, true, Some("dropped")),
        ];

        for value in [json!("a@b.c"), json!(5), json!(false), json!(null)] {
            let forest = derive_parameters(&json!({ "email": value, "fresh": 1 }), &old).unwrap();

            assert!(forest[0].required);
            assert_eq!(forest[0].description.as_deref(), Some("user email"));
            assert!(!forest[1].required);
            assert_eq!(forest[1].description, None);
        }
    }

    #[test]
    fn test_metadata_matched_at_any_depth() {
        let old = vec![existing(1, "id", 4, true, Some("primary key"))];

        let forest = derive_parameters(&json!({ "user": { "id": 7 } }), &old).unwrap();
        let id = &forest[0].children[0];
        assert!(id.required);
        assert_eq!(id.description.as_deref(), Some("primary key"));
    }

    #[test]
    fn test_duplicate_names_earliest_order_wins() {
        let old = vec![
            existing(2, "id", 5, false, Some("inner id")),
            existing(1, "id", 0, true, Some("outer id")),
        ];

        let forest = derive_parameters(&json!({ "id": 1 }), &old).unwrap();
        assert!(forest[0].required);
        assert_eq!(forest[0].description.as_deref(), Some("outer id"));
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            derive_parameters(&json!([1, 2]), &[]),
            Err(AppError::Validation(_))
        ));
        assert!(derive_parameters(&json!("text"), &[]).is_err());
    }
}

use serde_json::{Map, Value};

use crate::models::{ParamKind, Parameter};

/// Synthesize an example JSON object from a parameter forest.
///
/// Keys follow sibling order. The result depends only on the forest, so
/// repeated calls give identical output.
pub fn generate_example(forest: &[Parameter]) -> Value {
    Value::Object(example_object(forest))
}

fn example_object(params: &[Parameter]) -> Map<String, Value> {
    let mut object = Map::with_capacity(params.len());
    for param in params {
        object.insert(param.name.clone(), example_value(param));
    }
    object
}

fn example_value(param: &Parameter) -> Value {
    match &param.param_type {
        ParamKind::String => Value::String(param.description_text().unwrap_or("string").to_string()),
        ParamKind::Number => Value::from(0),
        ParamKind::Boolean => Value::Bool(false),
        ParamKind::Array => match param.children.as_slice() {
            [] => Value::Array(Vec::new()),
            [only] if !only.param_type.is_container() => Value::Array(vec![example_value(only)]),
            children => Value::Array(vec![Value::Object(example_object(children))]),
        },
        ParamKind::Object => Value::Object(example_object(&param.children)),
        ParamKind::Other(_) => Value::Null,
    }
}

use serde_json::{Map, Value};

use crate::models::SchemaProperty;

/// Build a JSON Schema object out of a flat property list.
pub fn object_schema(properties: &[SchemaProperty]) -> Value {
    let mut props = Map::new();
    let mut required = Vec::new();

    for property in properties {
        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String(property.property_type.clone()));
        schema.insert("description".to_string(), Value::String(property.description.clone()));

        if let Some(items) = &property.items {
            let mut item_schema = Map::new();
            item_schema.insert("type".to_string(), Value::String(items.clone()));
            schema.insert("items".to_string(), Value::Object(item_schema));
        }

        if property.nullable {
            schema.insert("nullable".to_string(), Value::Bool(true));
        }

        props.insert(property.name.clone(), Value::Object(schema));

        if property.required {
            required.push(Value::String(property.name.clone()));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".to_string(), Value::String("object".to_string()));
    schema.insert("properties".to_string(), Value::Object(props));

    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }

    Value::Object(schema)
}

/// Gemini spells schema types in upper case (`OBJECT`, `STRING`, ...).
pub fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let converted = map
                .iter()
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        ("type", Value::String(t)) => Value::String(t.to_ascii_uppercase()),
                        // property names are user data, only their schemas get converted
                        ("properties", Value::Object(props)) => Value::Object(
                            props
                                .iter()
                                .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                                .collect(),
                        ),
                        (_, other) => to_gemini_schema(other),
                    };
                    (key.clone(), value)
                })
                .collect();
            Value::Object(converted)
        }
        Value::Array(values) => Value::Array(values.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

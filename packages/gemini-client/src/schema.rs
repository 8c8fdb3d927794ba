//! Response schemas for JSON-constrained generation.
//!
//! Reshapes a schemars-style JSON schema into the subset Gemini's
//! `responseJsonSchema` accepts:
//!
//! 1. No `$ref` references: definitions are inlined at every use site
//! 2. No `definitions`, `$schema`, `title` or `format` keywords
//! 3. Object schemas list every property as required
//!
//! ```rust,ignore
//! let raw = serde_json::to_value(schemars::schema_for!(Selection))?;
//! let request = GenerateRequest::new(prompt).json(Some(normalize_schema(raw)));
//! ```

use serde_json::{Map, Value};

const DROPPED_KEYWORDS: &[&str] = &["$schema", "definitions", "title", "format"];

/// Reshape an arbitrary schemars-style schema into the accepted subset.
///
/// Idempotent: an already normalized schema comes back unchanged.
pub fn normalize_schema(root: Value) -> Value {
    let definitions = root
        .get("definitions")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    normalize(root, &definitions)
}

fn normalize(value: Value, definitions: &Map<String, Value>) -> Value {
    match value {
        Value::Object(map) => {
            if let Some(target) = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
            {
                return normalize(target.clone(), definitions);
            }

            let mut out: Map<String, Value> = map
                .into_iter()
                .filter(|(k, _)| !DROPPED_KEYWORDS.contains(&k.as_str()))
                .map(|(k, v)| match (k.as_str(), v) {
                    // Property names are data, not keywords.
                    ("properties", Value::Object(props)) => {
                        let props = props
                            .into_iter()
                            .map(|(name, schema)| (name, normalize(schema, definitions)))
                            .collect();
                        (k, Value::Object(props))
                    }
                    (_, v) => (k, normalize(v, definitions)),
                })
                .collect();

            let required: Option<Vec<Value>> = out
                .get("properties")
                .and_then(Value::as_object)
                .map(|props| props.keys().cloned().map(Value::String).collect());
            if let Some(required) = required {
                out.insert("required".to_string(), Value::Array(required));
            }

            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|v| normalize(v, definitions))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::{schema_for, JsonSchema};

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct Line {
        description: String,
        price: f64,
        note: Option<String>,
    }

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct Order {
        lines: Vec<Line>,
    }

    fn normalized<T: JsonSchema>() -> Value {
        normalize_schema(serde_json::to_value(schema_for!(T)).unwrap())
    }

    #[test]
    fn test_refs_are_inlined() {
        let schema = normalized::<Order>();
        let text = serde_json::to_string(&schema).unwrap();

        assert!(!text.contains("$ref"), "refs should be inlined: {}", text);
        assert!(!text.contains("definitions"));
        assert!(schema.get("$schema").is_none());

        let line = &schema["properties"]["lines"]["items"];
        assert_eq!(line["type"], "object");
        assert!(line["properties"].get("price").is_some());
    }

    #[test]
    fn test_every_property_required() {
        let schema = normalized::<Line>();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();

        assert!(required.contains(&"description"));
        assert!(required.contains(&"price"));
        assert!(required.contains(&"note"));
    }

    #[test]
    fn test_property_named_like_keyword_survives() {
        #[derive(JsonSchema)]
        #[allow(dead_code)]
        struct Listing {
            title: String,
        }

        let schema = normalized::<Listing>();
        assert!(schema["properties"].get("title").is_some());
    }

    #[test]
    fn test_format_keyword_dropped() {
        let schema = normalized::<Line>();
        assert!(schema["properties"]["price"].get("format").is_none());
        assert_eq!(schema["properties"]["price"]["type"], "number");
    }

    #[test]
    fn test_normalize_schema_is_idempotent() {
        let once = normalized::<Order>();
        assert_eq!(normalize_schema(once.clone()), once);
    }
}

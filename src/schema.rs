use serde_json::{Value, json};

use crate::client::OutputFormat;
use crate::config::{ContentEncoding, SchemaMode};

pub const SCHEMA_NAME: &str = "repo_patch";

/// JSON schema for the reply: one required object of path to string content.
///
/// Strict structured output requires `properties` and `required` on every object,
/// so the inner map carries empty ones next to `additionalProperties`.
pub fn output_schema(encoding: ContentEncoding) -> Value {
    let field = encoding.files_field();
    json!({
        "type": "object",
        "properties": {
            field: {
                "type": "object",
                "properties": {},
                "additionalProperties": { "type": "string" },
                "required": []
            }
        },
        "required": [field],
        "additionalProperties": false
    })
}

pub fn output_format(mode: SchemaMode, encoding: ContentEncoding) -> OutputFormat {
    match mode {
        SchemaMode::Strict => OutputFormat::JsonSchema {
            name: SCHEMA_NAME.to_string(),
            schema: output_schema(encoding),
            strict: true,
        },
        SchemaMode::BestEffort => OutputFormat::Text,
    }
}

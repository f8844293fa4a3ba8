use jsonschema::validator_for;
use serde_json::Value;

/// JSON Schema (draft 2020-12) of a `resources/list` result.
pub const LIST_RESULT_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "resources/list result",
  "type": "object",
  "required": ["resources", "truncated", "generation"],
  "additionalProperties": false,
  "properties": {
    "resources": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["id", "uri", "name", "description", "size", "mimeHint", "mimeType"],
        "additionalProperties": false,
        "properties": {
          "id": { "type": "string", "pattern": "^file:///" },
          "uri": { "type": "string", "pattern": "^file:///" },
          "name": { "type": "string", "minLength": 1 },
          "description": { "type": "string" },
          "size": { "type": "integer", "minimum": 0 },
          "mimeHint": { "type": "string" },
          "mimeType": { "type": "string" }
        }
      }
    },
    "truncated": { "type": "boolean" },
    "generation": { "type": "integer", "minimum": 1 }
  }
}"#;

/// JSON Schema (draft 2020-12) of a `resources/read` result.
pub const READ_RESULT_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "resources/read result",
  "type": "object",
  "required": ["id", "content", "size", "mimeHint", "contents"],
  "additionalProperties": false,
  "properties": {
    "id": { "type": "string", "pattern": "^file:///" },
    "content": { "type": "string" },
    "size": { "type": "integer", "minimum": 0 },
    "mimeHint": { "type": "string" },
    "contents": {
      "type": "array",
      "minItems": 1,
      "items": {
        "type": "object",
        "required": ["uri", "mimeType", "text"],
        "properties": {
          "uri": { "type": "string" },
          "mimeType": { "type": "string" },
          "text": { "type": "string" }
        }
      }
    }
  }
}"#;

/// JSON Schema (draft 2020-12) of the structured error carried in `data`.
pub const ERROR_DATA_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Resource error",
  "type": "object",
  "required": ["error"],
  "additionalProperties": false,
  "properties": {
    "error": {
      "type": "object",
      "required": ["code", "message"],
      "additionalProperties": false,
      "properties": {
        "code": {
          "type": "string",
          "enum": ["invalid_params", "not_found", "size_exceeded", "io_error", "internal_error"]
        },
        "message": { "type": "string", "minLength": 1 }
      }
    }
  }
}"#;

#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    #[error("Schema parse error: {0}")]
    SchemaParse(#[from] serde_json::Error),
    #[error("Schema compile error: {0}")]
    SchemaCompile(String),
    #[error("Instance validation failed")]
    ValidationFailed,
}

/// Validate a JSON instance against a JSON Schema (draft 2020-12).
/// Returns Ok(()) if valid, Err otherwise.
pub fn validate_json(schema_str: &str, instance_str: &str) -> Result<(), SchemaValidationError> {
    let instance_json: Value = serde_json::from_str(instance_str)?;
    validate_value(schema_str, &instance_json)
}

/// Same as [`validate_json`] for an already-parsed instance.
pub fn validate_value(schema_str: &str, instance: &Value) -> Result<(), SchemaValidationError> {
    let schema_json: Value = serde_json::from_str(schema_str)?;

    let validator = validator_for(&schema_json)
        .map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))?;

    if validator.is_valid(instance) {
        Ok(())
    } else {
        Err(SchemaValidationError::ValidationFailed)
    }
}

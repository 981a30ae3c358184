use serde_json::Value;
use tracing::debug;

use crate::{
    error::{Result, SchedulerError},
    ports::SchemaValidator,
};

/// JSON Schema validator for connector configurations.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSchemaValidator;

impl JsonSchemaValidator {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn validate(&self, schema: &Value, document: &Value) -> Result<()> {
        // A connector shipping an unusable schema is reported the same way
        // as a document that fails it.
        let validator = jsonschema::validator_for(schema).map_err(|err| {
            SchedulerError::Validation {
                violations: vec![format!("invalid connector schema: {err}")],
            }
        })?;

        let violations: Vec<String> = validator
            .iter_errors(document)
            .map(|err| err.to_string())
            .collect();
        if violations.is_empty() {
            return Ok(());
        }
        debug!(count = violations.len(), "configuration rejected by schema");
        Err(SchedulerError::Validation { violations })
    }
}

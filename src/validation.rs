//! Input validation for workflow `run` arguments
//!
//! Every check here runs before any workflow state is touched, and every
//! failure is a [`WorkflowError::Validation`].

use crate::error::{WorkflowError, WorkflowResult};
use serde_json::Value;

/// Maximum allowed size for an outbound request payload (1MB)
const MAX_PAYLOAD_SIZE_BYTES: usize = 1024 * 1024;

/// Maximum nesting depth for payload objects/arrays
const MAX_PAYLOAD_DEPTH: usize = 10;

/// Require a nonempty identifier, returning it
pub fn require_identifier<'a>(field: &str, value: Option<&'a str>) -> WorkflowResult<&'a str> {
    match value {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(WorkflowError::validation(format!(
            "requires '{field}' is nonempty string and mandatory property"
        ))),
    }
}

/// If `payload` carries `field` it must equal the top-level identifier
pub fn require_matching_identifier(
    field: &str,
    expected: &str,
    payload: Option<&Value>,
) -> WorkflowResult<()> {
    let Some(nested) = payload.and_then(|p| p.get(field)) else {
        return Ok(());
    };

    if nested.as_str() == Some(expected) {
        Ok(())
    } else {
        Err(WorkflowError::validation(format!(
            "'{field}' in the request payload ({nested}) must match the top-level '{field}' ({expected})"
        )))
    }
}

/// An optional routing field, when present, must be nonempty
pub fn require_nonempty_if_present(field: &str, value: Option<&str>) -> WorkflowResult<()> {
    match value {
        Some("") => Err(WorkflowError::validation(format!(
            "'{field}' must be a nonempty string when provided"
        ))),
        _ => Ok(()),
    }
}

/// Validates an outbound request payload for shape and size constraints
pub fn validate_request_payload(payload: &Value) -> WorkflowResult<()> {
    if !payload.is_object() {
        return Err(WorkflowError::validation(
            "Request payload must be a JSON object",
        ));
    }

    let serialized = serde_json::to_string(payload)?;
    if serialized.len() > MAX_PAYLOAD_SIZE_BYTES {
        return Err(WorkflowError::validation(format!(
            "Request payload too large: {} bytes (max: {})",
            serialized.len(),
            MAX_PAYLOAD_SIZE_BYTES
        )));
    }

    validate_depth(payload, 0)
}

fn validate_depth(value: &Value, current_depth: usize) -> WorkflowResult<()> {
    if current_depth > MAX_PAYLOAD_DEPTH {
        return Err(WorkflowError::validation(format!(
            "Request payload nesting too deep: {current_depth} (max: {MAX_PAYLOAD_DEPTH})"
        )));
    }

    match value {
        Value::Object(map) => map
            .values()
            .try_for_each(|v| validate_depth(v, current_depth + 1)),
        Value::Array(items) => items
            .iter()
            .try_for_each(|v| validate_depth(v, current_depth + 1)),
        _ => Ok(()),
    }
}

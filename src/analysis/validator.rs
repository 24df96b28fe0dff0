// src/analysis/validator.rs
//! Runtime validation of the model's JSON output. Nothing in the payload is
//! trusted until it has been checked here.

use crate::error::AnalysisError;
use crate::types::{AnalysisResult, IndicatorStatus, KeyIndicator};
use serde_json::{Map, Value};

/// Parse raw model output and validate it into an [`AnalysisResult`].
pub fn parse_model_output(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| {
        AnalysisError::MalformedResponse(format!("model output is not valid JSON: {}", e))
    })?;

    validate_analysis(&value)
}

pub fn validate_analysis(value: &Value) -> Result<AnalysisResult, AnalysisError> {
    let object = expect_object(value, "$")?;

    let is_genuine = match object.get("isGenuine") {
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            return Err(AnalysisError::schema(
                "isGenuine",
                format!("expected boolean, found {}", type_name(other)),
            ))
        }
        None => return Err(AnalysisError::schema("isGenuine", "missing required field")),
    };

    let reason = required_string(object, "reason", "reason")?;

    let (list_key, list_value) = if let Some(value) = object.get("keyIndicators") {
        ("keyIndicators", value)
    } else if let Some(value) = object.get("indicators") {
        ("indicators", value)
    } else {
        return Err(AnalysisError::schema("keyIndicators", "missing required field"));
    };

    let items = list_value.as_array().ok_or_else(|| {
        AnalysisError::schema(
            list_key,
            format!("expected array, found {}", type_name(list_value)),
        )
    })?;

    let indicators = items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_indicator(&format!("{}[{}]", list_key, index), item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnalysisResult {
        is_genuine,
        reason,
        indicators,
    })
}

fn validate_indicator(path: &str, value: &Value) -> Result<KeyIndicator, AnalysisError> {
    let object = expect_object(value, path)?;

    let name = required_string(object, "indicator", &format!("{}.indicator", path))?;
    let details = required_string(object, "details", &format!("{}.details", path))?;

    let status_path = format!("{}.status", path);
    let status = required_string(object, "status", &status_path)?
        .parse::<IndicatorStatus>()
        .map_err(|problem| AnalysisError::schema(status_path, problem))?;

    Ok(KeyIndicator {
        name,
        status,
        details,
    })
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, AnalysisError> {
    value.as_object().ok_or_else(|| {
        AnalysisError::schema(path, format!("expected object, found {}", type_name(value)))
    })
}

fn required_string(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<String, AnalysisError> {
    match object.get(key) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(AnalysisError::schema(
            path,
            format!("expected string, found {}", type_name(other)),
        )),
        None => Err(AnalysisError::schema(path, "missing required field")),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

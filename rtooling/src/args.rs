//! JSON argument parsing, typed getters, and lenient coercion to declared parameter types.
//!
//! ```rust
//! use rtooling::{ParamSpec, ParamType, coerce_arguments, parse_json_object, required_i64};
//!
//! let args = parse_json_object(r#"{"a":"2","b":3.0}"#).expect("object should parse");
//! let params = [
//!     ParamSpec::required("a", ParamType::Integer),
//!     ParamSpec::required("b", ParamType::Integer),
//! ];
//! let args = coerce_arguments(&params, args).expect("arguments should coerce");
//! assert_eq!(required_i64(&args, "a").expect("a"), 2);
//! assert_eq!(required_i64(&args, "b").expect("b"), 3);
//! ```

use serde_json::{Map, Number, Value};

use crate::{ParamSpec, ParamType, ToolError};

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))
}

pub fn parse_json_object(args_json: &str) -> Result<Map<String, Value>, ToolError> {
    // Backends send "" for zero-argument calls.
    if args_json.trim().is_empty() {
        return Ok(Map::new());
    }

    match parse_json_value(args_json)? {
        Value::Object(map) => Ok(map),
        _ => Err(ToolError::invalid_arguments(
            "expected JSON object arguments",
        )),
    }
}

pub fn required_string(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required string: '{key}'")))
}

pub fn required_i64(args: &Map<String, Value>, key: &str) -> Result<i64, ToolError> {
    args.get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required integer: '{key}'")))
}

pub fn required_f64(args: &Map<String, Value>, key: &str) -> Result<f64, ToolError> {
    args.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required number: '{key}'")))
}

pub fn required_bool(args: &Map<String, Value>, key: &str) -> Result<bool, ToolError> {
    args.get(key)
        .and_then(Value::as_bool)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required boolean: '{key}'")))
}

pub fn optional_string(args: &Map<String, Value>, key: &str) -> Option<String> {
    args.get(key).and_then(Value::as_str).map(ToString::to_string)
}

/// Checks required parameters and coerces each declared value to its semantic type.
/// Arguments not named in `params` pass through untouched.
pub fn coerce_arguments(
    params: &[ParamSpec],
    mut args: Map<String, Value>,
) -> Result<Map<String, Value>, ToolError> {
    for param in params {
        match args.remove(&param.name) {
            None | Some(Value::Null) => {
                if param.required {
                    return Err(ToolError::invalid_arguments(format!(
                        "missing required argument: '{}'",
                        param.name
                    )));
                }
            }
            Some(value) => {
                let coerced = coerce_value(param.ty, value).ok_or_else(|| {
                    ToolError::invalid_arguments(format!(
                        "argument '{}' is not a valid {}",
                        param.name,
                        param.ty.json_type()
                    ))
                })?;
                args.insert(param.name.clone(), coerced);
            }
        }
    }

    Ok(args)
}

fn coerce_value(ty: ParamType, value: Value) -> Option<Value> {
    match (ty, value) {
        (ParamType::Integer, Value::Number(number)) => integral(&number).map(Value::from),
        (ParamType::Integer, Value::String(text)) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| {
                    text.parse::<f64>()
                        .ok()
                        .and_then(Number::from_f64)
                        .and_then(|number| integral(&number))
                })
                .map(Value::from)
        }
        (ParamType::Float, Value::Number(number)) => Some(Value::Number(number)),
        (ParamType::Float, Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        (ParamType::Boolean, Value::Bool(flag)) => Some(Value::Bool(flag)),
        (ParamType::Boolean, Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        (ParamType::String, Value::String(text)) => Some(Value::String(text)),
        (ParamType::String, Value::Number(number)) => Some(Value::String(number.to_string())),
        (ParamType::String, Value::Bool(flag)) => Some(Value::String(flag.to_string())),
        (ParamType::Object, value @ Value::Object(_)) => Some(value),
        (ParamType::Array, value @ Value::Array(_)) => Some(value),
        _ => None,
    }
}

fn integral(number: &Number) -> Option<i64> {
    if let Some(value) = number.as_i64() {
        return Some(value);
    }

    let value = number.as_f64()?;
    (value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64)
        .then_some(value as i64)
}

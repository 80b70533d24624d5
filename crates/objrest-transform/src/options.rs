//! Plugin options.
//!
//! The pass recognizes a single option, `useBuiltIns`. Options arrive as a
//! JSON value from the host pipeline and are validated once, when the pass is
//! constructed; a bad value fails the whole compilation unit up front.

use crate::error::TransformError;
use serde_json::Value;

pub const USE_BUILT_INS: &str = "useBuiltIns";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRestSpreadOptions {
    /// Merge with `Object.assign` instead of the injected `_extends` helper.
    pub use_built_ins: bool,
}

impl ObjectRestSpreadOptions {
    pub fn new(use_built_ins: bool) -> Self {
        ObjectRestSpreadOptions { use_built_ins }
    }

    /// Validate plugin options. `null` means "no options".
    pub fn from_json(value: &Value) -> Result<Self, TransformError> {
        let map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(TransformError::InvalidOptions {
                    found: describe(other),
                });
            }
        };

        let use_built_ins = match map.get(USE_BUILT_INS) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                return Err(TransformError::InvalidOption {
                    option: USE_BUILT_INS.to_string(),
                    found: describe(other),
                });
            }
        };

        for key in map.keys().filter(|key| key.as_str() != USE_BUILT_INS) {
            tracing::warn!(option = %key, "ignoring unknown transform-object-rest-spread option");
        }

        Ok(ObjectRestSpreadOptions { use_built_ins })
    }
}

/// Short human description of a JSON value for diagnostics.
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => format!("boolean {flag}"),
        Value::Number(number) => format!("number {number}"),
        Value::String(text) => format!("string {}", Value::String(text.clone())),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

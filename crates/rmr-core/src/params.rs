//! Parameter sets supplied by callers of a resolver backend.
//!
//! A parameter set is an ordered sequence of name/value pairs. Names need not
//! be unique at the type level, but every name a backend recognizes must
//! appear at most once, bound to a non-empty string value.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::resolver::ResolutionError;

/// Parameter name for the resource kind, required by every backend.
pub const PARAM_KIND: &str = "kind";
/// Parameter name for the resource name, required by every backend.
pub const PARAM_NAME: &str = "name";

/// Value of a parameter: an opaque string or a structured value.
///
/// Structured values exist for callers that forward richer parameter types;
/// backends in this crate only accept string values for the names they
/// recognize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Array(Vec<String>),
    Object(HashMap<String, String>),
}

impl ParamValue {
    /// Returns the string payload, or `None` for structured values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            ParamValue::Array(_) | ParamValue::Object(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

/// A single name/value pair in a parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: ParamValue,
}

impl Param {
    /// Convenience constructor for a string-valued parameter.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            value: ParamValue::String(value.into()),
        }
    }
}

/// Extracts every name in `required` from `params` as a single non-empty
/// string value.
///
/// A recognized name appearing more than once fails with `DuplicateParam`;
/// a recognized name bound to an array or object fails with `WrongParamType`.
/// Names that are absent or bound to an empty string are collected and
/// reported together through `MissingParams`, so the caller sees every
/// missing field at once.
pub fn require_string_params<'a>(
    resolver: &'static str,
    params: &'a [Param],
    required: &[&str],
) -> Result<HashMap<&'a str, &'a str>, ResolutionError> {
    let mut values: HashMap<&str, &str> = HashMap::new();

    for param in params {
        let name = param.name.as_str();
        if !required.contains(&name) {
            continue;
        }
        let value = match param.value.as_str() {
            Some(v) => v,
            None => {
                return Err(ResolutionError::WrongParamType {
                    name: name.to_string(),
                })
            }
        };
        if values.insert(name, value).is_some() {
            return Err(ResolutionError::DuplicateParam {
                name: name.to_string(),
            });
        }
    }

    let missing: Vec<String> = required
        .iter()
        .filter(|name| values.get(*name).map_or(true, |v| v.is_empty()))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ResolutionError::MissingParams { resolver, missing });
    }

    Ok(values)
}

/// Kind of manifest a resolution request asks for.
///
/// The two literals are case-sensitive; any other value is a validation
/// error, even when all other parameters are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Task,
    Pipeline,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Task => "task",
            ResourceKind::Pipeline => "pipeline",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(ResourceKind::Task),
            "pipeline" => Ok(ResourceKind::Pipeline),
            other => Err(ResolutionError::InvalidKind {
                kind: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

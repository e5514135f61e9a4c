// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Container parameters and `%placeholder%` resolution.

use crate::error::{ContainerError, ContainerResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A configuration value stored in a [`ParameterBag`] or passed as a literal
/// service argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// Explicit absence of a value.
    Null,
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A string, possibly containing placeholders until resolved.
    String(String),
    /// An ordered list of values.
    List(Vec<ParameterValue>),
}

impl ParameterValue {
    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParameterValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the list payload, if this is a list.
    pub fn as_list(&self) -> Option<&[ParameterValue]> {
        match self {
            ParameterValue::List(values) => Some(values),
            _ => None,
        }
    }

    /// Renders a scalar for string interpolation. Lists cannot be embedded.
    fn interpolate(&self) -> Option<String> {
        match self {
            ParameterValue::Null => Some(String::new()),
            ParameterValue::Bool(value) => Some(value.to_string()),
            ParameterValue::Integer(value) => Some(value.to_string()),
            ParameterValue::Float(value) => Some(value.to_string()),
            ParameterValue::String(value) => Some(value.clone()),
            ParameterValue::List(_) => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Null => f.write_str("null"),
            ParameterValue::Bool(value) => write!(f, "{value}"),
            ParameterValue::Integer(value) => write!(f, "{value}"),
            ParameterValue::Float(value) => write!(f, "{value}"),
            ParameterValue::String(value) => f.write_str(value),
            ParameterValue::List(values) => {
                f.write_str("[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_owned())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::String(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Integer(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        ParameterValue::Integer(i64::from(value))
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Float(value)
    }
}

impl<T: Into<ParameterValue>> From<Vec<T>> for ParameterValue {
    fn from(values: Vec<T>) -> Self {
        ParameterValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Named parameters of a container.
///
/// Values may reference each other with `%name%` placeholders until
/// [`ParameterBag::resolve_all`] runs; `%%` is a literal percent sign.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBag {
    values: BTreeMap<String, ParameterValue>,
}

impl ParameterBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the value of a parameter.
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    /// Returns the value of a parameter or a `ParameterNotFound` error.
    pub fn require(&self, name: &str) -> ContainerResult<&ParameterValue> {
        self.values
            .get(name)
            .ok_or_else(|| ContainerError::ParameterNotFound(name.to_owned()))
    }

    /// Returns `true` if the parameter is registered.
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Removes a parameter, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<ParameterValue> {
        self.values.remove(name)
    }

    /// Iterates over parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of registered parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no parameter is registered.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replaces every placeholder in every parameter with its resolved value.
    pub fn resolve_all(&mut self) -> ContainerResult<()> {
        let mut resolved = BTreeMap::new();
        for (name, value) in &self.values {
            let mut stack = vec![name.clone()];
            resolved.insert(name.clone(), self.resolve_with(value, &mut stack)?);
        }
        self.values = resolved;
        Ok(())
    }

    /// Resolves the placeholders inside `value` against this bag.
    pub fn resolve_value(&self, value: &ParameterValue) -> ContainerResult<ParameterValue> {
        self.resolve_with(value, &mut Vec::new())
    }

    fn resolve_with(
        &self,
        value: &ParameterValue,
        stack: &mut Vec<String>,
    ) -> ContainerResult<ParameterValue> {
        match value {
            ParameterValue::String(text) => self.resolve_string(text, stack),
            ParameterValue::List(values) => values
                .iter()
                .map(|value| self.resolve_with(value, stack))
                .collect::<ContainerResult<Vec<_>>>()
                .map(ParameterValue::List),
            other => Ok(other.clone()),
        }
    }

    fn resolve_string(&self, text: &str, stack: &mut Vec<String>) -> ContainerResult<ParameterValue> {
        if let Some(name) = single_placeholder(text) {
            return self.resolve_named(name, stack);
        }

        let mut output = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find('%') {
            output.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            if let Some(tail) = after.strip_prefix('%') {
                output.push('%');
                rest = tail;
                continue;
            }
            match after.find('%') {
                Some(end) if is_placeholder_name(&after[..end]) => {
                    let name = &after[..end];
                    let value = self.resolve_named(name, stack)?;
                    let rendered =
                        value
                            .interpolate()
                            .ok_or_else(|| ContainerError::InvalidParameter {
                                name: name.to_owned(),
                                reason: "a list cannot be interpolated into a string".to_owned(),
                            })?;
                    output.push_str(&rendered);
                    rest = &after[end + 1..];
                }
                _ => {
                    output.push('%');
                    rest = after;
                }
            }
        }
        output.push_str(rest);
        Ok(ParameterValue::String(output))
    }

    fn resolve_named(&self, name: &str, stack: &mut Vec<String>) -> ContainerResult<ParameterValue> {
        if stack.iter().any(|seen| seen == name) {
            let mut path = stack.clone();
            path.push(name.to_owned());
            return Err(ContainerError::CircularParameter(path));
        }
        let value = self.require(name)?;
        stack.push(name.to_owned());
        let resolved = self.resolve_with(value, stack);
        stack.pop();
        resolved
    }
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(char::is_whitespace)
}

/// Returns the inner name when `text` is exactly one `%name%` placeholder.
fn single_placeholder(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('%')?.strip_suffix('%')?;
    (is_placeholder_name(inner) && !inner.contains('%')).then_some(inner)
}

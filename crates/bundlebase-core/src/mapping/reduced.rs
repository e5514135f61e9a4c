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

use std::fmt;

/// One overridable mapping field, as seen by the compiler pass.
///
/// Non-overwritable bags carry the literal. Overwritable bags carry the name
/// of the container parameter that may override it, together with the
/// literal to fall back to when that parameter is never registered.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingValue<T> {
    /// The declared value, used as is.
    Literal(T),
    /// A container parameter indirection.
    Parameter {
        /// Name of the override parameter.
        name: String,
        /// Declared value, used when the parameter is absent.
        fallback: T,
    },
}

impl<T> MappingValue<T> {
    /// Creates a parameter indirection.
    pub fn parameter(name: impl Into<String>, fallback: T) -> Self {
        MappingValue::Parameter {
            name: name.into(),
            fallback,
        }
    }

    /// Returns the parameter name, if this value is an indirection.
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            MappingValue::Literal(_) => None,
            MappingValue::Parameter { name, .. } => Some(name),
        }
    }

    /// Returns the literal, or the fallback of an indirection.
    pub fn fallback(&self) -> &T {
        match self {
            MappingValue::Literal(value) | MappingValue::Parameter { fallback: value, .. } => {
                value
            }
        }
    }

    /// Returns `true` if this value is an indirection.
    pub fn is_parameter(&self) -> bool {
        matches!(self, MappingValue::Parameter { .. })
    }
}

impl<T: Default> Default for MappingValue<T> {
    fn default() -> Self {
        MappingValue::Literal(T::default())
    }
}

impl<T: fmt::Display> fmt::Display for MappingValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingValue::Literal(value) => write!(f, "{value}"),
            MappingValue::Parameter { name, .. } => write!(f, "{name}"),
        }
    }
}

/// The four overridable fields of a [`MappingBag`](super::MappingBag).
///
/// Derived once when the bag is built and never mutated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReducedMappingBag {
    entity_class: MappingValue<String>,
    entity_mapping_file: MappingValue<String>,
    manager_name: MappingValue<String>,
    entity_is_enabled: MappingValue<bool>,
}

impl ReducedMappingBag {
    /// Creates a reduced bag from its four values.
    pub fn new(
        entity_class: MappingValue<String>,
        entity_mapping_file: MappingValue<String>,
        manager_name: MappingValue<String>,
        entity_is_enabled: MappingValue<bool>,
    ) -> Self {
        Self {
            entity_class,
            entity_mapping_file,
            manager_name,
            entity_is_enabled,
        }
    }

    /// Fully qualified entity class, or its override parameter.
    pub fn entity_class(&self) -> &MappingValue<String> {
        &self.entity_class
    }

    /// Mapping file path, or its override parameter.
    pub fn entity_mapping_file(&self) -> &MappingValue<String> {
        &self.entity_mapping_file
    }

    /// Manager name, or its override parameter.
    pub fn manager_name(&self) -> &MappingValue<String> {
        &self.manager_name
    }

    /// Enabled flag, or its override parameter.
    pub fn entity_is_enabled(&self) -> &MappingValue<bool> {
        &self.entity_is_enabled
    }
}

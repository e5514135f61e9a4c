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

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a persistent object.
pub type SharedEntity = Arc<dyn Entity>;

/// A persistent object, as far as managers and repositories are concerned.
///
/// Fields are exposed as JSON values so that criteria can be matched without
/// knowing the concrete type.
pub trait Entity: fmt::Debug + Send + Sync + 'static {
    /// Returns the fully qualified class this object is an instance of.
    fn class_name(&self) -> &str;

    /// Returns the identifier of this object.
    fn id(&self) -> EntityId;

    /// Returns the value of field `name`, if it exists.
    fn field(&self, name: &str) -> Option<Value>;

    /// Allows downcasting to the concrete entity type.
    fn as_any(&self) -> &dyn Any;
}

impl dyn Entity {
    /// Downcasts to a concrete entity type.
    pub fn downcast_ref<T: Entity>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Identifier of a persistent object.
///
/// Numeric and textual ids share one representation, so `EntityId::from(1)`
/// and `EntityId::from("1")` designate the same object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&EntityId> for EntityId {
    fn from(value: &EntityId) -> Self {
        value.clone()
    }
}

macro_rules! entity_id_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for EntityId {
                fn from(value: $ty) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

entity_id_from_integer!(i32, i64, u32, u64, usize);

/// Field equality constraints used by `find_by` style queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria(Map<String, Value>);

impl Criteria {
    /// Creates empty criteria, which match everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality constraint on `field`.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Returns `true` if every constraint holds for `entity`.
    pub fn matches(&self, entity: &dyn Entity) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| entity.field(field).as_ref() == Some(expected))
    }

    /// Returns the number of constraints.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no constraints.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

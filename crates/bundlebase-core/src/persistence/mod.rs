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

//! Contracts of the external object-persistence layer.
//!
//! The mapping pipeline never talks to a database directly. It only needs a
//! [`ManagerRegistry`] that can say which [`ObjectManager`] owns a class, and
//! managers that can hand out an [`ObjectRepository`] and track writes.
//! `bundlebase-infra` ships an in-memory implementation of these traits.

mod entity;
mod error;

pub use entity::{Criteria, Entity, EntityId, SharedEntity};
pub use error::PersistenceError;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared handle to an object manager.
pub type SharedManager = Arc<dyn ObjectManager>;
/// Shared handle to an object repository.
pub type SharedRepository = Arc<dyn ObjectRepository>;
/// Shared handle to a manager registry.
pub type SharedRegistry = Arc<dyn ManagerRegistry>;

/// A mapping declaration handed to the persistence layer at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMapping {
    /// Name of the manager that owns the class.
    pub manager: String,
    /// Fully qualified entity class.
    pub class: String,
    /// Location of the mapping definition file.
    pub mapping_file: String,
    /// Disabled mappings are recorded but never claimed by a manager.
    pub enabled: bool,
}

/// Tracks and persists instances of the classes mapped to it.
pub trait ObjectManager: Send + Sync {
    /// Returns the logical name of this manager, e.g. `"default"`.
    fn name(&self) -> &str;

    /// Returns `true` if this manager claims `class`.
    fn handles_class(&self, class: &str) -> bool;

    /// Returns the repository for `class`.
    fn repository(&self, class: &str) -> Result<SharedRepository, PersistenceError>;

    /// Schedules `entity` for insertion or update.
    fn persist(&self, entity: SharedEntity) -> Result<(), PersistenceError>;

    /// Schedules `entity` for deletion.
    fn remove(&self, entity: SharedEntity) -> Result<(), PersistenceError>;

    /// Writes pending changes.
    ///
    /// With `Some(entity)` only the changes scheduled for that entity are
    /// written; the rest stay pending.
    fn flush(&self, scope: Option<&SharedEntity>) -> Result<(), PersistenceError>;

    /// Drops pending changes, either for one class or for all of them.
    fn clear(&self, class: Option<&str>);
}

/// Queries the stored instances of one class.
pub trait ObjectRepository: Send + Sync {
    /// Returns the class this repository serves.
    fn class_name(&self) -> &str;

    /// Finds an instance by identifier.
    fn find(&self, id: &EntityId) -> Option<SharedEntity>;

    /// Returns every stored instance.
    fn find_all(&self) -> Vec<SharedEntity>;

    /// Returns every instance whose fields match all of `criteria`.
    fn find_by(&self, criteria: &Criteria) -> Vec<SharedEntity>;

    /// Returns the first instance matching `criteria`.
    fn find_one_by(&self, criteria: &Criteria) -> Option<SharedEntity> {
        self.find_by(criteria).into_iter().next()
    }
}

/// Knows every manager and which one is responsible for a class.
pub trait ManagerRegistry: Send + Sync {
    /// Returns the manager called `name`.
    fn manager(&self, name: &str) -> Option<SharedManager>;

    /// Returns the manager responsible for `class`, or `None` if no manager
    /// claims it. A miss is an expected outcome, not an error.
    fn manager_for_class(&self, class: &str) -> Option<SharedManager>;

    /// Returns the names of all managers.
    fn manager_names(&self) -> Vec<String>;

    /// Registers a mapping declaration with the manager it names.
    fn add_entity_mapping(&self, mapping: EntityMapping) -> Result<(), PersistenceError>;
}

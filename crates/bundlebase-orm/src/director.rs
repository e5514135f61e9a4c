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

//! Per-entity façade over a manager and its repository.

use bundlebase_core::{
    Criteria, EntityId, PersistenceError, SharedEntity, SharedManager, SharedRepository,
};

/// Finds, saves and removes instances of one entity class.
///
/// The manager and repository are fixed at construction; both are shared
/// with the container that built the director.
#[derive(Clone)]
pub struct ObjectDirector {
    manager: SharedManager,
    repository: SharedRepository,
}

impl ObjectDirector {
    /// Creates a director over `manager` and `repository`.
    pub fn new(manager: SharedManager, repository: SharedRepository) -> Self {
        Self {
            manager,
            repository,
        }
    }

    /// Finds an instance by identifier.
    pub fn find(&self, id: impl Into<EntityId>) -> Option<SharedEntity> {
        self.repository.find(&id.into())
    }

    /// Returns the first instance matching `criteria`.
    pub fn find_one_by(&self, criteria: &Criteria) -> Option<SharedEntity> {
        self.repository.find_one_by(criteria)
    }

    /// Returns every instance matching `criteria`.
    pub fn find_by(&self, criteria: &Criteria) -> Vec<SharedEntity> {
        self.repository.find_by(criteria)
    }

    /// Returns every stored instance.
    pub fn find_all(&self) -> Vec<SharedEntity> {
        self.repository.find_all()
    }

    /// Persists `entity` and flushes only its own changes.
    pub fn save(&self, entity: SharedEntity) -> Result<SharedEntity, PersistenceError> {
        self.manager.persist(entity.clone())?;
        self.manager.flush(Some(&entity))?;
        Ok(entity)
    }

    /// Removes `entity` and flushes only its own changes.
    pub fn remove(&self, entity: SharedEntity) -> Result<(), PersistenceError> {
        self.manager.remove(entity.clone())?;
        self.manager.flush(Some(&entity))
    }

    /// The manager writes go through.
    pub fn manager(&self) -> &SharedManager {
        &self.manager
    }

    /// The repository reads go through.
    pub fn repository(&self) -> &SharedRepository {
        &self.repository
    }
}

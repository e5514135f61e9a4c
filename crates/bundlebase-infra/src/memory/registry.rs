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

use super::InMemoryObjectManager;
use bundlebase_core::{
    EntityMapping, ManagerRegistry, ObjectManager, PersistenceError, SharedManager,
};
use std::sync::Arc;

/// A fixed set of named in-memory managers.
///
/// A class belongs to at most one manager: mapping it again, even to another
/// manager, replaces the earlier mapping.
#[derive(Debug)]
pub struct InMemoryManagerRegistry {
    managers: Vec<Arc<InMemoryObjectManager>>,
}

impl InMemoryManagerRegistry {
    /// Creates one manager per name, in order. Duplicate names are ignored.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut managers: Vec<Arc<InMemoryObjectManager>> = Vec::new();
        for name in names {
            let name = name.into();
            if managers.iter().any(|manager| manager.name() == name) {
                log::warn!("InMemoryManagerRegistry: manager '{}' declared twice", name);
                continue;
            }
            managers.push(Arc::new(InMemoryObjectManager::new(name)));
        }
        Self { managers }
    }

    /// Returns the concrete manager called `name`.
    pub fn in_memory_manager(&self, name: &str) -> Option<&Arc<InMemoryObjectManager>> {
        self.managers.iter().find(|manager| manager.name() == name)
    }
}

impl ManagerRegistry for InMemoryManagerRegistry {
    fn manager(&self, name: &str) -> Option<SharedManager> {
        self.in_memory_manager(name)
            .map(|manager| manager.clone() as SharedManager)
    }

    fn manager_for_class(&self, class: &str) -> Option<SharedManager> {
        self.managers
            .iter()
            .find(|manager| manager.handles_class(class))
            .map(|manager| manager.clone() as SharedManager)
    }

    fn manager_names(&self) -> Vec<String> {
        self.managers
            .iter()
            .map(|manager| manager.name().to_owned())
            .collect()
    }

    fn add_entity_mapping(&self, mapping: EntityMapping) -> Result<(), PersistenceError> {
        let manager = self
            .in_memory_manager(&mapping.manager)
            .ok_or_else(|| PersistenceError::UnknownManager(mapping.manager.clone()))?;
        for other in self.managers.iter().filter(|other| other.name() != mapping.manager) {
            if other.unmap_class(&mapping.class).is_some() {
                log::debug!(
                    "InMemoryManagerRegistry: '{}' moves from '{}' to '{}'",
                    mapping.class,
                    other.name(),
                    mapping.manager
                );
            }
        }
        manager.map_class(mapping);
        Ok(())
    }
}

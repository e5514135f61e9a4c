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

use super::{InMemoryObjectRepository, SharedStore};
use bundlebase_core::{
    EntityId, EntityMapping, ObjectManager, PersistenceError, SharedEntity, SharedRepository,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

#[derive(Debug)]
enum PendingOp {
    Persist(SharedEntity),
    Remove(SharedEntity),
}

impl PendingOp {
    fn entity(&self) -> &SharedEntity {
        match self {
            PendingOp::Persist(entity) | PendingOp::Remove(entity) => entity,
        }
    }

    fn concerns(&self, class: &str, id: &EntityId) -> bool {
        let entity = self.entity();
        entity.class_name() == class && &entity.id() == id
    }
}

/// An object manager keeping its data in memory.
///
/// Writes are queued by [`persist`](ObjectManager::persist) and
/// [`remove`](ObjectManager::remove), and only become visible to
/// repositories once flushed.
#[derive(Debug)]
pub struct InMemoryObjectManager {
    name: String,
    mappings: RwLock<HashMap<String, EntityMapping>>,
    store: SharedStore,
    pending: Mutex<Vec<PendingOp>>,
    repositories: Mutex<HashMap<String, Arc<InMemoryObjectRepository>>>,
}

impl InMemoryObjectManager {
    /// Creates an empty manager called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mappings: RwLock::new(HashMap::new()),
            store: SharedStore::default(),
            pending: Mutex::new(Vec::new()),
            repositories: Mutex::new(HashMap::new()),
        }
    }

    /// Records a mapping. Only enabled mappings make the manager claim the
    /// class; a later mapping of the same class replaces the earlier one.
    pub fn map_class(&self, mapping: EntityMapping) {
        log::debug!(
            "InMemoryObjectManager '{}': mapped '{}' (enabled={}, file={})",
            self.name,
            mapping.class,
            mapping.enabled,
            mapping.mapping_file
        );
        self.mappings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(mapping.class.clone(), mapping);
    }

    /// Forgets the mapping of `class`, returning it if there was one.
    pub fn unmap_class(&self, class: &str) -> Option<EntityMapping> {
        self.mappings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(class)
    }

    /// Returns the mapping recorded for `class`.
    pub fn mapping(&self, class: &str) -> Option<EntityMapping> {
        self.mappings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(class)
            .cloned()
    }

    /// Number of queued writes.
    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn ensure_handles(&self, class: &str) -> Result<(), PersistenceError> {
        if self.handles_class(class) {
            Ok(())
        } else {
            Err(PersistenceError::UnmappedClass {
                manager: self.name.clone(),
                class: class.to_owned(),
            })
        }
    }

    fn apply(&self, ops: Vec<PendingOp>) {
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        for op in ops {
            match op {
                PendingOp::Persist(entity) => {
                    store
                        .entry(entity.class_name().to_owned())
                        .or_default()
                        .insert(entity.id(), entity);
                }
                PendingOp::Remove(entity) => {
                    if let Some(instances) = store.get_mut(entity.class_name()) {
                        instances.remove(&entity.id());
                    }
                }
            }
        }
    }
}

impl ObjectManager for InMemoryObjectManager {
    fn name(&self) -> &str {
        &self.name
    }

    fn handles_class(&self, class: &str) -> bool {
        self.mappings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(class)
            .is_some_and(|mapping| mapping.enabled)
    }

    fn repository(&self, class: &str) -> Result<SharedRepository, PersistenceError> {
        self.ensure_handles(class)?;
        let mut repositories = self
            .repositories
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let repository = repositories
            .entry(class.to_owned())
            .or_insert_with(|| Arc::new(InMemoryObjectRepository::new(class, self.store.clone())));
        Ok(repository.clone())
    }

    fn persist(&self, entity: SharedEntity) -> Result<(), PersistenceError> {
        self.ensure_handles(entity.class_name())?;
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PendingOp::Persist(entity));
        Ok(())
    }

    fn remove(&self, entity: SharedEntity) -> Result<(), PersistenceError> {
        self.ensure_handles(entity.class_name())?;
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PendingOp::Remove(entity));
        Ok(())
    }

    fn flush(&self, scope: Option<&SharedEntity>) -> Result<(), PersistenceError> {
        let ready = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            match scope {
                None => std::mem::take(&mut *pending),
                Some(entity) => {
                    let class = entity.class_name();
                    let id = entity.id();
                    let (ready, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut *pending)
                        .into_iter()
                        .partition(|op| op.concerns(class, &id));
                    *pending = rest;
                    ready
                }
            }
        };
        log::trace!(
            "InMemoryObjectManager '{}': flushing {} operation(s)",
            self.name,
            ready.len()
        );
        self.apply(ready);
        Ok(())
    }

    fn clear(&self, class: Option<&str>) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match class {
            None => pending.clear(),
            Some(class) => pending.retain(|op| op.entity().class_name() != class),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundlebase_core::{Criteria, Entity};
    use serde_json::{json, Value};
    use std::any::Any;

    #[derive(Debug)]
    struct Note {
        id: u32,
        title: &'static str,
    }

    impl Entity for Note {
        fn class_name(&self) -> &str {
            "app::Note"
        }

        fn id(&self) -> EntityId {
            EntityId::from(self.id)
        }

        fn field(&self, name: &str) -> Option<Value> {
            match name {
                "id" => Some(json!(self.id)),
                "title" => Some(json!(self.title)),
                _ => None,
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn note(id: u32, title: &'static str) -> SharedEntity {
        Arc::new(Note { id, title })
    }

    fn manager() -> InMemoryObjectManager {
        let manager = InMemoryObjectManager::new("default");
        manager.map_class(EntityMapping {
            manager: "default".into(),
            class: "app::Note".into(),
            mapping_file: "Resources/config/doctrine/Note.orm.yml".into(),
            enabled: true,
        });
        manager
    }

    #[test]
    fn test_changes_are_invisible_until_flushed() {
        let manager = manager();
        let repository = manager.repository("app::Note").unwrap();

        manager.persist(note(1, "first")).unwrap();
        assert!(repository.find(&EntityId::from(1)).is_none());

        manager.flush(None).unwrap();
        assert!(repository.find(&EntityId::from(1)).is_some());
        assert_eq!(manager.pending_count(), 0);
    }

    #[test]
    fn test_scoped_flush_leaves_other_changes_pending() {
        let manager = manager();
        let first = note(1, "first");
        manager.persist(first.clone()).unwrap();
        manager.persist(note(2, "second")).unwrap();

        manager.flush(Some(&first)).unwrap();

        let repository = manager.repository("app::Note").unwrap();
        assert_eq!(repository.find_all().len(), 1);
        assert_eq!(manager.pending_count(), 1);
    }

    #[test]
    fn test_remove_and_find_by() {
        let manager = manager();
        let first = note(1, "first");
        manager.persist(first.clone()).unwrap();
        manager.persist(note(2, "second")).unwrap();
        manager.flush(None).unwrap();

        let repository = manager.repository("app::Note").unwrap();
        let found = repository.find_one_by(&Criteria::new().with("title", "second"));
        assert_eq!(found.map(|e| e.id()), Some(EntityId::from(2)));

        manager.remove(first).unwrap();
        manager.flush(None).unwrap();
        assert!(repository.find(&EntityId::from(1)).is_none());
    }

    #[test]
    fn test_clear_drops_pending_changes() {
        let manager = manager();
        manager.persist(note(1, "first")).unwrap();
        manager.clear(Some("app::Note"));
        manager.flush(None).unwrap();

        assert!(manager.repository("app::Note").unwrap().find_all().is_empty());
    }

    #[test]
    fn test_unmapped_or_disabled_classes_are_rejected() {
        let manager = manager();
        manager.map_class(EntityMapping {
            manager: "default".into(),
            class: "app::Draft".into(),
            mapping_file: String::new(),
            enabled: false,
        });

        assert!(!manager.handles_class("app::Draft"));
        assert!(matches!(
            manager.repository("app::Draft"),
            Err(PersistenceError::UnmappedClass { .. })
        ));
        assert!(manager.repository("app::Ghost").is_err());
    }

    #[test]
    fn test_repositories_are_reused() {
        let manager = manager();
        let a = manager.repository("app::Note").unwrap();
        let b = manager.repository("app::Note").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}

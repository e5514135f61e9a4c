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

use super::SharedStore;
use bundlebase_core::{Criteria, EntityId, ObjectRepository, SharedEntity};
use std::sync::PoisonError;

/// Reads the flushed instances of one class.
///
/// Pending (unflushed) changes are invisible here.
#[derive(Debug)]
pub struct InMemoryObjectRepository {
    class: String,
    store: SharedStore,
}

impl InMemoryObjectRepository {
    pub(crate) fn new(class: impl Into<String>, store: SharedStore) -> Self {
        Self {
            class: class.into(),
            store,
        }
    }

    fn collect(&self, keep: impl Fn(&SharedEntity) -> bool) -> Vec<SharedEntity> {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        store
            .get(&self.class)
            .map(|instances| instances.values().filter(|e| keep(e)).cloned().collect())
            .unwrap_or_default()
    }
}

impl ObjectRepository for InMemoryObjectRepository {
    fn class_name(&self) -> &str {
        &self.class
    }

    fn find(&self, id: &EntityId) -> Option<SharedEntity> {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        store.get(&self.class)?.get(id).cloned()
    }

    fn find_all(&self) -> Vec<SharedEntity> {
        self.collect(|_| true)
    }

    fn find_by(&self, criteria: &Criteria) -> Vec<SharedEntity> {
        self.collect(|entity| criteria.matches(entity.as_ref()))
    }
}

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

//! Convenience access to a compiled container and its mapped entities.

use crate::error::{OrmError, OrmResult};
use crate::provider::{ObjectManagerProvider, ObjectRepositoryProvider};
use crate::services::{OBJECT_MANAGER_PROVIDER, OBJECT_REPOSITORY_PROVIDER};
use bundlebase_container::{Container, ContainerResult, ParameterValue};
use bundlebase_core::naming::{self, ENTITY_SEGMENT};
use bundlebase_core::mapping::FIELD_CLASS;
use bundlebase_core::{
    Criteria, EntityId, PersistenceError, SharedEntity, SharedManager, SharedRepository,
};
use regex::Regex;
use std::sync::{Arc, LazyLock};

/// `prefix.entity.name.class`
static ENTITY_CLASS_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*?\.entity\..*?\.class$").expect("entity class pattern is valid")
});
/// `prefix:name`
static SHORT_ALIAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^:]+:[^:]+$").expect("short alias pattern is valid"));

/// Wraps a compiled container with entity-alias resolution.
///
/// An entity may be named by its class, by the parameter holding its class
/// (`my_app.entity.user.class`) or by a short alias (`my_app:user`).
#[derive(Debug, Clone)]
pub struct ContainerAccessor {
    container: Arc<Container>,
}

impl ContainerAccessor {
    /// Wraps `container`.
    pub fn new(container: Arc<Container>) -> Self {
        Self { container }
    }

    /// The wrapped container.
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// Returns service `id` as a `T`.
    pub fn get<T: Send + Sync + 'static>(&self, id: &str) -> ContainerResult<Arc<T>> {
        self.container.get::<T>(id)
    }

    /// Returns `true` if service `id` exists.
    pub fn has(&self, id: &str) -> bool {
        self.container.has(id)
    }

    /// Returns the value of parameter `name`.
    pub fn get_parameter(&self, name: &str) -> ContainerResult<&ParameterValue> {
        self.container.get_parameter(name)
    }

    /// Resolves an entity alias to a class name.
    ///
    /// - `prefix.entity.name.class` resolves to the parameter value when the
    ///   parameter exists.
    /// - `prefix:name` is read as `prefix.entity.name.class` and resolved the
    ///   same way.
    /// - Anything else, including patterns whose parameter does not exist, is
    ///   returned unchanged.
    pub fn locate(&self, alias: &str) -> String {
        if ENTITY_CLASS_PARAMETER.is_match(alias) {
            if let Some(class) = self.class_parameter(alias) {
                return class;
            }
        }

        if SHORT_ALIAS.is_match(alias) {
            if let Some((prefix, name)) = alias.split_once(':') {
                let parameter = naming::container_key(&[prefix, ENTITY_SEGMENT, name, FIELD_CLASS]);
                if let Some(class) = self.class_parameter(&parameter) {
                    return class;
                }
            }
        }

        alias.to_owned()
    }

    /// Returns the manager of the entity named by `alias`.
    pub fn object_manager(&self, alias: &str) -> OrmResult<SharedManager> {
        let class = self.locate(alias);
        self.manager_for_class(&class)
    }

    /// Returns the repository of the entity named by `alias`.
    pub fn object_repository(&self, alias: &str) -> OrmResult<SharedRepository> {
        let class = self.locate(alias);
        let provider = self
            .container
            .get::<ObjectRepositoryProvider>(OBJECT_REPOSITORY_PROVIDER)?;
        Ok(provider.get_by_class(&class)?)
    }

    /// Finds one instance of the entity named by `alias`.
    pub fn find(&self, alias: &str, id: impl Into<EntityId>) -> OrmResult<Option<SharedEntity>> {
        Ok(self.object_repository(alias)?.find(&id.into()))
    }

    /// Returns the first instance matching `criteria`.
    pub fn find_one_by(&self, alias: &str, criteria: &Criteria) -> OrmResult<Option<SharedEntity>> {
        Ok(self.object_repository(alias)?.find_one_by(criteria))
    }

    /// Returns every instance matching `criteria`.
    pub fn find_by(&self, alias: &str, criteria: &Criteria) -> OrmResult<Vec<SharedEntity>> {
        Ok(self.object_repository(alias)?.find_by(criteria))
    }

    /// Returns every stored instance.
    pub fn find_all(&self, alias: &str) -> OrmResult<Vec<SharedEntity>> {
        Ok(self.object_repository(alias)?.find_all())
    }

    /// Drops the pending changes of the entity named by `alias`.
    pub fn clear(&self, alias: &str) -> OrmResult<()> {
        let class = self.locate(alias);
        self.manager_for_class(&class)?.clear(Some(&class));
        Ok(())
    }

    /// Persists and flushes each entity through the manager of its own class.
    ///
    /// Accepts one entity (`[entity]`) or any collection of them.
    pub fn save<I>(&self, entities: I) -> OrmResult<()>
    where
        I: IntoIterator<Item = SharedEntity>,
    {
        for entity in entities {
            let manager = self.manager_for_class(entity.class_name())?;
            manager.persist(entity.clone())?;
            manager.flush(Some(&entity))?;
        }
        Ok(())
    }

    fn manager_for_class(&self, class: &str) -> OrmResult<SharedManager> {
        let provider = self
            .container
            .get::<ObjectManagerProvider>(OBJECT_MANAGER_PROVIDER)?;
        provider
            .get_by_class(class)
            .ok_or_else(|| OrmError::from(PersistenceError::NoManagerForClass(class.to_owned())))
    }

    fn class_parameter(&self, name: &str) -> Option<String> {
        self.container
            .parameters()
            .get(name)
            .and_then(ParameterValue::as_str)
            .map(str::to_owned)
    }
}

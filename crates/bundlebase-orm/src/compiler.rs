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

//! Translates mapping descriptors into container definitions.

use crate::services::{
    ADD_ENTITY_MAPPING, GET_OBJECT_MANAGER, GET_OBJECT_REPOSITORY, MANAGER_REGISTRY,
    OBJECT_DIRECTOR_CLASS, OBJECT_MANAGER_CLASS, OBJECT_MANAGER_PROVIDER,
    OBJECT_REPOSITORY_CLASS, OBJECT_REPOSITORY_PROVIDER,
};
use bundlebase_container::{
    Argument, CompilerPass, ContainerBuilder, ContainerError, ContainerResult, Definition,
    ParameterValue,
};
use bundlebase_core::{EntityMapping, MappingBag, MappingBagProvider, MappingValue};
use std::sync::Arc;

/// Declares an entity mapping to the persistence layer at build time.
pub trait MappingLoader: Send + Sync {
    /// Records `mapping` in `container`.
    fn load(&self, container: &mut ContainerBuilder, mapping: &EntityMapping) -> ContainerResult<()>;
}

/// Appends an `add_entity_mapping` call to the manager registry definition.
#[derive(Debug, Clone)]
pub struct RegistryMappingLoader {
    registry_id: String,
}

impl RegistryMappingLoader {
    /// Targets the registry defined under `registry_id`.
    pub fn new(registry_id: impl Into<String>) -> Self {
        Self {
            registry_id: registry_id.into(),
        }
    }
}

impl Default for RegistryMappingLoader {
    fn default() -> Self {
        Self::new(MANAGER_REGISTRY)
    }
}

impl MappingLoader for RegistryMappingLoader {
    fn load(&self, container: &mut ContainerBuilder, mapping: &EntityMapping) -> ContainerResult<()> {
        let registry = container.find_definition_mut(&self.registry_id).ok_or_else(|| {
            ContainerError::ServiceNotFound {
                id: self.registry_id.clone(),
                referrer: Some("MappingCompilerPass".to_owned()),
            }
        })?;
        registry.add_method_call(
            ADD_ENTITY_MAPPING,
            vec![
                Argument::value(mapping.manager.as_str()),
                Argument::value(mapping.class.as_str()),
                Argument::value(mapping.mapping_file.as_str()),
                Argument::value(mapping.enabled),
            ],
        );
        Ok(())
    }
}

/// For every bag of a [`MappingBagProvider`]:
///
/// 1. resolves the reduced bag against the current parameters,
/// 2. declares the mapping through the [`MappingLoader`],
/// 3. defines `{prefix}.{objectManagerName}.{entity}`,
///    `{prefix}.{objectRepositoryName}.{entity}` and
///    `{prefix}.object_director.{entity}`.
///
/// Definitions are keyed by id, so processing the same bags twice leaves the
/// same entries behind.
pub struct MappingCompilerPass {
    provider: Arc<dyn MappingBagProvider>,
    loader: Box<dyn MappingLoader>,
}

impl MappingCompilerPass {
    /// Creates a pass over `provider` using the [`RegistryMappingLoader`].
    pub fn new(provider: Arc<dyn MappingBagProvider>) -> Self {
        Self {
            provider,
            loader: Box::new(RegistryMappingLoader::default()),
        }
    }

    /// Replaces the mapping loader.
    pub fn with_loader(mut self, loader: impl MappingLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    fn register(&self, container: &mut ContainerBuilder, bag: &MappingBag) -> ContainerResult<()> {
        let reduced = bag.reduced_mapping_bag();
        let class = resolve_string(container, reduced.entity_class())?;
        let mapping = EntityMapping {
            manager: resolve_string(container, reduced.manager_name())?,
            class: class.clone(),
            mapping_file: resolve_string(container, reduced.entity_mapping_file())?,
            enabled: resolve_bool(container, reduced.entity_is_enabled())?,
        };
        self.loader.load(container, &mapping)?;

        let manager_id = bag.object_manager_id();
        let repository_id = bag.object_repository_id();
        let director_id = bag.object_director_id();

        container.set_definition(
            manager_id.clone(),
            Definition::new(OBJECT_MANAGER_CLASS)
                .with_factory(OBJECT_MANAGER_PROVIDER, GET_OBJECT_MANAGER)
                .with_argument(Argument::value(class.as_str())),
        );
        container.set_definition(
            repository_id.clone(),
            Definition::new(OBJECT_REPOSITORY_CLASS)
                .with_factory(OBJECT_REPOSITORY_PROVIDER, GET_OBJECT_REPOSITORY)
                .with_argument(Argument::value(class.as_str())),
        );
        container.set_definition(
            director_id.clone(),
            Definition::new(OBJECT_DIRECTOR_CLASS)
                .with_argument(Argument::Reference(manager_id.clone()))
                .with_argument(Argument::Reference(repository_id.clone())),
        );

        log::debug!(
            "MappingCompilerPass: '{}' ({} via '{}') -> {}, {}, {}",
            bag.entity_name(),
            mapping.class,
            mapping.manager,
            manager_id,
            repository_id,
            director_id
        );
        Ok(())
    }
}

impl CompilerPass for MappingCompilerPass {
    fn name(&self) -> &str {
        "MappingCompilerPass"
    }

    fn process(&self, container: &mut ContainerBuilder) -> ContainerResult<()> {
        let collection = self.provider.mapping_bag_collection();
        for bag in &collection {
            self.register(container, bag)?;
        }
        Ok(())
    }
}

/// Returns the name and resolved value of the override parameter, if the
/// value is an indirection and the parameter is registered.
fn lookup<T>(
    container: &ContainerBuilder,
    value: &MappingValue<T>,
) -> ContainerResult<Option<(String, ParameterValue)>> {
    let Some(name) = value.parameter_name() else {
        return Ok(None);
    };
    match container.parameter(name) {
        Some(raw) => {
            let resolved = container.parameters().resolve_value(raw)?;
            Ok(Some((name.to_owned(), resolved)))
        }
        None => Ok(None),
    }
}

fn resolve_string(container: &ContainerBuilder, value: &MappingValue<String>) -> ContainerResult<String> {
    match lookup(container, value)? {
        Some((_, ParameterValue::String(text))) => Ok(text),
        Some((name, other)) => Err(ContainerError::InvalidParameter {
            name,
            reason: format!("expected a string, found `{other}`"),
        }),
        None => Ok(value.fallback().clone()),
    }
}

fn resolve_bool(container: &ContainerBuilder, value: &MappingValue<bool>) -> ContainerResult<bool> {
    let Some((name, resolved)) = lookup(container, value)? else {
        return Ok(*value.fallback());
    };
    match resolved {
        ParameterValue::Bool(flag) => Ok(flag),
        ParameterValue::Integer(0) => Ok(false),
        ParameterValue::Integer(1) => Ok(true),
        ParameterValue::String(text) => match text.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ContainerError::InvalidParameter {
                name,
                reason: format!("`{text}` is not a boolean"),
            }),
        },
        other => Err(ContainerError::InvalidParameter {
            name,
            reason: format!("`{other}` is not a boolean"),
        }),
    }
}

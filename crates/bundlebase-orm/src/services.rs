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

//! Ids, class labels and catalog entries of the base services.

use crate::director::ObjectDirector;
use crate::provider::{ObjectManagerProvider, ObjectRepositoryProvider};
use bundlebase_container::{Argument, ContainerBuilder, ContainerError, Definition};
use bundlebase_core::{EntityMapping, SharedManager, SharedRegistry, SharedRepository};

/// Id of the [`ObjectManagerProvider`] service.
pub const OBJECT_MANAGER_PROVIDER: &str = "base.object_manager_provider";
/// Id of the [`ObjectRepositoryProvider`] service.
pub const OBJECT_REPOSITORY_PROVIDER: &str = "base.object_repository_provider";
/// Id of the persistence layer's manager registry.
pub const MANAGER_REGISTRY: &str = "base.manager_registry";

/// Class label of [`ObjectManagerProvider`].
pub const OBJECT_MANAGER_PROVIDER_CLASS: &str = "bundlebase::orm::ObjectManagerProvider";
/// Class label of [`ObjectRepositoryProvider`].
pub const OBJECT_REPOSITORY_PROVIDER_CLASS: &str = "bundlebase::orm::ObjectRepositoryProvider";
/// Class label of [`ObjectDirector`].
pub const OBJECT_DIRECTOR_CLASS: &str = "bundlebase::orm::ObjectDirector";
/// Class label of generated object manager entries.
pub const OBJECT_MANAGER_CLASS: &str = "bundlebase::core::ObjectManager";
/// Class label of generated object repository entries.
pub const OBJECT_REPOSITORY_CLASS: &str = "bundlebase::core::ObjectRepository";

/// Factory method returning the manager of a class.
pub const GET_OBJECT_MANAGER: &str = "get_object_manager_by_entity_namespace";
/// Factory method returning the repository of a class.
pub const GET_OBJECT_REPOSITORY: &str = "get_object_repository_by_entity_namespace";
/// Call registering an [`EntityMapping`] with the manager registry.
pub const ADD_ENTITY_MAPPING: &str = "add_entity_mapping";

/// Defines the two provider services and registers every constructor and
/// method the generated entries rely on.
///
/// The manager registry itself (`base.manager_registry`) is left to the
/// persistence layer; it must be stored as a [`SharedRegistry`].
pub fn register_base_services(builder: &mut ContainerBuilder) {
    builder.set_definition(
        OBJECT_MANAGER_PROVIDER,
        Definition::new(OBJECT_MANAGER_PROVIDER_CLASS)
            .with_argument(Argument::reference(MANAGER_REGISTRY)),
    );
    builder.set_definition(
        OBJECT_REPOSITORY_PROVIDER,
        Definition::new(OBJECT_REPOSITORY_PROVIDER_CLASS)
            .with_argument(Argument::reference(OBJECT_MANAGER_PROVIDER)),
    );

    let catalog = builder.catalog_mut();
    catalog.register_constructor(OBJECT_MANAGER_PROVIDER_CLASS, |container, args| {
        let registry = args.service::<SharedRegistry>(0)?;
        Ok(ObjectManagerProvider::new(
            SharedRegistry::clone(&registry),
            container.parameters().clone(),
        ))
    });
    catalog.register_constructor(OBJECT_REPOSITORY_PROVIDER_CLASS, |_, args| {
        Ok(ObjectRepositoryProvider::new(
            args.service::<ObjectManagerProvider>(0)?,
        ))
    });
    catalog.register_constructor(OBJECT_DIRECTOR_CLASS, |_, args| {
        let manager = args.service::<SharedManager>(0)?;
        let repository = args.service::<SharedRepository>(1)?;
        Ok(ObjectDirector::new(
            SharedManager::clone(&manager),
            SharedRepository::clone(&repository),
        ))
    });

    catalog.register_method::<ObjectManagerProvider, SharedManager, _>(
        GET_OBJECT_MANAGER,
        |provider, args| Ok(provider.get_by_class(args.string(0)?)),
    );
    // A class without a manager has no repository: the lookup fails here
    // instead of yielding nothing.
    catalog.register_method::<ObjectRepositoryProvider, SharedRepository, _>(
        GET_OBJECT_REPOSITORY,
        |provider, args| {
            provider
                .get_by_class(args.string(0)?)
                .map(Some)
                .map_err(ContainerError::construction)
        },
    );
    catalog.register_call::<SharedRegistry, _>(ADD_ENTITY_MAPPING, |registry, args| {
        let mapping = EntityMapping {
            manager: args.string(0)?.to_owned(),
            class: args.string(1)?.to_owned(),
            mapping_file: args.string(2)?.to_owned(),
            enabled: args.bool(3)?,
        };
        registry
            .add_entity_mapping(mapping)
            .map_err(ContainerError::construction)
    });
}

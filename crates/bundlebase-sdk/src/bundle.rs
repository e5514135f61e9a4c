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

//! The bundle abstraction and the bundles shipped with the SDK.

use crate::extension::Extension;
use bundlebase_container::{CompilerPass, ContainerBuilder};
use bundlebase_core::MappingBagProvider;
use bundlebase_orm::register_base_services;
use std::sync::Arc;

/// A unit of functionality contributing services to the application
/// container.
///
/// The kernel calls [`build`](Bundle::build) on every bundle, dependencies
/// first, then loads each bundle's [`extension`](Bundle::extension), then
/// compiles the container.
///
/// A bundle returning a provider from
/// [`mapping_provider`](Bundle::mapping_provider) gets its entities wired by
/// the kernel: it implicitly depends on [`BaseBundle`] and
/// [`PersistenceBundle`], a `MappingCompilerPass` is queued after its
/// `build`, and a [`MappingExtension`](crate::MappingExtension) reads the
/// `mapping` key of its configuration section.
pub trait Bundle: Send + Sync {
    /// Unique name, also used to refer to the bundle in dependency lists.
    fn name(&self) -> &str;

    /// Registers services and compiler passes.
    ///
    /// The default implementation registers [`compiler_passes`](Bundle::compiler_passes).
    fn build(&self, container: &mut ContainerBuilder) {
        for pass in self.compiler_passes() {
            container.add_boxed_compiler_pass(pass);
        }
    }

    /// Compiler passes to run when the container is compiled.
    fn compiler_passes(&self) -> Vec<Box<dyn CompilerPass>> {
        Vec::new()
    }

    /// The configuration extension of this bundle, if any.
    fn extension(&self) -> Option<Box<dyn Extension>> {
        None
    }

    /// Names of the bundles that must be built before this one.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// The entity mappings this bundle declares, if any.
    fn mapping_provider(&self) -> Option<Arc<dyn MappingBagProvider>> {
        None
    }
}

/// Registers the object manager and repository providers, which sit on top
/// of the manager registry of [`PersistenceBundle`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseBundle;

impl BaseBundle {
    /// Name under which the bundle is registered.
    pub const NAME: &'static str = "BaseBundle";
}

impl Bundle for BaseBundle {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn build(&self, container: &mut ContainerBuilder) {
        register_base_services(container);
    }

    fn dependencies(&self) -> Vec<String> {
        vec![PersistenceBundle::NAME.to_owned()]
    }
}

/// Registers the in-memory manager registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersistenceBundle;

impl PersistenceBundle {
    /// Name under which the bundle is registered.
    pub const NAME: &'static str = "PersistenceBundle";
}

impl Bundle for PersistenceBundle {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn build(&self, container: &mut ContainerBuilder) {
        bundlebase_infra::register_persistence_services(container);
    }
}

/// A bundle whose only job is to declare entity mappings.
pub struct MappingBundle {
    name: String,
    provider: Arc<dyn MappingBagProvider>,
}

impl MappingBundle {
    /// Creates a bundle called `name` declaring the entities of `provider`.
    pub fn new(name: impl Into<String>, provider: impl MappingBagProvider + 'static) -> Self {
        Self::from_shared(name, Arc::new(provider))
    }

    /// Same as [`new`](Self::new) with an already shared provider.
    pub fn from_shared(name: impl Into<String>, provider: Arc<dyn MappingBagProvider>) -> Self {
        Self {
            name: name.into(),
            provider,
        }
    }
}

impl Bundle for MappingBundle {
    fn name(&self) -> &str {
        &self.name
    }

    fn mapping_provider(&self) -> Option<Arc<dyn MappingBagProvider>> {
        Some(self.provider.clone())
    }
}

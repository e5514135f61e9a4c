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

use bundlebase_container::{ContainerError, ContainerResult, ParameterBag};
use bundlebase_core::{SharedManager, SharedRegistry};

/// Resolves the object manager responsible for an entity class.
///
/// Lookups are delegated to the [`ManagerRegistry`] on every call; nothing is
/// cached here.
///
/// [`ManagerRegistry`]: bundlebase_core::ManagerRegistry
#[derive(Clone)]
pub struct ObjectManagerProvider {
    registry: SharedRegistry,
    parameters: ParameterBag,
}

impl ObjectManagerProvider {
    /// Creates a provider over `registry`, resolving parameter names against
    /// `parameters`.
    pub fn new(registry: SharedRegistry, parameters: ParameterBag) -> Self {
        Self {
            registry,
            parameters,
        }
    }

    /// Returns the manager for `class`, or `None` when no manager claims it.
    pub fn get_by_class(&self, class: &str) -> Option<SharedManager> {
        let manager = self.registry.manager_for_class(class);
        if manager.is_none() {
            log::debug!("ObjectManagerProvider: no manager claims '{}'", class);
        }
        manager
    }

    /// Returns the manager for the class stored in parameter `name`.
    pub fn get_by_parameter_name(&self, name: &str) -> ContainerResult<Option<SharedManager>> {
        let class = self.class_parameter(name)?;
        Ok(self.get_by_class(class))
    }

    /// Returns the class name stored in parameter `name`.
    pub fn class_parameter(&self, name: &str) -> ContainerResult<&str> {
        self.parameters
            .require(name)?
            .as_str()
            .ok_or_else(|| ContainerError::InvalidParameter {
                name: name.to_owned(),
                reason: "expected a class name".to_owned(),
            })
    }

    /// The registry lookups are delegated to.
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }
}

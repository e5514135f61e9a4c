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

use super::ObjectManagerProvider;
use crate::error::OrmResult;
use bundlebase_core::{PersistenceError, SharedRepository};
use std::sync::Arc;

/// Resolves the object repository of an entity class through its manager.
#[derive(Clone)]
pub struct ObjectRepositoryProvider {
    managers: Arc<ObjectManagerProvider>,
}

impl ObjectRepositoryProvider {
    /// Creates a provider on top of `managers`.
    pub fn new(managers: Arc<ObjectManagerProvider>) -> Self {
        Self { managers }
    }

    /// Returns the repository for `class`.
    ///
    /// A class no manager claims has no repository either: this fails with
    /// [`PersistenceError::NoManagerForClass`].
    pub fn get_by_class(&self, class: &str) -> Result<SharedRepository, PersistenceError> {
        let manager = self
            .managers
            .get_by_class(class)
            .ok_or_else(|| PersistenceError::NoManagerForClass(class.to_owned()))?;
        manager.repository(class)
    }

    /// Returns the repository for the class stored in parameter `name`.
    pub fn get_by_parameter_name(&self, name: &str) -> OrmResult<SharedRepository> {
        let class = self.managers.class_parameter(name)?;
        Ok(self.get_by_class(class)?)
    }

    /// The manager provider this provider delegates to.
    pub fn managers(&self) -> &Arc<ObjectManagerProvider> {
        &self.managers
    }
}

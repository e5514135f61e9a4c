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

use super::{MappingBagCollection, MappingOptions};

/// Capability of anything that can describe the entities it wants wired.
///
/// Bundles expose their provider as an optional field rather than being
/// type-checked for it, see `Bundle::mapping_provider` in `bundlebase-sdk`.
pub trait MappingBagProvider: Send + Sync {
    /// Builds the collection of mappings this provider declares.
    fn mapping_bag_collection(&self) -> MappingBagCollection;
}

/// Provider backed by a plain `alias -> class` table.
#[derive(Debug, Clone)]
pub struct StandardMappingBagProvider {
    entities: Vec<(String, String)>,
    bundle_namespace: String,
    component_namespace: String,
    container_prefix: String,
    options: MappingOptions,
}

impl StandardMappingBagProvider {
    /// Creates a provider with the default [`MappingOptions`].
    pub fn new<I, K, V>(
        entities: I,
        bundle_namespace: impl Into<String>,
        component_namespace: impl Into<String>,
        container_prefix: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entities: entities
                .into_iter()
                .map(|(name, class)| (name.into(), class.into()))
                .collect(),
            bundle_namespace: bundle_namespace.into(),
            component_namespace: component_namespace.into(),
            container_prefix: container_prefix.into(),
            options: MappingOptions::default(),
        }
    }

    /// Replaces the options used when building the collection.
    pub fn with_options(mut self, options: MappingOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the options used when building the collection.
    pub fn options(&self) -> &MappingOptions {
        &self.options
    }
}

impl MappingBagProvider for StandardMappingBagProvider {
    fn mapping_bag_collection(&self) -> MappingBagCollection {
        MappingBagCollection::create(
            self.entities.iter().map(|(name, class)| (name.as_str(), class.as_str())),
            &self.bundle_namespace,
            &self.component_namespace,
            &self.container_prefix,
            &self.options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_builds_a_fresh_collection_each_time() {
        let provider = StandardMappingBagProvider::new(
            [("user", "User")],
            "@TestMappingBundle",
            "app::entity",
            "my_prefix",
        )
        .with_options(MappingOptions::default().overwritable(true));

        let first = provider.mapping_bag_collection();
        let second = provider.mapping_bag_collection();

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert!(first.all()[0].is_overwritable());
        assert_eq!(first.all()[0].entity_namespace(), "app::entity::User");
    }
}

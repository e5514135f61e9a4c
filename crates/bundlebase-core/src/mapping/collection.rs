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

use super::MappingBag;

/// Defaults applied by [`MappingBagCollection::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingOptions {
    /// Manager every entity is assigned to.
    pub manager_name: String,
    /// Naming segment of the generated object manager entries.
    pub container_object_manager_name: String,
    /// Naming segment of the generated object repository entries.
    pub container_object_repository_name: String,
    /// Whether application configuration may override the mappings.
    pub is_overwritable: bool,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            manager_name: "default".to_string(),
            container_object_manager_name: "object_manager".to_string(),
            container_object_repository_name: "object_repository".to_string(),
            is_overwritable: false,
        }
    }
}

impl MappingOptions {
    /// Sets the manager name.
    pub fn with_manager_name(mut self, manager_name: impl Into<String>) -> Self {
        self.manager_name = manager_name.into();
        self
    }

    /// Sets both naming segments of the generated manager and repository entries.
    pub fn with_container_names(
        mut self,
        object_manager_name: impl Into<String>,
        object_repository_name: impl Into<String>,
    ) -> Self {
        self.container_object_manager_name = object_manager_name.into();
        self.container_object_repository_name = object_repository_name.into();
        self
    }

    /// Sets the overwritable flag.
    pub fn overwritable(mut self, is_overwritable: bool) -> Self {
        self.is_overwritable = is_overwritable;
        self
    }
}

/// Ordered set of mapping bags belonging to one bundle.
///
/// Entity names are not checked for uniqueness: two bags sharing a name both
/// stay in the collection, and the later one shadows the earlier one once
/// their container entries are generated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingBagCollection {
    mapping_bags: Vec<MappingBag>,
}

impl MappingBagCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a bag.
    pub fn add_mapping_bag(&mut self, mapping_bag: MappingBag) {
        self.mapping_bags.push(mapping_bag);
    }

    /// Returns all bags, in insertion order.
    pub fn all(&self) -> &[MappingBag] {
        &self.mapping_bags
    }

    /// Returns the number of bags.
    pub fn len(&self) -> usize {
        self.mapping_bags.len()
    }

    /// Returns `true` if the collection holds no bags.
    pub fn is_empty(&self) -> bool {
        self.mapping_bags.is_empty()
    }

    /// Expands an `alias -> class` table into fully formed bags.
    ///
    /// Mapping files follow `Resources/config/doctrine/{class}.orm.yml` and
    /// every entity starts enabled.
    pub fn create<I, K, V>(
        entities: I,
        bundle_namespace: &str,
        component_namespace: &str,
        container_prefix: &str,
        options: &MappingOptions,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut collection = Self::new();
        for (entity_name, entity_class) in entities {
            let entity_class = entity_class.into();
            let mapping_file = format!("Resources/config/doctrine/{entity_class}.orm.yml");
            collection.add_mapping_bag(MappingBag::new(
                bundle_namespace,
                component_namespace,
                entity_name,
                entity_class,
                mapping_file,
                options.manager_name.as_str(),
                true,
                options.container_object_manager_name.as_str(),
                options.container_object_repository_name.as_str(),
                container_prefix,
                options.is_overwritable,
            ));
        }

        collection
    }
}

impl<'a> IntoIterator for &'a MappingBagCollection {
    type Item = &'a MappingBag;
    type IntoIter = std::slice::Iter<'a, MappingBag>;

    fn into_iter(self) -> Self::IntoIter {
        self.mapping_bags.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_by_crude_data() {
        let collection = MappingBagCollection::create(
            [("cart", "Cart")],
            "@MyCartBundle",
            "::my_app::cart::entity",
            "my_app",
            &MappingOptions::default(),
        );

        let bag = &collection.all()[0];
        assert_eq!(bag.bundle_namespace(), "@MyCartBundle");
        assert_eq!(bag.component_namespace(), "::my_app::cart::entity");
        assert_eq!(bag.entity_name(), "cart");
        assert_eq!(bag.entity_class(), "Cart");
        assert_eq!(bag.entity_namespace(), "::my_app::cart::entity::Cart");
        assert_eq!(bag.entity_mapping_file(), "Resources/config/doctrine/Cart.orm.yml");
        assert_eq!(
            bag.entity_mapping_file_path(),
            "@MyCartBundle/Resources/config/doctrine/Cart.orm.yml"
        );
        assert_eq!(bag.manager_name(), "default");
        assert!(bag.entity_is_enabled());
        assert_eq!(bag.container_object_manager_name(), "object_manager");
        assert_eq!(bag.container_object_repository_name(), "object_repository");
        assert_eq!(bag.container_prefix(), "my_app");
        assert!(!bag.is_overwritable());
    }

    #[test]
    fn test_trailing_namespace_separator_is_normalized() {
        let collection = MappingBagCollection::create(
            [("cart", "Cart")],
            "@MyCartBundle",
            "::my_app::cart::entity::",
            "my_app",
            &MappingOptions::default(),
        );

        assert_eq!(collection.all()[0].entity_namespace(), "::my_app::cart::entity::Cart");
    }

    #[test]
    fn test_overwritable_collection_reduces_to_parameters() {
        let options = MappingOptions::default().overwritable(true);
        let collection = MappingBagCollection::create(
            [("cart", "Cart")],
            "@MyCartBundle",
            "my_app::cart::entity",
            "my_app",
            &options,
        );

        let reduced = collection.all()[0].reduced_mapping_bag();
        assert_eq!(reduced.entity_class().to_string(), "my_app.entity.cart.class");
        assert_eq!(
            reduced.entity_mapping_file().to_string(),
            "my_app.entity.cart.mapping_file"
        );
        assert_eq!(reduced.manager_name().to_string(), "my_app.entity.cart.manager");
        assert_eq!(reduced.entity_is_enabled().to_string(), "my_app.entity.cart.enabled");
    }

    #[test]
    fn test_preserves_order_and_keeps_duplicates() {
        let collection = MappingBagCollection::create(
            vec![("user", "User"), ("cart", "Cart"), ("user", "AnotherUser")],
            "@AppBundle",
            "app::entity",
            "",
            &MappingOptions::default(),
        );

        let names: Vec<_> = collection.all().iter().map(|bag| bag.entity_class()).collect();
        assert_eq!(names, vec!["User", "Cart", "AnotherUser"]);
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn test_options_are_applied_to_every_bag() {
        let options = MappingOptions::default()
            .with_manager_name("another_entity_manager")
            .with_container_names("manager", "repository");
        let collection = MappingBagCollection::create(
            [("user", "User")],
            "@TestMappingBundle",
            "app::entity",
            "another_prefix",
            &options,
        );

        let bag = &collection.all()[0];
        assert_eq!(bag.manager_name(), "another_entity_manager");
        assert_eq!(bag.object_manager_id(), "another_prefix.manager.user");
        assert_eq!(bag.object_repository_id(), "another_prefix.repository.user");
    }
}

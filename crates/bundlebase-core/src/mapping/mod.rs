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

//! Declarative entity mapping descriptors.
//!
//! A bundle describes each persistent entity it owns with a [`MappingBag`].
//! Bags are grouped per bundle in a [`MappingBagCollection`] and handed out by
//! a [`MappingBagProvider`]. They only exist while the container is being
//! compiled; nothing here survives into the running application.

mod collection;
mod provider;
mod reduced;

pub use collection::{MappingBagCollection, MappingOptions};
pub use provider::{MappingBagProvider, StandardMappingBagProvider};
pub use reduced::{MappingValue, ReducedMappingBag};

use crate::naming;

/// Field suffix of the entity class override parameter.
pub const FIELD_CLASS: &str = "class";
/// Field suffix of the mapping file override parameter.
pub const FIELD_MAPPING_FILE: &str = "mapping_file";
/// Field suffix of the manager name override parameter.
pub const FIELD_MANAGER: &str = "manager";
/// Field suffix of the enabled flag override parameter.
pub const FIELD_ENABLED: &str = "enabled";

/// Immutable descriptor of one entity mapping declared by a bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingBag {
    /// Where the mapping files live, either a `@Bundle` reference or a path root.
    bundle_namespace: String,
    /// Namespace under which the entity class lives.
    component_namespace: String,
    /// Short alias, unique within one provider's collection.
    entity_name: String,
    /// Class name relative to `component_namespace`.
    entity_class: String,
    /// Mapping file path relative to `bundle_namespace`.
    entity_mapping_file: String,
    manager_name: String,
    entity_is_enabled: bool,
    container_object_manager_name: String,
    container_object_repository_name: String,
    /// Prefix shared by every container key generated for this bag.
    container_prefix: String,
    is_overwritable: bool,
    reduced: ReducedMappingBag,
}

impl MappingBag {
    /// Creates a bag. The reduced view is computed once, here.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bundle_namespace: impl Into<String>,
        component_namespace: impl Into<String>,
        entity_name: impl Into<String>,
        entity_class: impl Into<String>,
        entity_mapping_file: impl Into<String>,
        manager_name: impl Into<String>,
        entity_is_enabled: bool,
        container_object_manager_name: impl Into<String>,
        container_object_repository_name: impl Into<String>,
        container_prefix: impl Into<String>,
        is_overwritable: bool,
    ) -> Self {
        let mut bag = Self {
            bundle_namespace: bundle_namespace.into(),
            component_namespace: component_namespace.into(),
            entity_name: entity_name.into(),
            entity_class: entity_class.into(),
            entity_mapping_file: entity_mapping_file.into(),
            manager_name: manager_name.into(),
            entity_is_enabled,
            container_object_manager_name: container_object_manager_name.into(),
            container_object_repository_name: container_object_repository_name.into(),
            container_prefix: container_prefix.into(),
            is_overwritable,
            reduced: ReducedMappingBag::default(),
        };
        bag.reduced = bag.create_reduced_mapping_bag();
        bag
    }

    /// Returns the bundle namespace.
    pub fn bundle_namespace(&self) -> &str {
        &self.bundle_namespace
    }

    /// Returns the component namespace.
    pub fn component_namespace(&self) -> &str {
        &self.component_namespace
    }

    /// Returns the entity alias.
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Returns the entity class, relative to the component namespace.
    pub fn entity_class(&self) -> &str {
        &self.entity_class
    }

    /// Returns the fully qualified entity class.
    ///
    /// Trailing separators of the namespace and leading separators of the
    /// class are collapsed into exactly one `::`.
    pub fn entity_namespace(&self) -> String {
        naming::join_class_path(&self.component_namespace, &self.entity_class)
    }

    /// Returns the mapping file, relative to the bundle namespace.
    pub fn entity_mapping_file(&self) -> &str {
        &self.entity_mapping_file
    }

    /// Returns the mapping file prefixed with the bundle namespace.
    pub fn entity_mapping_file_path(&self) -> String {
        naming::join_file_path(&self.bundle_namespace, &self.entity_mapping_file)
    }

    /// Returns the declared manager name.
    pub fn manager_name(&self) -> &str {
        &self.manager_name
    }

    /// Returns whether the mapping is enabled.
    pub fn entity_is_enabled(&self) -> bool {
        self.entity_is_enabled
    }

    /// Returns the naming segment of the generated object manager entry.
    pub fn container_object_manager_name(&self) -> &str {
        &self.container_object_manager_name
    }

    /// Returns the naming segment of the generated object repository entry.
    pub fn container_object_repository_name(&self) -> &str {
        &self.container_object_repository_name
    }

    /// Returns the container prefix.
    pub fn container_prefix(&self) -> &str {
        &self.container_prefix
    }

    /// Returns whether application configuration may override this mapping.
    pub fn is_overwritable(&self) -> bool {
        self.is_overwritable
    }

    /// Returns the reduced view computed at construction.
    pub fn reduced_mapping_bag(&self) -> &ReducedMappingBag {
        &self.reduced
    }

    /// Returns the override parameter name for `field`.
    pub fn param_format(&self, field: &str) -> String {
        naming::entity_parameter(&self.container_prefix, &self.entity_name, field)
    }

    /// Key of the generated object manager entry.
    pub fn object_manager_id(&self) -> String {
        naming::container_key(&[
            &self.container_prefix,
            &self.container_object_manager_name,
            &self.entity_name,
        ])
    }

    /// Key of the generated object repository entry.
    pub fn object_repository_id(&self) -> String {
        naming::container_key(&[
            &self.container_prefix,
            &self.container_object_repository_name,
            &self.entity_name,
        ])
    }

    /// Key of the generated director entry.
    pub fn object_director_id(&self) -> String {
        naming::container_key(&[
            &self.container_prefix,
            naming::OBJECT_DIRECTOR_SEGMENT,
            &self.entity_name,
        ])
    }

    fn create_reduced_mapping_bag(&self) -> ReducedMappingBag {
        if !self.is_overwritable {
            return ReducedMappingBag::new(
                MappingValue::Literal(self.entity_namespace()),
                MappingValue::Literal(self.entity_mapping_file_path()),
                MappingValue::Literal(self.manager_name.clone()),
                MappingValue::Literal(self.entity_is_enabled),
            );
        }

        ReducedMappingBag::new(
            MappingValue::parameter(self.param_format(FIELD_CLASS), self.entity_namespace()),
            MappingValue::parameter(
                self.param_format(FIELD_MAPPING_FILE),
                self.entity_mapping_file_path(),
            ),
            MappingValue::parameter(self.param_format(FIELD_MANAGER), self.manager_name.clone()),
            MappingValue::parameter(self.param_format(FIELD_ENABLED), self.entity_is_enabled),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart_bag(prefix: &str, is_overwritable: bool) -> MappingBag {
        MappingBag::new(
            "@MyCartBundle",
            "my_app::cart::entity",
            "cart",
            "Cart",
            "Resources/config/doctrine/Cart.orm.yml",
            "default",
            true,
            "object_manager",
            "object_repository",
            prefix,
            is_overwritable,
        )
    }

    #[test]
    fn test_accessors() {
        let bag = cart_bag("my_app", false);
        assert_eq!(bag.bundle_namespace(), "@MyCartBundle");
        assert_eq!(bag.component_namespace(), "my_app::cart::entity");
        assert_eq!(bag.entity_name(), "cart");
        assert_eq!(bag.entity_class(), "Cart");
        assert_eq!(bag.entity_namespace(), "my_app::cart::entity::Cart");
        assert_eq!(
            bag.entity_mapping_file_path(),
            "@MyCartBundle/Resources/config/doctrine/Cart.orm.yml"
        );
        assert_eq!(bag.manager_name(), "default");
        assert!(bag.entity_is_enabled());
        assert!(!bag.is_overwritable());
    }

    #[test]
    fn test_generated_ids() {
        let bag = cart_bag("my_app", false);
        assert_eq!(bag.object_manager_id(), "my_app.object_manager.cart");
        assert_eq!(bag.object_repository_id(), "my_app.object_repository.cart");
        assert_eq!(bag.object_director_id(), "my_app.object_director.cart");

        let unprefixed = cart_bag("", false);
        assert_eq!(unprefixed.object_manager_id(), "object_manager.cart");
        assert_eq!(unprefixed.object_director_id(), "object_director.cart");
        assert_eq!(unprefixed.param_format(FIELD_CLASS), "entity.cart.class");
    }

    #[test]
    fn test_reduced_bag_keeps_literals_when_not_overwritable() {
        let bag = cart_bag("my_app", false);
        let reduced = bag.reduced_mapping_bag();
        assert_eq!(
            reduced.entity_class(),
            &MappingValue::Literal("my_app::cart::entity::Cart".to_string())
        );
        assert_eq!(reduced.manager_name(), &MappingValue::Literal("default".to_string()));
        assert_eq!(reduced.entity_is_enabled(), &MappingValue::Literal(true));
    }

    #[test]
    fn test_reduced_bag_uses_parameters_when_overwritable() {
        let bag = cart_bag("my_app", true);
        let reduced = bag.reduced_mapping_bag();
        assert_eq!(reduced.entity_class().parameter_name(), Some("my_app.entity.cart.class"));
        assert_eq!(
            reduced.entity_mapping_file().parameter_name(),
            Some("my_app.entity.cart.mapping_file")
        );
        assert_eq!(reduced.manager_name().parameter_name(), Some("my_app.entity.cart.manager"));
        assert_eq!(
            reduced.entity_is_enabled().parameter_name(),
            Some("my_app.entity.cart.enabled")
        );
        assert_eq!(reduced.manager_name().fallback(), "default");
    }
}

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

//! Name-based bundle lookup.

use crate::bundle::{BaseBundle, Bundle, PersistenceBundle};
use std::collections::BTreeMap;

/// A link-time bundle registration.
///
/// ```ignore
/// fn create_blog_bundle() -> Box<dyn Bundle> {
///     Box::new(BlogBundle)
/// }
///
/// inventory::submit! {
///     BundleFactory { name: "BlogBundle", create: create_blog_bundle }
/// }
/// ```
pub struct BundleFactory {
    /// Name the bundle is resolved by.
    pub name: &'static str,
    /// Creates a fresh instance.
    pub create: fn() -> Box<dyn Bundle>,
}

inventory::collect!(BundleFactory);

fn create_base_bundle() -> Box<dyn Bundle> {
    Box::new(BaseBundle)
}

fn create_persistence_bundle() -> Box<dyn Bundle> {
    Box::new(PersistenceBundle)
}

/// Creates bundles from their names, used to resolve dependencies.
#[derive(Debug, Default, Clone)]
pub struct BundleRegistry {
    factories: BTreeMap<String, fn() -> Box<dyn Bundle>>,
}

impl BundleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry knowing [`BaseBundle`] and [`PersistenceBundle`].
    pub fn with_builtin_bundles() -> Self {
        let mut registry = Self::new();
        registry.register(BaseBundle::NAME, create_base_bundle);
        registry.register(PersistenceBundle::NAME, create_persistence_bundle);
        registry
    }

    /// The builtin bundles plus every [`BundleFactory`] submitted with
    /// `inventory::submit!`.
    pub fn with_inventory() -> Self {
        let mut registry = Self::with_builtin_bundles();
        let mut count = 0;
        for factory in inventory::iter::<BundleFactory> {
            registry.register(factory.name, factory.create);
            count += 1;
        }
        log::info!("Collected {} bundle factories from inventory", count);
        registry
    }

    /// Registers `create` under `name`, replacing any previous factory.
    pub fn register(&mut self, name: impl Into<String>, create: fn() -> Box<dyn Bundle>) {
        let name = name.into();
        if self.factories.insert(name.clone(), create).is_some() {
            log::warn!("Bundle factory '{}' registered twice; the last one wins", name);
        }
    }

    /// A new instance of bundle `name`, if registered.
    pub fn create(&self, name: &str) -> Option<Box<dyn Bundle>> {
        self.factories.get(name).map(|create| create())
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

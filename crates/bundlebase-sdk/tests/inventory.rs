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

//! Bundles registered at link time are found by name.

use bundlebase_container::ContainerBuilder;
use bundlebase_sdk::{Bundle, BundleFactory, BundleRegistry, Kernel, KernelConfig};

struct InventoryBundle;

impl Bundle for InventoryBundle {
    fn name(&self) -> &str {
        "InventoryBundle"
    }

    fn build(&self, container: &mut ContainerBuilder) {
        container.set_synthetic("inventory.marker", 42u32);
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["BaseBundle".to_owned()]
    }
}

fn create_inventory_bundle() -> Box<dyn Bundle> {
    Box::new(InventoryBundle)
}

inventory::submit! {
    BundleFactory { name: "InventoryBundle", create: create_inventory_bundle }
}

#[test]
fn test_submitted_bundles_are_collected() {
    let _ = env_logger::builder().is_test(true).try_init();

    let registry = BundleRegistry::with_inventory();
    assert!(registry.contains("InventoryBundle"));
    assert!(registry.contains("BaseBundle"));

    let kernel = Kernel::new(vec!["InventoryBundle".into()], KernelConfig::default())
        .boot()
        .unwrap();

    assert_eq!(kernel.bundle_names(), ["PersistenceBundle", "BaseBundle", "InventoryBundle"]);
    assert_eq!(
        *kernel.container().get::<u32>("inventory.marker").unwrap(),
        42
    );
    assert!(kernel.container().has("base.object_manager_provider"));
}

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

//! Booting kernels end to end over the in-memory backend.

use bundlebase_container::{ContainerBuilder, ContainerError, ParameterValue};
use bundlebase_core::{
    MappingBag, MappingBagCollection, MappingBagProvider, SharedManager, SharedRepository,
};
use bundlebase_sdk::prelude::*;
use bundlebase_sdk::{BootedKernel, BundleRegistry, KernelError};
use serde_json::{json, Value};
use std::any::Any;
use std::sync::{Arc, Mutex};

const USER_CLASS: &str = "App::Entity::User";

#[derive(Debug)]
struct User {
    id: u32,
    name: String,
}

impl User {
    fn shared(id: u32, name: &str) -> SharedEntity {
        Arc::new(User {
            id,
            name: name.to_owned(),
        })
    }
}

impl Entity for User {
    fn class_name(&self) -> &str {
        USER_CLASS
    }

    fn id(&self) -> EntityId {
        EntityId::from(self.id)
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(json!(self.id)),
            "name" => Some(json!(self.name)),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn user_provider(prefix: &str, options: MappingOptions) -> StandardMappingBagProvider {
    StandardMappingBagProvider::new([("user", "User")], "TestBundle", "App::Entity", prefix)
        .with_options(options)
}

fn boot(bundle: MappingBundle, config: Value) -> BootedKernel {
    init_logger();
    let config: KernelConfig = serde_json::from_value(config).unwrap();
    Kernel::new(vec![bundle.into()], config).boot().unwrap()
}

fn two_managers() -> Value {
    json!({ "parameters": { "persistence.managers": ["default", "alt"] } })
}

#[test]
fn test_non_overwritable_mapping_find_and_save() {
    // --- ARRANGE ---
    let kernel = boot(
        MappingBundle::new(
            "TestMappingBundle",
            user_provider("my_app", MappingOptions::default()),
        ),
        json!({}),
    );
    let accessor = kernel.accessor();

    // --- ACT ---
    let director = accessor
        .get::<ObjectDirector>("my_app.object_director.user")
        .unwrap();
    let before = director.find(1);
    director.save(User::shared(1, "alice")).unwrap();

    // --- ASSERT ---
    assert!(before.is_none());
    assert!(accessor.has("my_app.object_manager.user"));
    assert!(accessor.has("my_app.object_repository.user"));
    let found = accessor.find(USER_CLASS, 1).unwrap().unwrap();
    assert_eq!(found.downcast_ref::<User>().unwrap().name, "alice");
    assert!(!accessor.container().has_parameter("my_app.entity.user.class"));
    assert_eq!(
        kernel.bundle_names(),
        ["PersistenceBundle", "BaseBundle", "TestMappingBundle"]
    );
}

#[test]
fn test_overridden_manager_parameter_selects_manager() {
    let mut config = two_managers();
    config["parameters"]["my_app.entity.user.manager"] = json!("alt");
    let kernel = boot(
        MappingBundle::new(
            "TestMappingBundle",
            user_provider("my_app", MappingOptions::default().overwritable(true)),
        ),
        config,
    );

    let manager = kernel
        .accessor()
        .get::<SharedManager>("my_app.object_manager.user")
        .unwrap();
    assert_eq!(manager.name(), "alt");
    assert_eq!(
        kernel
            .container()
            .get_parameter("my_app.entity.user.manager")
            .unwrap(),
        &ParameterValue::from("alt")
    );

    let director = kernel
        .accessor()
        .get::<ObjectDirector>("my_app.object_director.user")
        .unwrap();
    director.save(User::shared(3, "carol")).unwrap();
    assert!(kernel.accessor().find("my_app:user", 3).unwrap().is_some());
}

#[test]
fn test_extension_config_overrides_mapping() {
    let mut config = two_managers();
    config["extensions"] = json!({
        "test_mapping": { "mapping": { "user": { "manager": "alt" } } }
    });
    let kernel = boot(
        MappingBundle::new(
            "TestMappingBundle",
            user_provider("my_app", MappingOptions::default().overwritable(true)),
        ),
        config,
    );

    assert_eq!(
        kernel
            .accessor()
            .object_manager("my_app:user")
            .unwrap()
            .name(),
        "alt"
    );
}

#[test]
fn test_invalid_extension_config_is_reported() {
    init_logger();
    let config: KernelConfig = serde_json::from_value(json!({
        "extensions": { "test_mapping": { "mapping": { "user": { "enabled": { "no": 1 } } } } }
    }))
    .unwrap();
    let bundle = MappingBundle::new(
        "TestMappingBundle",
        user_provider("my_app", MappingOptions::default().overwritable(true)),
    );

    let result = Kernel::new(vec![bundle.into()], config).boot();

    assert!(matches!(
        result,
        Err(KernelError::Extension { alias, .. }) if alias == "test_mapping"
    ));
}

#[test]
fn test_overwritable_mapping_registers_defaults() {
    let kernel = boot(
        MappingBundle::new(
            "TestMappingBundle",
            user_provider("my_app", MappingOptions::default().overwritable(true)),
        ),
        json!({}),
    );
    let container = kernel.container();

    assert_eq!(
        container.get_parameter("my_app.entity.user.class").unwrap(),
        &ParameterValue::from(USER_CLASS)
    );
    assert_eq!(
        container
            .get_parameter("my_app.entity.user.mapping_file")
            .unwrap(),
        &ParameterValue::from("TestBundle/Resources/config/doctrine/User.orm.yml")
    );
    assert_eq!(
        container.get_parameter("my_app.entity.user.manager").unwrap(),
        &ParameterValue::from("default")
    );
    assert_eq!(
        container.get_parameter("my_app.entity.user.enabled").unwrap(),
        &ParameterValue::from(true)
    );
    assert_eq!(kernel.accessor().locate("my_app:user"), USER_CLASS);
}

#[test]
fn test_custom_naming_segments() {
    let options = MappingOptions::default().with_container_names("manager", "repository");
    let kernel = boot(
        MappingBundle::new(
            "TestMappingBundle",
            user_provider("another_prefix", options),
        ),
        json!({}),
    );

    let accessor = kernel.accessor();
    assert!(accessor
        .get::<SharedManager>("another_prefix.manager.user")
        .is_ok());
    assert!(accessor
        .get::<SharedRepository>("another_prefix.repository.user")
        .is_ok());
    assert!(accessor
        .get::<ObjectDirector>("another_prefix.object_director.user")
        .is_ok());
}

/// Two bags sharing the entity name `user`, wired to different managers.
struct DuplicateUserProvider {
    bags: &'static [(&'static str, &'static str)],
}

impl MappingBagProvider for DuplicateUserProvider {
    fn mapping_bag_collection(&self) -> MappingBagCollection {
        let mut collection = MappingBagCollection::new();
        for &(class, manager) in self.bags {
            collection.add_mapping_bag(MappingBag::new(
                "TestBundle",
                "App::Entity",
                "user",
                class,
                format!("Resources/config/doctrine/{class}.orm.yml"),
                manager,
                true,
                "object_manager",
                "object_repository",
                "my_app",
                false,
            ));
        }
        collection
    }
}

#[test]
fn test_duplicate_entity_name_second_bag_wins() {
    let kernel = boot(
        MappingBundle::new(
            "TestMappingBundle",
            DuplicateUserProvider {
                bags: &[("User", "default"), ("Member", "alt")],
            },
        ),
        two_managers(),
    );
    let accessor = kernel.accessor();

    let manager = accessor
        .get::<SharedManager>("my_app.object_manager.user")
        .unwrap();
    let repository = accessor
        .get::<SharedRepository>("my_app.object_repository.user")
        .unwrap();

    assert_eq!(manager.name(), "alt");
    assert_eq!(repository.class_name(), "App::Entity::Member");
    // The first mapping is still declared to its own manager.
    assert_eq!(accessor.object_manager(USER_CLASS).unwrap().name(), "default");
}

#[test]
fn test_duplicate_entity_name_same_class_follows_second_manager() {
    // --- ARRANGE ---
    let kernel = boot(
        MappingBundle::new(
            "TestMappingBundle",
            DuplicateUserProvider {
                bags: &[("User", "default"), ("User", "alt")],
            },
        ),
        two_managers(),
    );
    let accessor = kernel.accessor();

    // --- ACT ---
    let manager = accessor
        .get::<SharedManager>("my_app.object_manager.user")
        .unwrap();
    let director = accessor
        .get::<ObjectDirector>("my_app.object_director.user")
        .unwrap();
    director.save(User::shared(5, "erin")).unwrap();

    // --- ASSERT ---
    assert_eq!(manager.name(), "alt");
    assert_eq!(director.manager().name(), "alt");
    assert_eq!(accessor.object_manager(USER_CLASS).unwrap().name(), "alt");
    assert!(accessor.find(USER_CLASS, 5).unwrap().is_some());
}

/// A hand-written bundle that declares its entities alongside its own
/// services.
struct CatalogBundle;

impl Bundle for CatalogBundle {
    fn name(&self) -> &str {
        "CatalogBundle"
    }

    fn build(&self, container: &mut ContainerBuilder) {
        container.set_parameter("catalog.title", "Users");
    }

    fn mapping_provider(&self) -> Option<Arc<dyn MappingBagProvider>> {
        Some(Arc::new(user_provider(
            "catalog",
            MappingOptions::default().overwritable(true),
        )))
    }
}

#[test]
fn test_custom_bundle_mapping_provider_is_wired() {
    // --- ARRANGE ---
    let mut config = two_managers();
    config["extensions"] = json!({
        "catalog": { "mapping": { "user": { "manager": "alt" } } }
    });

    // --- ACT ---
    let kernel = {
        init_logger();
        let config: KernelConfig = serde_json::from_value(config).unwrap();
        Kernel::new(vec![CatalogBundle.into()], config).boot().unwrap()
    };
    let accessor = kernel.accessor();

    // --- ASSERT ---
    assert_eq!(
        kernel.bundle_names(),
        ["PersistenceBundle", "BaseBundle", "CatalogBundle"]
    );
    assert_eq!(
        accessor.get_parameter("catalog.title").unwrap(),
        &ParameterValue::from("Users")
    );
    assert_eq!(accessor.locate("catalog:user"), USER_CLASS);
    let director = accessor
        .get::<ObjectDirector>("catalog.object_director.user")
        .unwrap();
    assert_eq!(director.manager().name(), "alt");
    director.save(User::shared(9, "gus")).unwrap();
    assert!(accessor.find("catalog:user", 9).unwrap().is_some());
}

/// A bundle with fixed dependencies and no services.
struct Stub {
    name: &'static str,
    dependencies: &'static [&'static str],
}

impl Bundle for Stub {
    fn name(&self) -> &str {
        self.name
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.iter().map(|d| d.to_string()).collect()
    }
}

fn create_alpha() -> Box<dyn Bundle> {
    Box::new(Stub {
        name: "Alpha",
        dependencies: &["Beta"],
    })
}

fn create_beta() -> Box<dyn Bundle> {
    Box::new(Stub {
        name: "Beta",
        dependencies: &[],
    })
}

fn create_looping_beta() -> Box<dyn Bundle> {
    Box::new(Stub {
        name: "Beta",
        dependencies: &["Alpha"],
    })
}

#[test]
fn test_dependencies_come_first_and_duplicates_are_dropped() {
    init_logger();
    // --- ARRANGE ---
    let mut registry = BundleRegistry::new();
    registry.register("Beta", create_beta);
    let sources: Vec<BundleSource> = vec![
        Stub {
            name: "Alpha",
            dependencies: &["Beta", "Gamma"],
        }
        .into(),
        Stub {
            name: "Gamma",
            dependencies: &["Beta"],
        }
        .into(),
        "Beta".into(),
        Stub {
            name: "Gamma",
            dependencies: &[],
        }
        .into(),
    ];

    // --- ACT ---
    let kernel = Kernel::new(sources, KernelConfig::default())
        .with_registry(registry)
        .boot()
        .unwrap();

    // --- ASSERT ---
    assert_eq!(kernel.bundle_names(), ["Beta", "Gamma", "Alpha"]);
}

#[test]
fn test_dependency_cycle_is_rejected() {
    init_logger();
    let mut registry = BundleRegistry::new();
    registry.register("Beta", create_looping_beta);

    let result = Kernel::new(vec![create_alpha().into()], KernelConfig::default())
        .with_registry(registry)
        .boot();

    assert!(matches!(
        result,
        Err(KernelError::CyclicDependency(names)) if names == ["Alpha", "Beta"]
    ));
}

#[test]
fn test_unknown_bundles_are_rejected() {
    init_logger();
    let result = Kernel::new(vec![create_alpha().into()], KernelConfig::default())
        .with_registry(BundleRegistry::new())
        .boot();
    assert!(matches!(
        result,
        Err(KernelError::UnknownBundle { name, required_by: Some(by) })
            if name == "Beta" && by == "Alpha"
    ));

    let result = Kernel::new(vec!["Ghost".into()], KernelConfig::default()).boot();
    assert!(matches!(
        result,
        Err(KernelError::UnknownBundle { name, required_by: None }) if name == "Ghost"
    ));
}

struct Clock {
    zone: String,
}

struct ClockBundle;

impl Bundle for ClockBundle {
    fn name(&self) -> &str {
        "ClockBundle"
    }

    fn build(&self, container: &mut ContainerBuilder) {
        container
            .catalog_mut()
            .register_constructor("test::Clock", |_, args| {
                Ok(Clock {
                    zone: args.string(0)?.to_owned(),
                })
            });
    }
}

#[test]
fn test_configured_services_and_aliases() {
    init_logger();
    let config = KernelConfig::from_json_str(
        r#"{
            "parameters": { "app.zone": "UTC" },
            "services": { "clock": { "class": "test::Clock", "arguments": ["%app.zone%"] } },
            "aliases": { "time": "clock" }
        }"#,
    )
    .unwrap();

    let kernel = Kernel::new(vec![ClockBundle.into()], config).boot().unwrap();

    let clock = kernel.accessor().get::<Clock>("time").unwrap();
    assert_eq!(clock.zone, "UTC");
    assert!(Arc::ptr_eq(
        &clock,
        &kernel.accessor().get::<Clock>("clock").unwrap()
    ));
}

#[test]
fn test_configured_service_without_constructor_fails_to_compile() {
    init_logger();
    let config: KernelConfig = serde_json::from_value(json!({
        "services": { "clock": { "class": "test::Clock" } }
    }))
    .unwrap();

    let result = Kernel::new(Vec::new(), config).boot();

    assert!(matches!(
        result,
        Err(KernelError::Container(ContainerError::MissingConstructor { .. }))
    ));
}

struct Recording {
    name: &'static str,
    order: i32,
    log: Arc<Mutex<Vec<&'static str>>>,
    fail: bool,
}

impl Fixture for Recording {
    fn name(&self) -> &str {
        self.name
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn load(&self, accessor: &ContainerAccessor) -> anyhow::Result<()> {
        self.log.lock().unwrap().push(self.name);
        if self.fail {
            anyhow::bail!("{} cannot load", self.name);
        }
        accessor.save([User::shared(self.order.unsigned_abs(), self.name)])?;
        Ok(())
    }
}

#[test]
fn test_fixtures_load_by_ascending_order() {
    let kernel = boot(
        MappingBundle::new(
            "TestMappingBundle",
            user_provider("my_app", MappingOptions::default()),
        ),
        json!({}),
    );
    let log = Arc::new(Mutex::new(Vec::new()));
    let fixture = |name: &'static str, order: i32, fail: bool| -> Box<dyn Fixture> {
        Box::new(Recording {
            name,
            order,
            log: log.clone(),
            fail,
        })
    };

    kernel
        .load_fixtures(vec![
            fixture("late", 20, false),
            fixture("early", 10, false),
            fixture("also_late", 20, false),
        ])
        .unwrap();

    assert_eq!(*log.lock().unwrap(), ["early", "late", "also_late"]);
    assert_eq!(kernel.accessor().find_all(USER_CLASS).unwrap().len(), 2);

    let result = kernel.load_fixtures(vec![fixture("broken", 1, true)]);
    assert!(matches!(
        result,
        Err(KernelError::Fixture { name, .. }) if name == "broken"
    ));
}

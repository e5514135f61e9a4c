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

//! Integration tests for building and compiling containers.

use bundlebase_container::{
    Argument, CompilerPass, ContainerBuilder, ContainerError, ContainerResult, Definition,
    ParameterValue, TagCompilerPass,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

struct Greeter {
    greeting: String,
}

struct Registry {
    names: Mutex<Vec<String>>,
}

struct Plugin {
    name: String,
}

struct Node;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn catalogued_builder() -> ContainerBuilder {
    let mut builder = ContainerBuilder::new();
    let catalog = builder.catalog_mut();
    catalog.register_constructor("app::Greeter", |_, args| {
        Ok(Greeter {
            greeting: args.string(0)?.to_owned(),
        })
    });
    catalog.register_constructor("app::Registry", |_, _| {
        Ok(Registry {
            names: Mutex::new(Vec::new()),
        })
    });
    catalog.register_constructor("app::Plugin", |_, args| {
        Ok(Plugin {
            name: args.string(0)?.to_owned(),
        })
    });
    catalog.register_constructor("app::Node", |_, args| {
        let _next = args.service::<Node>(0)?;
        Ok(Node)
    });
    catalog.register_call::<Registry, _>("add", |registry, args| {
        let plugin = args.service::<Plugin>(0)?;
        registry
            .names
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(plugin.name.clone());
        Ok(())
    });
    catalog.register_method::<Registry, Plugin, _>("first", |registry, _| {
        let names = registry
            .names
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(names.first().map(|name| Plugin { name: name.clone() }))
    });
    builder
}

#[test]
fn test_shared_services_are_built_once() {
    init_logger();
    // --- ARRANGE ---
    let mut builder = catalogued_builder();
    builder.set_parameter("app.name", "world");
    builder.set_parameter("app.greeting", "hello %app.name%");
    builder.set_definition(
        "greeter",
        Definition::new("app::Greeter").with_argument(Argument::parameter("app.greeting")),
    );
    builder.set_alias("greeter.alias", "greeter");

    // --- ACT ---
    let container = builder.compile().unwrap();
    let first = container.get::<Greeter>("greeter").unwrap();
    let second = container.get::<Greeter>("greeter.alias").unwrap();

    // --- ASSERT ---
    assert_eq!(first.greeting, "hello world");
    assert!(Arc::ptr_eq(&first, &second));
    assert!(container.has("greeter.alias"));
    assert!(!container.has("nope"));
}

#[test]
fn test_tagged_services_are_injected_by_priority() {
    init_logger();
    let mut builder = catalogued_builder();
    builder.set_definition("registry", Definition::new("app::Registry"));
    for (id, priority) in [("c1", Some(-3)), ("c2", Some(10)), ("c3", None)] {
        builder.set_definition(
            id,
            Definition::new("app::Plugin")
                .with_argument(Argument::value(id))
                .with_tag("plugin", priority),
        );
    }
    builder.add_compiler_pass(TagCompilerPass::new("registry", "add", "plugin"));

    let container = builder.compile().unwrap();
    let registry = container.get::<Registry>("registry").unwrap();

    let names = registry.names.lock().unwrap().clone();
    assert_eq!(names, vec!["c2", "c3", "c1"]);
}

#[test]
fn test_factory_method_may_produce_nothing() {
    init_logger();
    let mut builder = catalogued_builder();
    builder.set_definition("registry", Definition::new("app::Registry"));
    builder.set_definition(
        "first_plugin",
        Definition::new("app::Plugin").with_factory("registry", "first"),
    );

    let container = builder.compile().unwrap();

    assert!(container
        .get_nullable::<Plugin>("first_plugin")
        .unwrap()
        .is_none());
    assert!(matches!(
        container.get::<Plugin>("first_plugin"),
        Err(ContainerError::NullService(id)) if id == "first_plugin"
    ));
}

#[test]
fn test_type_mismatch_is_reported() {
    let mut builder = catalogued_builder();
    builder.set_definition("registry", Definition::new("app::Registry"));
    let container = builder.compile().unwrap();

    assert!(matches!(
        container.get::<Greeter>("registry"),
        Err(ContainerError::TypeMismatch { .. })
    ));
}

#[test]
fn test_circular_construction_is_detected() {
    let mut builder = catalogued_builder();
    builder.set_definition(
        "a",
        Definition::new("app::Node").with_argument(Argument::reference("b")),
    );
    builder.set_definition(
        "b",
        Definition::new("app::Node").with_argument(Argument::reference("a")),
    );
    let container = builder.compile().unwrap();

    let err = container.get::<Node>("a").err().unwrap();
    assert!(matches!(err, ContainerError::CircularReference(path) if path == ["a", "b", "a"]));
}

#[test]
fn test_compile_rejects_unknown_references() {
    let mut builder = catalogued_builder();
    builder.set_definition(
        "a",
        Definition::new("app::Node").with_argument(Argument::reference("ghost")),
    );

    let err = builder.compile().unwrap_err();
    assert!(matches!(
        err,
        ContainerError::ServiceNotFound { id, referrer: Some(referrer) }
            if id == "ghost" && referrer == "a"
    ));
}

#[test]
fn test_compile_rejects_unknown_classes() {
    let mut builder = catalogued_builder();
    builder.set_definition("x", Definition::new("app::Unknown"));

    assert!(matches!(
        builder.compile(),
        Err(ContainerError::MissingConstructor { .. })
    ));
}

#[test]
fn test_synthetic_services_and_value_placeholders() {
    let mut builder = catalogued_builder();
    builder.set_synthetic("preset", Plugin { name: "preset".into() });
    builder.set_parameter("app.suffix", "!");
    builder.set_definition(
        "greeter",
        Definition::new("app::Greeter").with_argument(Argument::value("hi%app.suffix%")),
    );

    let container = builder.compile().unwrap();

    assert_eq!(container.get::<Plugin>("preset").unwrap().name, "preset");
    assert_eq!(container.get::<Greeter>("greeter").unwrap().greeting, "hi!");
    assert_eq!(
        container.get_parameter("app.suffix").unwrap(),
        &ParameterValue::from("!")
    );
}

struct Slow;

#[test]
fn test_shared_service_is_built_once_across_threads() {
    init_logger();
    // --- ARRANGE ---
    let builds = Arc::new(AtomicUsize::new(0));
    let mut builder = ContainerBuilder::new();
    let counter = builds.clone();
    builder
        .catalog_mut()
        .register_constructor("app::Slow", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(50));
            Ok(Slow)
        });
    builder.set_definition("slow", Definition::new("app::Slow"));
    let container = builder.compile().unwrap();
    let barrier = Barrier::new(2);

    // --- ACT ---
    let (first, second) = thread::scope(|scope| {
        let lookup = || {
            barrier.wait();
            container.get::<Slow>("slow").unwrap()
        };
        let first = scope.spawn(lookup);
        let second = scope.spawn(lookup);
        (first.join().unwrap(), second.join().unwrap())
    });

    // --- ASSERT ---
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(builds.load(Ordering::SeqCst), 1);
}

/// Queues [`Appending`] while running.
struct Seeding;

impl CompilerPass for Seeding {
    fn process(&self, container: &mut ContainerBuilder) -> ContainerResult<()> {
        container.set_parameter("app.order", "first");
        container.add_compiler_pass(Appending);
        Ok(())
    }
}

struct Appending;

impl CompilerPass for Appending {
    fn process(&self, container: &mut ContainerBuilder) -> ContainerResult<()> {
        let order = container
            .parameter("app.order")
            .and_then(ParameterValue::as_str)
            .unwrap_or_default()
            .to_owned();
        container.set_parameter("app.order", format!("{order},second"));
        Ok(())
    }
}

/// Records what `app.order` held when it ran.
struct Snapshot;

impl CompilerPass for Snapshot {
    fn process(&self, container: &mut ContainerBuilder) -> ContainerResult<()> {
        let seen = container.parameter("app.order").cloned().unwrap_or(ParameterValue::Null);
        container.set_parameter("app.snapshot", seen);
        Ok(())
    }
}

#[test]
fn test_passes_queued_by_passes_run_last() {
    init_logger();
    let mut builder = ContainerBuilder::new();
    builder.add_compiler_pass(Seeding);
    builder.add_compiler_pass(Snapshot);

    let container = builder.compile().unwrap();

    assert_eq!(
        container.get_parameter("app.order").unwrap(),
        &ParameterValue::from("first,second")
    );
    assert_eq!(
        container.get_parameter("app.snapshot").unwrap(),
        &ParameterValue::from("first")
    );
}

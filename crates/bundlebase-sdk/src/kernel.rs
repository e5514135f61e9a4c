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

//! Bundle ordering and container assembly.

use crate::bundle::{BaseBundle, Bundle, PersistenceBundle};
use crate::config::KernelConfig;
use crate::error::KernelError;
use crate::extension::{extension_alias, Extension, MappingExtension};
use crate::fixture::Fixture;
use crate::registry::BundleRegistry;
use bundlebase_container::{Container, ContainerBuilder};
use bundlebase_core::graph::topological_sort;
use bundlebase_orm::{ContainerAccessor, MappingCompilerPass};
use std::collections::HashMap;
use std::sync::Arc;

/// A bundle given to the [`Kernel`], either ready-made or by registry name.
pub enum BundleSource {
    /// A bundle built by the caller.
    Instance(Box<dyn Bundle>),
    /// A bundle created through the kernel's [`BundleRegistry`].
    Named(String),
}

impl<B: Bundle + 'static> From<B> for BundleSource {
    fn from(bundle: B) -> Self {
        BundleSource::Instance(Box::new(bundle))
    }
}

impl From<Box<dyn Bundle>> for BundleSource {
    fn from(bundle: Box<dyn Bundle>) -> Self {
        BundleSource::Instance(bundle)
    }
}

impl From<&str> for BundleSource {
    fn from(name: &str) -> Self {
        BundleSource::Named(name.to_owned())
    }
}

impl From<String> for BundleSource {
    fn from(name: String) -> Self {
        BundleSource::Named(name)
    }
}

/// Assembles bundles and configuration into a compiled container.
pub struct Kernel {
    sources: Vec<BundleSource>,
    config: KernelConfig,
    registry: BundleRegistry,
}

impl Kernel {
    /// Creates a kernel resolving bundle names through
    /// [`BundleRegistry::with_inventory`].
    pub fn new(sources: Vec<BundleSource>, config: KernelConfig) -> Self {
        Self {
            sources,
            config,
            registry: BundleRegistry::with_inventory(),
        }
    }

    /// Resolves bundle names through `registry` instead.
    pub fn with_registry(mut self, registry: BundleRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Builds and compiles the container.
    ///
    /// 1. Named sources are created through the registry.
    /// 2. Dependencies are added transitively; the first bundle with a given
    ///    name wins.
    /// 3. Bundles are ordered so that dependencies come first.
    /// 4. Configuration parameters, services and aliases are applied.
    /// 5. Every bundle is built, then every extension loaded. Bundles with a
    ///    mapping provider also get a `MappingCompilerPass` and a
    ///    [`MappingExtension`].
    /// 6. The container is compiled.
    pub fn boot(self) -> Result<BootedKernel, KernelError> {
        let Kernel {
            sources,
            config,
            registry,
        } = self;
        log::info!("Booting kernel with {} bundle(s)...", sources.len());
        let bundles = ordered_bundles(sources, &registry)?;

        let mut builder = ContainerBuilder::new();
        config.apply(&mut builder);

        for bundle in &bundles {
            log::info!("Building bundle '{}'", bundle.name());
            bundle.build(&mut builder);
            if let Some(provider) = bundle.mapping_provider() {
                log::debug!("Wiring the mappings of bundle '{}'", bundle.name());
                builder.add_compiler_pass(MappingCompilerPass::new(provider));
            }
        }

        for bundle in &bundles {
            for extension in extensions_of(bundle.as_ref()) {
                let alias = extension.alias().to_owned();
                log::debug!("Loading extension '{}' of bundle '{}'", alias, bundle.name());
                extension
                    .load(config.extension(&alias), &mut builder)
                    .map_err(|source| KernelError::Extension { alias, source })?;
            }
        }

        let container = Arc::new(builder.compile()?);
        let bundle_names: Vec<String> = bundles.iter().map(|b| b.name().to_owned()).collect();
        log::info!("Kernel booted: [{}]", bundle_names.join(", "));

        Ok(BootedKernel {
            accessor: ContainerAccessor::new(container.clone()),
            container,
            bundle_names,
        })
    }
}

/// The bundle's own extension followed by the mapping extension of its
/// provider, if any.
fn extensions_of(bundle: &dyn Bundle) -> Vec<Box<dyn Extension>> {
    let mut extensions: Vec<Box<dyn Extension>> = bundle.extension().into_iter().collect();
    if let Some(provider) = bundle.mapping_provider() {
        extensions.push(Box::new(MappingExtension::new(
            extension_alias(bundle.name()),
            provider,
        )));
    }
    extensions
}

/// Declared dependencies, plus the base and persistence bundles for bundles
/// declaring mappings.
fn dependencies_of(bundle: &dyn Bundle) -> Vec<String> {
    let mut dependencies = bundle.dependencies();
    if bundle.mapping_provider().is_some() {
        for required in [BaseBundle::NAME, PersistenceBundle::NAME] {
            if !dependencies.iter().any(|dependency| dependency == required) {
                dependencies.push(required.to_owned());
            }
        }
    }
    dependencies
}

/// Resolves sources and their dependencies, dedupes them by name and sorts
/// them so that every bundle comes after its dependencies.
fn ordered_bundles(
    sources: Vec<BundleSource>,
    registry: &BundleRegistry,
) -> Result<Vec<Box<dyn Bundle>>, KernelError> {
    let mut bundles: Vec<Box<dyn Bundle>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for source in sources {
        let bundle = match source {
            BundleSource::Instance(bundle) => bundle,
            BundleSource::Named(name) => create(registry, &name, None)?,
        };
        push_unique(&mut bundles, &mut index, bundle);
    }

    // `bundles` grows while it is walked: dependencies of dependencies are
    // visited too.
    let mut edges = Vec::new();
    let mut cursor = 0;
    while cursor < bundles.len() {
        for dependency in dependencies_of(bundles[cursor].as_ref()) {
            let position = match index.get(&dependency) {
                Some(&position) => position,
                None => {
                    let bundle = create(registry, &dependency, Some(bundles[cursor].name()))?;
                    push_unique(&mut bundles, &mut index, bundle)
                }
            };
            edges.push((position, cursor));
        }
        cursor += 1;
    }

    let order = topological_sort(0..bundles.len(), edges).map_err(|cycle| {
        KernelError::CyclicDependency(
            cycle
                .unresolved
                .iter()
                .map(|&i| bundles[i].name().to_owned())
                .collect(),
        )
    })?;

    let mut slots: Vec<Option<Box<dyn Bundle>>> = bundles.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

fn create(
    registry: &BundleRegistry,
    name: &str,
    required_by: Option<&str>,
) -> Result<Box<dyn Bundle>, KernelError> {
    registry
        .create(name)
        .ok_or_else(|| KernelError::UnknownBundle {
            name: name.to_owned(),
            required_by: required_by.map(str::to_owned),
        })
}

/// Appends `bundle` unless one with the same name is already known, and
/// returns the position of the bundle holding that name.
fn push_unique(
    bundles: &mut Vec<Box<dyn Bundle>>,
    index: &mut HashMap<String, usize>,
    bundle: Box<dyn Bundle>,
) -> usize {
    let name = bundle.name().to_owned();
    if let Some(&position) = index.get(&name) {
        log::debug!("Bundle '{}' already registered, skipping duplicate", name);
        return position;
    }
    bundles.push(bundle);
    index.insert(name, bundles.len() - 1);
    bundles.len() - 1
}

/// A kernel whose container is compiled.
pub struct BootedKernel {
    container: Arc<Container>,
    accessor: ContainerAccessor,
    bundle_names: Vec<String>,
}

impl BootedKernel {
    /// The compiled container.
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// An accessor over [`container`](Self::container).
    pub fn accessor(&self) -> &ContainerAccessor {
        &self.accessor
    }

    /// Bundle names in build order.
    pub fn bundle_names(&self) -> &[String] {
        &self.bundle_names
    }

    /// Runs `fixtures` by ascending order, stopping at the first failure.
    pub fn load_fixtures(&self, mut fixtures: Vec<Box<dyn Fixture>>) -> Result<(), KernelError> {
        fixtures.sort_by_key(|fixture| fixture.order());
        for fixture in &fixtures {
            log::info!("Loading fixture '{}' (order {})", fixture.name(), fixture.order());
            fixture
                .load(&self.accessor)
                .map_err(|err| KernelError::Fixture {
                    name: fixture.name().to_owned(),
                    source: err.into(),
                })?;
        }
        Ok(())
    }
}

impl Drop for BootedKernel {
    fn drop(&mut self) {
        log::info!("Shutting down kernel [{}]", self.bundle_names.join(", "));
    }
}

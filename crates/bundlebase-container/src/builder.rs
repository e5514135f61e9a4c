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

//! The mutable, build-time view of a container.

use crate::catalog::{Service, ServiceCatalog};
use crate::compiler::CompilerPass;
use crate::container::Container;
use crate::definition::{Argument, Definition, Factory, Tag};
use crate::error::{ContainerError, ContainerResult};
use crate::parameter::{ParameterBag, ParameterValue};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Collects definitions, aliases and parameters, then compiles them into a
/// [`Container`].
///
/// Definitions keep their first registration order, which is also the order
/// [`find_tagged_service_ids`](Self::find_tagged_service_ids) reports them in.
#[derive(Default)]
pub struct ContainerBuilder {
    definitions: HashMap<String, Definition>,
    order: Vec<String>,
    aliases: HashMap<String, String>,
    parameters: ParameterBag,
    synthetic: HashMap<String, Service>,
    passes: Vec<Box<dyn CompilerPass>>,
    catalog: ServiceCatalog,
}

impl ContainerBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition, replacing any previous one with the same id.
    pub fn set_definition(&mut self, id: impl Into<String>, definition: Definition) {
        let id = id.into();
        self.aliases.remove(&id);
        if self.definitions.insert(id.clone(), definition).is_none() {
            self.order.push(id);
        }
    }

    /// Returns the definition registered under `id`.
    pub fn definition(&self, id: &str) -> Option<&Definition> {
        self.definitions.get(id)
    }

    /// Returns the definition registered under `id` for modification.
    pub fn definition_mut(&mut self, id: &str) -> Option<&mut Definition> {
        self.definitions.get_mut(id)
    }

    /// Returns the definition for `id`, following aliases.
    pub fn find_definition_mut(&mut self, id: &str) -> Option<&mut Definition> {
        let target = self.resolve_alias(id).to_owned();
        self.definitions.get_mut(&target)
    }

    /// Returns `true` if a definition is registered under `id`.
    pub fn has_definition(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    /// Returns `true` if `id` is a definition, an alias or a synthetic service.
    pub fn has(&self, id: &str) -> bool {
        let target = self.resolve_alias(id);
        self.definitions.contains_key(target) || self.synthetic.contains_key(target)
    }

    /// Removes a definition.
    pub fn remove_definition(&mut self, id: &str) -> Option<Definition> {
        let removed = self.definitions.remove(id);
        if removed.is_some() {
            self.order.retain(|known| known != id);
        }
        removed
    }

    /// Makes `alias` resolve to `target`.
    pub fn set_alias(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.aliases.insert(alias.into(), target.into());
    }

    /// Sets a parameter. Placeholders are resolved at compile time.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.parameters.set(name, value);
    }

    /// Returns `true` if the parameter is registered.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.has(name)
    }

    /// Returns the current, possibly unresolved, value of a parameter.
    pub fn parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }

    /// All parameters registered so far.
    pub fn parameters(&self) -> &ParameterBag {
        &self.parameters
    }

    /// Registers an instance built outside the container.
    pub fn set_synthetic<T: Send + Sync + 'static>(&mut self, id: impl Into<String>, instance: T) {
        self.synthetic.insert(id.into(), Arc::new(instance));
    }

    /// Returns every definition carrying `tag`, in registration order, with
    /// the matching tags.
    pub fn find_tagged_service_ids(&self, tag: &str) -> Vec<(String, Vec<Tag>)> {
        self.order
            .iter()
            .filter_map(|id| {
                let definition = self.definitions.get(id)?;
                let tags: Vec<Tag> = definition.tags_named(tag).cloned().collect();
                (!tags.is_empty()).then(|| (id.clone(), tags))
            })
            .collect()
    }

    /// Queues a pass to run at compile time, after the ones already queued.
    pub fn add_compiler_pass(&mut self, pass: impl CompilerPass + 'static) {
        self.add_boxed_compiler_pass(Box::new(pass));
    }

    /// Queues an already boxed pass.
    pub fn add_boxed_compiler_pass(&mut self, pass: Box<dyn CompilerPass>) {
        self.passes.push(pass);
    }

    /// The catalog used to build services.
    pub fn catalog_mut(&mut self) -> &mut ServiceCatalog {
        &mut self.catalog
    }

    /// Ids of all definitions in registration order.
    pub fn definition_ids(&self) -> &[String] {
        &self.order
    }

    /// Runs the compiler passes, resolves parameters and validates the result.
    ///
    /// Passes queued by a running pass run after every pass queued before
    /// them.
    pub fn compile(mut self) -> ContainerResult<Container> {
        let mut ran = 0;
        while !self.passes.is_empty() {
            let passes = std::mem::take(&mut self.passes);
            for pass in &passes {
                log::debug!("Running compiler pass '{}'", pass.name());
                pass.process(&mut self)?;
                ran += 1;
            }
        }

        self.parameters.resolve_all()?;
        for definition in self.definitions.values_mut() {
            for value in definition.values_mut() {
                *value = self.parameters.resolve_value(value)?;
            }
        }

        self.validate()?;

        log::info!(
            "Container compiled: {} definitions, {} aliases, {} parameters, {} passes",
            self.definitions.len(),
            self.aliases.len(),
            self.parameters.len(),
            ran
        );

        Ok(Container::new(
            self.definitions,
            self.aliases,
            self.parameters,
            self.catalog,
            self.synthetic,
        ))
    }

    fn validate(&self) -> ContainerResult<()> {
        for alias in self.aliases.keys() {
            let mut seen = HashSet::new();
            let mut current = alias.as_str();
            while let Some(target) = self.aliases.get(current) {
                if !seen.insert(current) {
                    return Err(ContainerError::CircularReference(
                        seen.into_iter().map(str::to_owned).collect(),
                    ));
                }
                current = target;
            }
            if !self.has(current) {
                return Err(ContainerError::ServiceNotFound {
                    id: current.to_owned(),
                    referrer: Some(alias.clone()),
                });
            }
        }

        for id in &self.order {
            let Some(definition) = self.definitions.get(id) else {
                continue;
            };
            if let Some(missing) = definition.references().find(|reference| !self.has(reference)) {
                return Err(ContainerError::ServiceNotFound {
                    id: missing.to_owned(),
                    referrer: Some(id.clone()),
                });
            }
            let arguments = definition.arguments().iter().chain(
                definition
                    .method_calls()
                    .iter()
                    .flat_map(|call| call.arguments.iter()),
            );
            for argument in arguments {
                if let Argument::Parameter(name) = argument {
                    self.parameters.require(name)?;
                }
            }
            if matches!(definition.factory(), Factory::Constructor)
                && !self.catalog.has_constructor(definition.class())
            {
                return Err(ContainerError::MissingConstructor {
                    id: id.clone(),
                    class: definition.class().to_owned(),
                });
            }
        }
        Ok(())
    }

    fn resolve_alias<'a>(&'a self, id: &'a str) -> &'a str {
        let mut current = id;
        let mut hops = 0;
        while let Some(target) = self.aliases.get(current) {
            hops += 1;
            if hops > self.aliases.len() {
                break;
            }
            current = target;
        }
        current
    }
}

impl fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("definitions", &self.order)
            .field("aliases", &self.aliases)
            .field("parameters", &self.parameters)
            .field("passes", &self.passes.len())
            .field("catalog", &self.catalog)
            .finish()
    }
}

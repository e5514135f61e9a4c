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

//! The compiled, immutable runtime container.

use crate::catalog::{Arguments, Resolved, Service, ServiceCatalog};
use crate::definition::{Argument, Definition, Factory};
use crate::error::{ContainerError, ContainerResult};
use crate::parameter::{ParameterBag, ParameterValue};
use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread::{self, ThreadId};

/// The cached outcome of a shared service, `None` when its factory produced
/// nothing.
#[derive(Default)]
struct Slot {
    value: OnceLock<Option<Service>>,
    init: Mutex<()>,
}

/// A compiled container.
///
/// Definitions and parameters are frozen. Shared services are built on first
/// lookup and cached; non-shared services are built on every lookup.
pub struct Container {
    definitions: HashMap<String, Definition>,
    aliases: HashMap<String, String>,
    parameters: ParameterBag,
    catalog: ServiceCatalog,
    instances: Mutex<HashMap<String, Arc<Slot>>>,
    loading: Mutex<HashMap<ThreadId, Vec<String>>>,
}

impl Container {
    pub(crate) fn new(
        definitions: HashMap<String, Definition>,
        aliases: HashMap<String, String>,
        parameters: ParameterBag,
        catalog: ServiceCatalog,
        synthetic: HashMap<String, Service>,
    ) -> Self {
        let instances = synthetic
            .into_iter()
            .map(|(id, service)| {
                let slot = Slot {
                    value: OnceLock::from(Some(service)),
                    init: Mutex::new(()),
                };
                (id, Arc::new(slot))
            })
            .collect();
        Self {
            definitions,
            aliases,
            parameters,
            catalog,
            instances: Mutex::new(instances),
            loading: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the service `id` as a `T`.
    ///
    /// Fails with [`ContainerError::NullService`] when its factory produced
    /// nothing.
    pub fn get<T: Send + Sync + 'static>(&self, id: &str) -> ContainerResult<Arc<T>> {
        self.get_nullable::<T>(id)?
            .ok_or_else(|| ContainerError::NullService(id.to_owned()))
    }

    /// Returns the service `id` as a `T`, or `None` when its factory produced
    /// nothing.
    pub fn get_nullable<T: Send + Sync + 'static>(&self, id: &str) -> ContainerResult<Option<Arc<T>>> {
        match self.service(id)? {
            Some(service) => service
                .downcast::<T>()
                .map(Some)
                .map_err(|_| ContainerError::TypeMismatch {
                    id: id.to_owned(),
                    expected: type_name::<T>(),
                }),
            None => Ok(None),
        }
    }

    /// Returns the type-erased service `id`.
    ///
    /// A shared service is built at most once, even when several threads ask
    /// for it at the same time: the first one builds it while the others wait
    /// on its slot.
    pub fn service(&self, id: &str) -> ContainerResult<Option<Service>> {
        let id = self.resolve_alias(id);
        let slot = self.lock_instances().get(id).cloned();
        if let Some(cached) = slot.as_ref().and_then(|slot| slot.value.get()) {
            return Ok(cached.clone());
        }

        let definition = self
            .definitions
            .get(id)
            .ok_or_else(|| ContainerError::service_not_found(id))?;
        if !definition.is_shared() {
            return self.guarded(id, || self.build(id, definition));
        }

        let slot = match slot {
            Some(slot) => slot,
            None => self
                .lock_instances()
                .entry(id.to_owned())
                .or_default()
                .clone(),
        };
        self.guarded(id, || {
            let _init = slot.init.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = slot.value.get() {
                return Ok(cached.clone());
            }
            let service = self.build(id, definition)?;
            // Only the holder of `init` sets the value.
            let _ = slot.value.set(service.clone());
            Ok(service)
        })
    }

    /// Returns `true` if `id` names a definition, an alias or a synthetic
    /// service.
    pub fn has(&self, id: &str) -> bool {
        let id = self.resolve_alias(id);
        self.definitions.contains_key(id) || self.lock_instances().contains_key(id)
    }

    /// Returns the resolved value of a parameter.
    pub fn get_parameter(&self, name: &str) -> ContainerResult<&ParameterValue> {
        self.parameters.require(name)
    }

    /// Returns `true` if the parameter is registered.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.has(name)
    }

    /// All resolved parameters.
    pub fn parameters(&self) -> &ParameterBag {
        &self.parameters
    }

    /// Ids of every definition, sorted.
    pub fn service_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    fn build(&self, id: &str, definition: &Definition) -> ContainerResult<Option<Service>> {
        log::trace!("Building service '{}' ({})", id, definition.class());
        let values = self.resolve_arguments(id, definition.arguments())?;
        let arguments = Arguments::new(id, &values);

        let service = match definition.factory() {
            Factory::Constructor => Some(self.catalog.construct(
                id,
                definition.class(),
                self,
                &arguments,
            )?),
            Factory::Method { service, method } => {
                let factory = self
                    .service(service)?
                    .ok_or_else(|| ContainerError::NullService(service.clone()))?;
                self.catalog.invoke(service, &factory, method, &arguments)?
            }
        };

        if let Some(instance) = &service {
            for call in definition.method_calls() {
                let values = self.resolve_arguments(id, &call.arguments)?;
                self.catalog
                    .invoke(id, instance, &call.method, &Arguments::new(id, &values))?;
            }
        }
        Ok(service)
    }

    fn resolve_arguments(&self, owner: &str, arguments: &[Argument]) -> ContainerResult<Vec<Resolved>> {
        arguments
            .iter()
            .map(|argument| match argument {
                Argument::Reference(reference) => self
                    .service(reference)?
                    .map(Resolved::Service)
                    .ok_or_else(|| ContainerError::NullService(reference.clone())),
                Argument::Parameter(name) => self
                    .parameters
                    .require(name)
                    .map(|value| Resolved::Value(value.clone())),
                Argument::Value(value) => Ok(Resolved::Value(value.clone())),
            })
            .collect::<ContainerResult<Vec<_>>>()
            .map_err(|err| match err {
                ContainerError::ServiceNotFound { id, referrer: None } => {
                    ContainerError::ServiceNotFound {
                        id,
                        referrer: Some(owner.to_owned()),
                    }
                }
                other => other,
            })
    }

    /// Runs `build` with `id` pushed on this thread's construction stack.
    ///
    /// The cycle check happens before any slot is locked, so a service that
    /// needs itself fails instead of waiting on its own slot.
    fn guarded<R>(
        &self,
        id: &str,
        build: impl FnOnce() -> ContainerResult<R>,
    ) -> ContainerResult<R> {
        let thread = thread::current().id();
        {
            let mut loading = self.lock_loading();
            let stack = loading.entry(thread).or_default();
            if stack.iter().any(|pending| pending == id) {
                let mut path = stack.clone();
                path.push(id.to_owned());
                return Err(ContainerError::CircularReference(path));
            }
            stack.push(id.to_owned());
        }

        let built = build();

        let mut loading = self.lock_loading();
        if let Some(stack) = loading.get_mut(&thread) {
            stack.retain(|pending| pending != id);
            if stack.is_empty() {
                loading.remove(&thread);
            }
        }
        built
    }

    fn resolve_alias<'a>(&'a self, id: &'a str) -> &'a str {
        let mut current = id;
        // Alias chains are validated acyclic at compile time.
        while let Some(target) = self.aliases.get(current) {
            current = target;
        }
        current
    }

    fn lock_instances(&self) -> MutexGuard<'_, HashMap<String, Arc<Slot>>> {
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_loading(&self) -> MutexGuard<'_, HashMap<ThreadId, Vec<String>>> {
        self.loading.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("definitions", &self.service_ids())
            .field("aliases", &self.aliases)
            .field("parameters", &self.parameters.len())
            .finish()
    }
}

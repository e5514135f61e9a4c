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

//! The explicit registry of everything the container knows how to build.
//!
//! The [`ServiceCatalog`] is the only place where service instances come
//! from. Constructors are keyed by the class label of a [`Definition`], and
//! factory or setter methods are keyed by the concrete [`TypeId`] of the
//! service they are invoked on together with the method name.
//!
//! Services are stored as `Arc<dyn Any + Send + Sync>`, like a type-map, and
//! handed back by their concrete type.
//!
//! [`Definition`]: crate::Definition

use crate::container::Container;
use crate::error::{ContainerError, ContainerResult};
use crate::parameter::ParameterValue;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A type-erased, shared service instance.
pub type Service = Arc<dyn Any + Send + Sync>;

type ConstructorFn =
    Box<dyn Fn(&Container, &Arguments<'_>) -> ContainerResult<Service> + Send + Sync>;
type MethodFn =
    Box<dyn Fn(&Service, &Arguments<'_>) -> ContainerResult<Option<Service>> + Send + Sync>;

/// An argument after the container has resolved it.
#[derive(Clone)]
pub enum Resolved {
    /// A referenced service instance.
    Service(Service),
    /// A parameter or literal value.
    Value(ParameterValue),
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Service(_) => f.write_str("Service(..)"),
            Resolved::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// The resolved arguments handed to a constructor or method.
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a> {
    owner: &'a str,
    values: &'a [Resolved],
}

impl<'a> Arguments<'a> {
    /// Wraps resolved values on behalf of service `owner`.
    pub fn new(owner: &'a str, values: &'a [Resolved]) -> Self {
        Self { owner, values }
    }

    /// The id of the service being built or called.
    pub fn owner(&self) -> &str {
        self.owner
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the raw resolved argument at `index`.
    pub fn get(&self, index: usize) -> Option<&'a Resolved> {
        self.values.get(index)
    }

    /// Returns the service at `index` as a `T`.
    pub fn service<T: Send + Sync + 'static>(&self, index: usize) -> ContainerResult<Arc<T>> {
        match self.values.get(index) {
            Some(Resolved::Service(service)) => service
                .clone()
                .downcast::<T>()
                .map_err(|_| self.mismatch::<T>(index)),
            _ => Err(self.mismatch::<T>(index)),
        }
    }

    /// Returns the value at `index`.
    pub fn value(&self, index: usize) -> ContainerResult<&'a ParameterValue> {
        match self.values.get(index) {
            Some(Resolved::Value(value)) => Ok(value),
            _ => Err(self.mismatch::<ParameterValue>(index)),
        }
    }

    /// Returns the string value at `index`.
    pub fn string(&self, index: usize) -> ContainerResult<&'a str> {
        self.value(index)?
            .as_str()
            .ok_or_else(|| self.mismatch::<String>(index))
    }

    /// Returns the boolean value at `index`.
    pub fn bool(&self, index: usize) -> ContainerResult<bool> {
        self.value(index)?
            .as_bool()
            .ok_or_else(|| self.mismatch::<bool>(index))
    }

    fn mismatch<T: ?Sized>(&self, index: usize) -> ContainerError {
        ContainerError::TypeMismatch {
            id: format!("{} argument #{}", self.owner, index),
            expected: type_name::<T>(),
        }
    }
}

/// Constructors by class label and methods by service type.
#[derive(Default)]
pub struct ServiceCatalog {
    constructors: HashMap<String, ConstructorFn>,
    methods: HashMap<(TypeId, String), MethodFn>,
}

impl ServiceCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers how to build instances of the class labelled `class`.
    ///
    /// A later registration for the same label replaces the earlier one.
    pub fn register_constructor<T, F>(&mut self, class: impl Into<String>, constructor: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Container, &Arguments<'_>) -> ContainerResult<T> + Send + Sync + 'static,
    {
        let class = class.into();
        log::trace!("Registering constructor for class '{}'", class);
        self.constructors.insert(
            class,
            Box::new(move |container, arguments| {
                constructor(container, arguments).map(|instance| Arc::new(instance) as Service)
            }),
        );
    }

    /// Registers a method callable on services of concrete type `T`.
    ///
    /// The method may produce a new service (factory methods) or nothing.
    pub fn register_method<T, R, F>(&mut self, name: impl Into<String>, method: F)
    where
        T: Send + Sync + 'static,
        R: Send + Sync + 'static,
        F: Fn(&T, &Arguments<'_>) -> ContainerResult<Option<R>> + Send + Sync + 'static,
    {
        let name = name.into();
        log::trace!("Registering method '{}' on {}", name, type_name::<T>());
        self.methods.insert(
            (TypeId::of::<T>(), name),
            Box::new(move |service, arguments| {
                let target = service.downcast_ref::<T>().ok_or_else(|| {
                    ContainerError::TypeMismatch {
                        id: arguments.owner().to_owned(),
                        expected: type_name::<T>(),
                    }
                })?;
                method(target, arguments)
                    .map(|produced| produced.map(|instance| Arc::new(instance) as Service))
            }),
        );
    }

    /// Registers a method on `T` that only mutates or configures it.
    pub fn register_call<T, F>(&mut self, name: impl Into<String>, call: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&T, &Arguments<'_>) -> ContainerResult<()> + Send + Sync + 'static,
    {
        self.register_method::<T, (), _>(name, move |target, arguments| {
            call(target, arguments).map(|()| None)
        });
    }

    /// Returns `true` if a constructor is registered for `class`.
    #[must_use]
    pub fn has_constructor(&self, class: &str) -> bool {
        self.constructors.contains_key(class)
    }

    /// Returns `true` if `name` is registered for services of type `T`.
    #[must_use]
    pub fn has_method<T: 'static>(&self, name: &str) -> bool {
        self.methods.contains_key(&(TypeId::of::<T>(), name.to_owned()))
    }

    pub(crate) fn construct(
        &self,
        id: &str,
        class: &str,
        container: &Container,
        arguments: &Arguments<'_>,
    ) -> ContainerResult<Service> {
        let constructor =
            self.constructors
                .get(class)
                .ok_or_else(|| ContainerError::MissingConstructor {
                    id: id.to_owned(),
                    class: class.to_owned(),
                })?;
        constructor(container, arguments)
    }

    pub(crate) fn invoke(
        &self,
        service_id: &str,
        service: &Service,
        method: &str,
        arguments: &Arguments<'_>,
    ) -> ContainerResult<Option<Service>> {
        // The key is the type of the stored value, not of the `Arc` around it.
        let key = ((**service).type_id(), method.to_owned());
        let method_fn = self
            .methods
            .get(&key)
            .ok_or_else(|| ContainerError::MissingMethod {
                id: service_id.to_owned(),
                method: method.to_owned(),
            })?;
        method_fn(service, arguments)
    }

    /// Number of registered constructors.
    #[must_use]
    pub fn constructor_count(&self) -> usize {
        self.constructors.len()
    }

    /// Number of registered methods.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

impl fmt::Debug for ServiceCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classes: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        classes.sort_unstable();
        f.debug_struct("ServiceCatalog")
            .field("constructors", &classes)
            .field("methods", &self.methods.len())
            .finish()
    }
}

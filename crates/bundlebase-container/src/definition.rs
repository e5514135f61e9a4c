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

//! Service definitions: how the container builds one service.

use crate::parameter::ParameterValue;

/// One argument passed to a constructor, factory method or setter call.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Another service, by id or alias.
    Reference(String),
    /// The value of a container parameter.
    Parameter(String),
    /// A literal value. String placeholders are resolved at compile time.
    Value(ParameterValue),
}

impl Argument {
    /// Shorthand for [`Argument::Reference`].
    pub fn reference(id: impl Into<String>) -> Self {
        Argument::Reference(id.into())
    }

    /// Shorthand for [`Argument::Parameter`].
    pub fn parameter(name: impl Into<String>) -> Self {
        Argument::Parameter(name.into())
    }

    /// Shorthand for [`Argument::Value`].
    pub fn value(value: impl Into<ParameterValue>) -> Self {
        Argument::Value(value.into())
    }
}

/// How the service instance is produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Factory {
    /// The constructor registered for the definition's class.
    #[default]
    Constructor,
    /// A method invoked on another service.
    Method {
        /// The id of the factory service.
        service: String,
        /// The registered method name.
        method: String,
    },
}

/// A method invoked on the instance right after it is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// The registered method name.
    pub method: String,
    /// Its arguments.
    pub arguments: Vec<Argument>,
}

/// A tag attached to a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name.
    pub name: String,
    /// Optional ordering priority, higher first.
    pub priority: Option<i32>,
}

/// The recipe for one service.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    class: String,
    factory: Factory,
    arguments: Vec<Argument>,
    calls: Vec<MethodCall>,
    tags: Vec<Tag>,
    shared: bool,
}

impl Definition {
    /// Creates a shared definition built by the constructor of `class`.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            factory: Factory::Constructor,
            arguments: Vec::new(),
            calls: Vec::new(),
            tags: Vec::new(),
            shared: true,
        }
    }

    /// Produces the service by calling `method` on service `service`.
    pub fn with_factory(mut self, service: impl Into<String>, method: impl Into<String>) -> Self {
        self.factory = Factory::Method {
            service: service.into(),
            method: method.into(),
        };
        self
    }

    /// Appends a constructor or factory argument.
    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Replaces every constructor or factory argument.
    pub fn with_arguments(mut self, arguments: Vec<Argument>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Appends a method call.
    pub fn with_call(mut self, method: impl Into<String>, arguments: Vec<Argument>) -> Self {
        self.add_method_call(method, arguments);
        self
    }

    /// Attaches a tag.
    pub fn with_tag(mut self, name: impl Into<String>, priority: Option<i32>) -> Self {
        self.tags.push(Tag {
            name: name.into(),
            priority,
        });
        self
    }

    /// Makes every lookup build a fresh instance.
    pub fn not_shared(mut self) -> Self {
        self.shared = false;
        self
    }

    /// Appends a method call to an existing definition.
    pub fn add_method_call(&mut self, method: impl Into<String>, arguments: Vec<Argument>) {
        self.calls.push(MethodCall {
            method: method.into(),
            arguments,
        });
    }

    /// The class label looked up in the catalog.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// How the instance is produced.
    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    /// Constructor or factory arguments.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Calls applied after construction, in order.
    pub fn method_calls(&self) -> &[MethodCall] {
        &self.calls
    }

    /// All attached tags.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Returns every tag with the given name.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |tag| tag.name == name)
    }

    /// Whether the instance is cached after the first lookup.
    pub fn is_shared(&self) -> bool {
        self.shared
    }

    /// Every service id this definition depends on.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        let factory = match &self.factory {
            Factory::Method { service, .. } => Some(service.as_str()),
            Factory::Constructor => None,
        };
        factory.into_iter().chain(
            self.arguments
                .iter()
                .chain(self.calls.iter().flat_map(|call| call.arguments.iter()))
                .filter_map(|argument| match argument {
                    Argument::Reference(id) => Some(id.as_str()),
                    _ => None,
                }),
        )
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut ParameterValue> {
        self.arguments
            .iter_mut()
            .chain(self.calls.iter_mut().flat_map(|call| call.arguments.iter_mut()))
            .filter_map(|argument| match argument {
                Argument::Value(value) => Some(value),
                _ => None,
            })
    }
}

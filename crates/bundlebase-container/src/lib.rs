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

//! # Bundlebase Container
//!
//! A small dependency-injection container modelled as two phases:
//!
//! 1. **Build**: a [`ContainerBuilder`] collects [`Definition`]s, parameters
//!    and aliases. Bundles and extensions fill it, then registered
//!    [`CompilerPass`]es rewrite it.
//! 2. **Run**: [`ContainerBuilder::compile`] validates everything and freezes
//!    it into a [`Container`], which instantiates services lazily through
//!    the [`ServiceCatalog`].
//!
//! Services are never built by reflecting on a class name. Every class label
//! used by a definition must have a constructor registered in the catalog,
//! and every factory or setter method must be registered for the concrete
//! type it is called on.

#![warn(missing_docs)]

pub mod builder;
pub mod catalog;
pub mod compiler;
pub mod container;
pub mod definition;
pub mod error;
pub mod parameter;

pub use builder::ContainerBuilder;
pub use catalog::{Arguments, Resolved, Service, ServiceCatalog};
pub use compiler::{CompilerPass, TagCompilerPass};
pub use container::Container;
pub use definition::{Argument, Definition, Factory, MethodCall, Tag};
pub use error::{ContainerError, ContainerResult};
pub use parameter::{ParameterBag, ParameterValue};

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

//! # Bundlebase ORM
//!
//! Turns mapping descriptors into container services and offers the runtime
//! helpers that sit on top of them.
//!
//! - [`MappingCompilerPass`] reads a [`MappingBagProvider`] at compile time
//!   and defines, per entity, an object manager, an object repository and an
//!   [`ObjectDirector`].
//! - [`ObjectManagerProvider`] and [`ObjectRepositoryProvider`] answer "which
//!   manager/repository serves this class" at runtime.
//! - [`ContainerAccessor`] wraps a compiled container with entity-alias
//!   resolution and convenience finders.
//!
//! [`MappingBagProvider`]: bundlebase_core::MappingBagProvider

#![warn(missing_docs)]

pub mod accessor;
pub mod compiler;
pub mod director;
pub mod error;
pub mod provider;
pub mod services;

pub use accessor::ContainerAccessor;
pub use compiler::{MappingCompilerPass, MappingLoader, RegistryMappingLoader};
pub use director::ObjectDirector;
pub use error::{OrmError, OrmResult};
pub use provider::{ObjectManagerProvider, ObjectRepositoryProvider};
pub use services::register_base_services;

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

//! The public-facing assembly layer of Bundlebase.
//!
//! A [`Kernel`] takes a list of [`Bundle`]s and a [`KernelConfig`], orders the
//! bundles by their declared dependencies, lets each of them register
//! services, compiler passes and an [`Extension`], and compiles the result
//! into a container exposed through a [`ContainerAccessor`].

#![warn(missing_docs)]

pub mod bundle;
pub mod config;
pub mod error;
pub mod extension;
pub mod fixture;
pub mod kernel;
pub mod registry;

pub use bundle::{BaseBundle, Bundle, MappingBundle, PersistenceBundle};
pub use config::{KernelConfig, ServiceConfig};
pub use error::KernelError;
pub use extension::{extension_alias, Extension, MappingExtension};
pub use fixture::Fixture;
pub use kernel::{BootedKernel, BundleSource, Kernel};
pub use registry::{BundleFactory, BundleRegistry};

pub use bundlebase_orm::ContainerAccessor;

/// Everything an application usually needs in scope.
pub mod prelude {
    pub use crate::{
        Bundle, BundleSource, ContainerAccessor, Extension, Fixture, Kernel, KernelConfig,
        MappingBundle,
    };
    pub use bundlebase_container::{ContainerBuilder, Definition, ParameterValue};
    pub use bundlebase_core::{
        Criteria, Entity, EntityId, MappingOptions, SharedEntity, StandardMappingBagProvider,
    };
    pub use bundlebase_orm::ObjectDirector;
}

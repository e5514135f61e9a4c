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

//! # Bundlebase Core
//!
//! Foundational crate containing the mapping descriptors, persistence contracts
//! and small shared primitives that the rest of the workspace builds on.
//!
//! Nothing in here touches a service container: a [`mapping::MappingBag`] only
//! describes what a bundle wants wired, and the [`persistence`] traits only
//! describe what the persistence layer must offer.

#![warn(missing_docs)]

pub mod graph;
pub mod mapping;
pub mod naming;
pub mod persistence;

pub use mapping::{
    MappingBag, MappingBagCollection, MappingBagProvider, MappingOptions, MappingValue,
    ReducedMappingBag, StandardMappingBagProvider,
};
pub use persistence::{
    Criteria, Entity, EntityId, EntityMapping, ManagerRegistry, ObjectManager, ObjectRepository,
    PersistenceError, SharedEntity, SharedManager, SharedRegistry, SharedRepository,
};

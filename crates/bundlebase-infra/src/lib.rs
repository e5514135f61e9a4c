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

//! # Bundlebase Infra
//!
//! Concrete implementations of the collaborators `bundlebase-core` only
//! describes. For now that is an in-memory persistence layer: a manager
//! registry, managers with a unit of work, and repositories reading the
//! flushed state.

pub mod memory;
pub mod services;

pub use memory::{InMemoryManagerRegistry, InMemoryObjectManager, InMemoryObjectRepository};
pub use services::{register_persistence_services, MANAGERS_PARAMETER};

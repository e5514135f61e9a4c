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

//! In-memory persistence backend.

mod manager;
mod registry;
mod repository;

pub use manager::InMemoryObjectManager;
pub use registry::InMemoryManagerRegistry;
pub use repository::InMemoryObjectRepository;

use bundlebase_core::{EntityId, SharedEntity};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

/// Flushed instances, by class then id.
pub(crate) type Store = HashMap<String, BTreeMap<EntityId, SharedEntity>>;
pub(crate) type SharedStore = Arc<RwLock<Store>>;

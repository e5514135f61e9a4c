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

//! Data loaded into a booted kernel.

use bundlebase_orm::ContainerAccessor;

/// Seeds the persistence layer once the container is compiled.
///
/// Fixtures run by ascending [`order`](Fixture::order); fixtures with the same
/// order keep the order they were given in.
pub trait Fixture: Send + Sync {
    /// Name used in logs and errors. Defaults to the type name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Sort key, lower first.
    fn order(&self) -> i32 {
        0
    }

    /// Loads the fixture's data.
    fn load(&self, accessor: &ContainerAccessor) -> anyhow::Result<()>;
}

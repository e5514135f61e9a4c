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

//! Compiler passes rewrite a [`ContainerBuilder`] right before it is frozen.

mod tag;

pub use tag::TagCompilerPass;

use crate::builder::ContainerBuilder;
use crate::error::ContainerResult;

/// A transformation applied to the builder during [`ContainerBuilder::compile`].
///
/// Passes run in the order they were added. A pass may add, change or remove
/// definitions and parameters; any error aborts the compilation.
pub trait CompilerPass: Send + Sync {
    /// A human-readable name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Applies the pass.
    fn process(&self, container: &mut ContainerBuilder) -> ContainerResult<()>;
}

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

//! Errors surfaced by the runtime helpers.

use bundlebase_container::ContainerError;
use bundlebase_core::PersistenceError;
use thiserror::Error;

/// A specialized `Result` type for accessor and provider operations.
pub type OrmResult<T> = Result<T, OrmError>;

/// An error raised while resolving or using a mapped entity.
#[derive(Debug, Error)]
pub enum OrmError {
    /// The container could not provide a service or parameter.
    #[error(transparent)]
    Container(#[from] ContainerError),
    /// The persistence layer rejected the operation.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

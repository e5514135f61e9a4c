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

use thiserror::Error;

/// An error raised by the persistence layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// No manager claims the class.
    #[error("No object manager is responsible for class `{0}`")]
    NoManagerForClass(String),
    /// A mapping named a manager the registry does not know.
    #[error("Unknown object manager `{0}`")]
    UnknownManager(String),
    /// The manager was asked about a class it does not map.
    #[error("Class `{class}` is not mapped by manager `{manager}`")]
    UnmappedClass {
        /// The manager that was asked.
        manager: String,
        /// The class it does not map.
        class: String,
    },
    /// The entity cannot be stored as given.
    #[error("Invalid entity of class `{class}`: {reason}")]
    InvalidEntity {
        /// Class of the rejected entity.
        class: String,
        /// Why it was rejected.
        reason: String,
    },
}

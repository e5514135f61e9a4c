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

//! Errors raised while building or using a container.

use thiserror::Error;

/// A specialized `Result` type for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;

/// An error raised while building or using a container.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// No definition, alias or synthetic service is registered under the id.
    #[error("Service `{id}` does not exist{}", referrer_suffix(.referrer))]
    ServiceNotFound {
        /// The missing id.
        id: String,
        /// The definition that referenced it, when known.
        referrer: Option<String>,
    },
    /// The parameter is not registered.
    #[error("Parameter `{0}` does not exist")]
    ParameterNotFound(String),
    /// Service construction loops back onto itself.
    #[error("Circular reference detected: {}", .0.join(" -> "))]
    CircularReference(Vec<String>),
    /// Parameter placeholders loop back onto themselves.
    #[error("Circular parameter reference detected: {}", .0.join(" -> "))]
    CircularParameter(Vec<String>),
    /// A definition names a class the catalog cannot construct.
    #[error("No constructor registered for class `{class}` (service `{id}`)")]
    MissingConstructor {
        /// The service being built.
        id: String,
        /// Its class label.
        class: String,
    },
    /// A factory or setter method is not registered for the target type.
    #[error("Method `{method}` is not registered for service `{id}`")]
    MissingMethod {
        /// The service the method was invoked on.
        id: String,
        /// The method name.
        method: String,
    },
    /// A service or argument does not have the requested type.
    #[error("Type mismatch for `{id}`: expected {expected}")]
    TypeMismatch {
        /// The service id or argument position.
        id: String,
        /// The expected type.
        expected: &'static str,
    },
    /// A factory produced no service where one was required.
    #[error("Service `{0}` resolved to nothing")]
    NullService(String),
    /// A parameter exists but has an unusable shape.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// Why it is unusable.
        reason: String,
    },
    /// A constructor, factory or setter failed.
    #[error("Failed to construct service: {0}")]
    Construction(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ContainerError {
    /// Wraps any error raised while constructing a service.
    pub fn construction(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        ContainerError::Construction(Box::new(err))
    }

    /// Convenience constructor for a missing service with no known referrer.
    pub fn service_not_found(id: impl Into<String>) -> Self {
        ContainerError::ServiceNotFound {
            id: id.into(),
            referrer: None,
        }
    }
}

fn referrer_suffix(referrer: &Option<String>) -> String {
    referrer
        .as_ref()
        .map(|referrer| format!(" (referenced by `{referrer}`)"))
        .unwrap_or_default()
}

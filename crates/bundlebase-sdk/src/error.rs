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

use bundlebase_container::ContainerError;
use thiserror::Error;

/// An error raised while assembling or using a kernel.
#[derive(Debug, Error)]
pub enum KernelError {
    /// A bundle name no source or registry can resolve.
    #[error("Unknown bundle `{name}`{}", required_suffix(.required_by))]
    UnknownBundle {
        /// The unresolved name.
        name: String,
        /// The bundle that declared the dependency, if any.
        required_by: Option<String>,
    },
    /// Bundles that depend on each other, in walk order.
    #[error("Bundle dependency cycle among {0:?}")]
    CyclicDependency(Vec<String>),
    /// Building or compiling the container failed.
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),
    /// An extension rejected its configuration section.
    #[error("Extension `{alias}` failed: {source}")]
    Extension {
        /// Alias of the failing extension.
        alias: String,
        /// The underlying failure.
        #[source]
        source: ContainerError,
    },
    /// A fixture failed to load.
    #[error("Fixture `{name}` failed: {source}")]
    Fixture {
        /// Name of the failing fixture.
        name: String,
        /// The underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Malformed JSON configuration.
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// Malformed RON configuration.
    #[error("Invalid RON configuration: {0}")]
    Ron(#[from] ron::error::SpannedError),
    /// A configuration file could not be read.
    #[error("Cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
}

fn required_suffix(required_by: &Option<String>) -> String {
    required_by
        .as_ref()
        .map(|by| format!(" (required by `{by}`)"))
        .unwrap_or_default()
}

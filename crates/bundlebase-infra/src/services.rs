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

//! Container wiring of the in-memory persistence layer.

use crate::memory::InMemoryManagerRegistry;
use bundlebase_container::{
    Argument, ContainerBuilder, ContainerError, Definition, ParameterValue,
};
use bundlebase_core::SharedRegistry;
use bundlebase_orm::services::MANAGER_REGISTRY;
use std::sync::Arc;

/// Parameter listing the manager names, e.g. `["default", "alt"]`.
pub const MANAGERS_PARAMETER: &str = "persistence.managers";
/// Class label of [`InMemoryManagerRegistry`].
pub const IN_MEMORY_REGISTRY_CLASS: &str = "bundlebase::infra::InMemoryManagerRegistry";

/// Defines `base.manager_registry` as an in-memory registry over the managers
/// named by `persistence.managers`, which defaults to `["default"]`.
pub fn register_persistence_services(builder: &mut ContainerBuilder) {
    if !builder.has_parameter(MANAGERS_PARAMETER) {
        builder.set_parameter(MANAGERS_PARAMETER, vec!["default"]);
    }
    builder.set_definition(
        MANAGER_REGISTRY,
        Definition::new(IN_MEMORY_REGISTRY_CLASS)
            .with_argument(Argument::parameter(MANAGERS_PARAMETER)),
    );
    builder
        .catalog_mut()
        .register_constructor(IN_MEMORY_REGISTRY_CLASS, |_, args| {
            let names = manager_names(args.value(0)?)?;
            log::info!("In-memory persistence with managers {:?}", names);
            Ok(Arc::new(InMemoryManagerRegistry::new(names)) as SharedRegistry)
        });
}

fn manager_names(value: &ParameterValue) -> Result<Vec<String>, ContainerError> {
    let invalid = || ContainerError::InvalidParameter {
        name: MANAGERS_PARAMETER.to_owned(),
        reason: "expected a manager name or a list of them".to_owned(),
    };
    match value {
        ParameterValue::String(name) => Ok(vec![name.clone()]),
        ParameterValue::List(names) => names
            .iter()
            .map(|name| name.as_str().map(str::to_owned).ok_or_else(invalid))
            .collect(),
        _ => Err(invalid()),
    }
}

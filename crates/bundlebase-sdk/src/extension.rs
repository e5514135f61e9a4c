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

//! Configuration-phase hooks of bundles.

use bundlebase_container::{ContainerBuilder, ContainerError, ContainerResult, ParameterValue};
use bundlebase_core::mapping::{FIELD_CLASS, FIELD_ENABLED, FIELD_MANAGER, FIELD_MAPPING_FILE};
use bundlebase_core::{MappingBag, MappingBagProvider};
use serde_json::Value;
use std::sync::Arc;

/// Loads a bundle's section of the application configuration into the
/// container, before compiler passes run.
pub trait Extension: Send + Sync {
    /// Key of the configuration section, e.g. `test_mapping`.
    fn alias(&self) -> &str;

    /// Applies `config` (`Value::Null` when the section is absent).
    fn load(&self, config: &Value, container: &mut ContainerBuilder) -> ContainerResult<()>;
}

/// Derives an extension alias from a bundle name.
///
/// A trailing `Bundle` is dropped and the rest is converted to snake case:
/// `TestMappingBundle` becomes `test_mapping`, `HTTPCacheBundle` becomes
/// `http_cache`.
pub fn extension_alias(bundle_name: &str) -> String {
    let base = bundle_name.strip_suffix("Bundle").unwrap_or(bundle_name);
    let chars: Vec<char> = base.chars().collect();
    let mut alias = String::with_capacity(base.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                alias.push('_');
            }
        }
        alias.extend(c.to_lowercase());
    }
    alias
}

/// Registers the override parameters of overwritable mappings.
///
/// For every overwritable bag and each of `class`, `mapping_file`,
/// `manager` and `enabled`, the parameter `{prefix}.entity.{name}.{field}`
/// receives the first value found among:
///
/// 1. the extension config at `mapping.{name}.{field}`,
/// 2. the parameter's current value,
/// 3. the value declared by the bag.
///
/// Non-overwritable bags are skipped.
pub struct MappingExtension {
    alias: String,
    provider: Arc<dyn MappingBagProvider>,
}

impl MappingExtension {
    /// An extension reading section `alias` for the bags of `provider`.
    pub fn new(alias: impl Into<String>, provider: Arc<dyn MappingBagProvider>) -> Self {
        Self {
            alias: alias.into(),
            provider,
        }
    }

    fn declared(bag: &MappingBag) -> [(&'static str, ParameterValue); 4] {
        [
            (FIELD_CLASS, ParameterValue::String(bag.entity_namespace())),
            (
                FIELD_MAPPING_FILE,
                ParameterValue::String(bag.entity_mapping_file_path()),
            ),
            (
                FIELD_MANAGER,
                ParameterValue::String(bag.manager_name().to_owned()),
            ),
            (FIELD_ENABLED, ParameterValue::Bool(bag.entity_is_enabled())),
        ]
    }
}

impl Extension for MappingExtension {
    fn alias(&self) -> &str {
        &self.alias
    }

    fn load(&self, config: &Value, container: &mut ContainerBuilder) -> ContainerResult<()> {
        let collection = self.provider.mapping_bag_collection();
        for bag in collection.all().iter().filter(|bag| bag.is_overwritable()) {
            let section = config
                .get("mapping")
                .and_then(|mapping| mapping.get(bag.entity_name()));
            for (field, declared) in Self::declared(bag) {
                let name = bag.param_format(field);
                match section.and_then(|section| section.get(field)) {
                    Some(value) => {
                        let value = serde_json::from_value::<ParameterValue>(value.clone())
                            .map_err(|err| ContainerError::InvalidParameter {
                                name: name.clone(),
                                reason: err.to_string(),
                            })?;
                        log::debug!("{}: {} = {} (configured)", self.alias, name, value);
                        container.set_parameter(name, value);
                    }
                    None if container.has_parameter(&name) => {}
                    None => container.set_parameter(name, declared),
                }
            }
        }
        Ok(())
    }
}

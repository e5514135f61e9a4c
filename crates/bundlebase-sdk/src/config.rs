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

//! Serializable application configuration.

use crate::error::KernelError;
use bundlebase_container::{Argument, ContainerBuilder, Definition, ParameterValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Parameters, services, aliases and extension sections applied to the
/// container before any bundle is built.
///
/// ```json
/// {
///   "parameters": { "persistence.managers": ["default", "alt"] },
///   "services": { "clock": { "class": "app::Clock", "arguments": ["@tz", "%app.tz%"] } },
///   "aliases": { "time": "clock" },
///   "extensions": { "test_mapping": { "mapping": { "user": { "manager": "alt" } } } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Parameters set before any bundle is built.
    pub parameters: BTreeMap<String, ParameterValue>,
    /// Service definitions keyed by id.
    pub services: BTreeMap<String, ServiceConfig>,
    /// Alias to target id.
    pub aliases: BTreeMap<String, String>,
    /// Extension sections keyed by extension alias.
    pub extensions: BTreeMap<String, Value>,
}

impl KernelConfig {
    /// Parses a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, KernelError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Parses a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, KernelError> {
        Ok(ron::from_str(source)?)
    }

    /// Loads a `.ron` file as RON and anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, KernelError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Self::from_ron_str(&source),
            _ => Self::from_json_str(&source),
        }
    }

    /// The section of extension `alias`, or `Value::Null`.
    pub fn extension(&self, alias: &str) -> &Value {
        self.extensions.get(alias).unwrap_or(&Value::Null)
    }

    /// Registers parameters, aliases and service definitions.
    pub fn apply(&self, container: &mut ContainerBuilder) {
        for (name, value) in &self.parameters {
            container.set_parameter(name.clone(), value.clone());
        }
        for (id, service) in &self.services {
            container.set_definition(id.clone(), service.to_definition());
        }
        for (alias, target) in &self.aliases {
            container.set_alias(alias.clone(), target.clone());
        }
    }
}

/// A service definition in configuration form.
///
/// String arguments starting with `@` are service references; `@@` escapes a
/// literal `@`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Registered constructor name.
    pub class: String,
    /// Constructor arguments.
    #[serde(default)]
    pub arguments: Vec<ParameterValue>,
    /// Builds the service through another service instead of `class`.
    #[serde(default)]
    pub factory: Option<FactoryConfig>,
    /// Methods invoked after construction, in order.
    #[serde(default)]
    pub calls: Vec<CallConfig>,
    /// Tags collected by compiler passes.
    #[serde(default)]
    pub tags: Vec<TagConfig>,
    /// Whether the built service is cached. Defaults to `true`.
    #[serde(default = "default_shared")]
    pub shared: bool,
}

/// A factory service and the method producing the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryConfig {
    /// Id of the factory service.
    pub service: String,
    /// Method called on it.
    pub method: String,
}

/// A method call applied to a freshly built service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallConfig {
    /// Registered method name.
    pub method: String,
    /// Call arguments.
    #[serde(default)]
    pub arguments: Vec<ParameterValue>,
}

/// A tag with an optional priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagConfig {
    /// Tag name.
    pub name: String,
    /// Ordering priority, higher first.
    #[serde(default)]
    pub priority: Option<i32>,
}

fn default_shared() -> bool {
    true
}

impl ServiceConfig {
    /// Converts the configuration into a container definition.
    pub fn to_definition(&self) -> Definition {
        let mut definition =
            Definition::new(self.class.as_str()).with_arguments(to_arguments(&self.arguments));
        if let Some(factory) = &self.factory {
            definition = definition.with_factory(factory.service.as_str(), factory.method.as_str());
        }
        for call in &self.calls {
            definition = definition.with_call(call.method.as_str(), to_arguments(&call.arguments));
        }
        for tag in &self.tags {
            definition = definition.with_tag(tag.name.as_str(), tag.priority);
        }
        if !self.shared {
            definition = definition.not_shared();
        }
        definition
    }
}

fn to_arguments(values: &[ParameterValue]) -> Vec<Argument> {
    values.iter().map(to_argument).collect()
}

fn to_argument(value: &ParameterValue) -> Argument {
    match value.as_str() {
        Some(text) if text.starts_with("@@") => Argument::value(&text[1..]),
        Some(text) if text.starts_with('@') => Argument::reference(&text[1..]),
        _ => Argument::Value(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundlebase_container::Factory;

    #[test]
    fn test_json_config() {
        let config = KernelConfig::from_json_str(
            r#"{
                "parameters": { "app.name": "demo", "persistence.managers": ["default", "alt"] },
                "services": {
                    "clock": {
                        "class": "app::Clock",
                        "arguments": ["@tz", "@@home", "%app.name%", 3],
                        "factory": { "service": "clocks", "method": "make" },
                        "calls": [{ "method": "start" }],
                        "tags": [{ "name": "tickers", "priority": 5 }],
                        "shared": false
                    }
                },
                "aliases": { "time": "clock" }
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.parameters["persistence.managers"],
            ParameterValue::from(vec!["default", "alt"])
        );
        assert_eq!(config.aliases["time"], "clock");
        assert_eq!(config.extension("missing"), &Value::Null);

        let definition = config.services["clock"].to_definition();
        assert_eq!(
            definition.arguments(),
            &[
                Argument::reference("tz"),
                Argument::value("@home"),
                Argument::value("%app.name%"),
                Argument::value(3),
            ]
        );
        assert_eq!(
            definition.factory(),
            &Factory::Method {
                service: "clocks".into(),
                method: "make".into(),
            }
        );
        assert_eq!(definition.method_calls().len(), 1);
        assert_eq!(definition.tags()[0].priority, Some(5));
        assert!(!definition.is_shared());
    }

    #[test]
    fn test_ron_config() {
        let config = KernelConfig::from_ron_str(
            r#"(
                parameters: { "app.debug": true },
                services: { "clock": (class: "app::Clock") },
                extensions: { "test_mapping": { "mapping": { "user": { "manager": "alt" } } } },
            )"#,
        )
        .unwrap();

        assert_eq!(config.parameters["app.debug"], ParameterValue::Bool(true));
        assert!(config.services["clock"].shared);
        assert!(config.services["clock"].arguments.is_empty());
        assert_eq!(
            config.extension("test_mapping")["mapping"]["user"]["manager"],
            Value::from("alt")
        );
    }

    #[test]
    fn test_invalid_json_is_reported() {
        assert!(matches!(
            KernelConfig::from_json_str("{ nope"),
            Err(KernelError::Json(_))
        ));
    }
}

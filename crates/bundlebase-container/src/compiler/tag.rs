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

//! Injects tagged services into a collector service.

use super::CompilerPass;
use crate::builder::ContainerBuilder;
use crate::definition::Argument;
use crate::error::ContainerResult;

/// Collects every service tagged with a given name and hands each of them to
/// a collector service through a method call.
///
/// Services are ordered by the `priority` of their first matching tag,
/// highest first. A missing priority counts as `0` and ties keep the
/// registration order. If the collector is not defined the pass does nothing.
#[derive(Debug, Clone)]
pub struct TagCompilerPass {
    collector: String,
    method: String,
    tag: String,
}

impl TagCompilerPass {
    /// Creates a pass feeding services tagged `tag` to `collector.method(..)`.
    pub fn new(
        collector: impl Into<String>,
        method: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            collector: collector.into(),
            method: method.into(),
            tag: tag.into(),
        }
    }
}

impl CompilerPass for TagCompilerPass {
    fn name(&self) -> &str {
        "TagCompilerPass"
    }

    fn process(&self, container: &mut ContainerBuilder) -> ContainerResult<()> {
        if !container.has(&self.collector) {
            log::debug!(
                "TagCompilerPass: collector '{}' not defined, skipping tag '{}'",
                self.collector,
                self.tag
            );
            return Ok(());
        }

        let mut tagged: Vec<(String, i32)> = container
            .find_tagged_service_ids(&self.tag)
            .into_iter()
            .map(|(id, tags)| {
                let priority = tags.first().and_then(|tag| tag.priority).unwrap_or(0);
                (id, priority)
            })
            .collect();
        // Stable: equal priorities stay in registration order.
        tagged.sort_by(|a, b| b.1.cmp(&a.1));

        let Some(collector) = container.find_definition_mut(&self.collector) else {
            // Synthetic collectors cannot receive method calls.
            return Ok(());
        };
        for (id, priority) in tagged {
            log::debug!(
                "TagCompilerPass: {}::{}('{}') (priority={})",
                self.collector,
                self.method,
                id,
                priority
            );
            collector.add_method_call(self.method.clone(), vec![Argument::Reference(id)]);
        }
        Ok(())
    }
}

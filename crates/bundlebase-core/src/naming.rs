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

//! Naming conventions shared by generated container entries.
//!
//! Every key produced for a mapping follows
//! `{prefix}.{segment}.{entity_name}`. An empty prefix must never leave a
//! leading dot behind, so all joins go through [`container_key`].

/// Separator between path segments of a fully qualified entity class.
pub const CLASS_SEPARATOR: &str = "::";

/// Segment used for the generated director entries.
pub const OBJECT_DIRECTOR_SEGMENT: &str = "object_director";

/// Segment used for the override-hook parameters.
pub const ENTITY_SEGMENT: &str = "entity";

/// Joins key segments with `.` and strips the leading dots an empty prefix leaves.
///
/// ```rust
/// use bundlebase_core::naming::container_key;
///
/// assert_eq!(container_key(&["my_app", "object_manager", "user"]), "my_app.object_manager.user");
/// assert_eq!(container_key(&["", "object_manager", "user"]), "object_manager.user");
/// ```
pub fn container_key(segments: &[&str]) -> String {
    segments.join(".").trim_start_matches('.').to_string()
}

/// Builds the override-hook parameter name `{prefix}.entity.{entity_name}.{field}`.
pub fn entity_parameter(prefix: &str, entity_name: &str, field: &str) -> String {
    container_key(&[prefix, ENTITY_SEGMENT, entity_name, field])
}

/// Joins a namespace and a class, keeping exactly one separator between them.
pub fn join_class_path(namespace: &str, class: &str) -> String {
    format!(
        "{}{}{}",
        namespace.trim_end_matches(':'),
        CLASS_SEPARATOR,
        class.trim_start_matches(':')
    )
}

/// Joins a bundle location and a file path with exactly one `/`.
pub fn join_file_path(location: &str, file: &str) -> String {
    format!("{}/{}", location, file.trim_start_matches('/'))
}

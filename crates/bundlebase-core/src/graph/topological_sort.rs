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

//! Kahn's algorithm, used to order bundles so dependencies load first.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;

/// A cycle was detected; carries the nodes that could not be ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError<T> {
    /// Nodes that sit on, or depend on, a cycle, in input order.
    pub unresolved: Vec<T>,
}

impl<T: fmt::Debug> fmt::Display for CycleError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dependency cycle among {:?}", self.unresolved)
    }
}

impl<T: fmt::Debug> std::error::Error for CycleError<T> {}

/// Performs a topological sort on a directed graph.
///
/// Edges are `(parent, child)` pairs: `parent` must come before `child`.
/// Nodes that are ready at the same time keep their input order, so the
/// result is deterministic for a given input.
///
/// # Errors
///
/// Returns [`CycleError`] with the unordered nodes if the graph has a cycle.
pub fn topological_sort<T>(
    nodes: impl IntoIterator<Item = T>,
    edges: impl IntoIterator<Item = (T, T)>,
) -> Result<Vec<T>, CycleError<T>>
where
    T: Copy + Eq + Hash,
{
    let node_list: Vec<T> = nodes.into_iter().collect();
    if node_list.is_empty() {
        return Ok(Vec::new());
    }

    let mut adjacency_list: HashMap<T, Vec<T>> = HashMap::new();
    let mut in_degree: HashMap<T, usize> = node_list.iter().map(|id| (*id, 0)).collect();

    // 1. Build adjacency list and in-degree counts from edges.
    for (parent, child) in edges {
        adjacency_list.entry(parent).or_default().push(child);
        if let Some(degree) = in_degree.get_mut(&child) {
            *degree += 1;
        }
    }

    // 2. Seed the queue with every root, in input order.
    let mut queue: VecDeque<T> = node_list
        .iter()
        .copied()
        .filter(|node| in_degree.get(node).copied().unwrap_or(0) == 0)
        .collect();

    // 3. Process the queue.
    let mut sorted_list = Vec::with_capacity(node_list.len());
    while let Some(parent_node) = queue.pop_front() {
        sorted_list.push(parent_node);
        if let Some(children) = adjacency_list.get(&parent_node) {
            for &child_node in children {
                if let Some(degree) = in_degree.get_mut(&child_node) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(child_node);
                    }
                }
            }
        }
    }

    // 4. Anything left over sits on a cycle.
    if sorted_list.len() != node_list.len() {
        let unresolved = node_list
            .into_iter()
            .filter(|node| in_degree.get(node).copied().unwrap_or(0) > 0)
            .collect();
        Err(CycleError { unresolved })
    } else {
        Ok(sorted_list)
    }
}

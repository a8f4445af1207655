//! Recorded import cycles.

use serde::Serialize;

use crate::registry::GraphRegistry;

/// A closed loop of default-import edges.
///
/// `members` is the traversal-stack sub-sequence from the first occurrence
/// of the repeated module to the point of re-encounter, so following each
/// member's edge to the next (and the last member's edge back to the first)
/// walks the loop. Edge-level cycle membership lives on
/// [`ImportEdge::in_cycle`](crate::ImportEdge) because a node can carry
/// both cyclic and acyclic outgoing edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    /// Path keys of the participating modules, in traversal order.
    pub members: Vec<String>,
}

impl Cycle {
    /// Render the loop as `a -> b -> c -> a` using module short names.
    pub fn render(&self, registry: &GraphRegistry) -> String {
        let mut names: Vec<&str> = self
            .members
            .iter()
            .map(|path| {
                registry
                    .get(path)
                    .map(|node| node.short_name())
                    .unwrap_or(path.as_str())
            })
            .collect();
        if let Some(first) = names.first().copied() {
            names.push(first);
        }
        names.join(" -> ")
    }

    /// True when `path` participates in this cycle.
    pub fn contains(&self, path: &str) -> bool {
        self.members.iter().any(|m| m == path)
    }
}

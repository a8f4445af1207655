//! The module graph registry.

use indexmap::IndexMap;

/// One directed edge in the import graph.
///
/// Edges carry the local binding name of the default import — the risk
/// analyzer later searches the importer's text for usages of exactly that
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    /// Normalized path key of the imported module.
    pub target: String,
    /// Local identifier the default export is bound to.
    pub binding: String,
    /// True when this edge is internal to a recorded cycle.
    pub in_cycle: bool,
}

/// One node per module file encountered while walking imports.
#[derive(Debug, Clone)]
pub struct ModuleNode {
    /// Normalized absolute path (identity key). For external packages this
    /// is the bare specifier instead.
    pub path: String,
    /// Bare package specifiers become external leaf nodes; their contents
    /// are never walked.
    pub is_external: bool,
    /// Outgoing edges keyed by target path, in declaration order.
    pub imports: IndexMap<String, ImportEdge>,
    /// Guards against re-walking the same module twice.
    pub imports_processed: bool,
    /// Cached file contents, reused by the risk analyzer.
    pub content: String,
}

impl ModuleNode {
    fn new(path: String, is_external: bool) -> Self {
        Self {
            path,
            is_external,
            imports: IndexMap::new(),
            imports_processed: false,
            content: String::new(),
        }
    }

    /// The module's display name: file base name minus extension, or the
    /// bare specifier for externals.
    pub fn short_name(&self) -> &str {
        let base = self.path.rsplit('/').next().unwrap_or(&self.path);
        match base.rfind('.') {
            Some(dot) => &base[..dot],
            None => base,
        }
    }
}

/// Owned registry of graph nodes, keyed by normalized path.
///
/// An explicit store passed by reference into every operation — no ambient
/// singletons. `get_or_create` returns a stable identity for repeated
/// lookups within one run.
#[derive(Debug, Default)]
pub struct GraphRegistry {
    modules: IndexMap<String, ModuleNode>,
}

impl GraphRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the node for `path`, creating it on first lookup.
    pub fn get_or_create(&mut self, path: &str, is_external: bool) -> &mut ModuleNode {
        self.modules
            .entry(path.to_string())
            .or_insert_with(|| ModuleNode::new(path.to_string(), is_external))
    }

    /// Look up a node without creating it.
    pub fn get(&self, path: &str) -> Option<&ModuleNode> {
        self.modules.get(path)
    }

    /// Mutable lookup without creating.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut ModuleNode> {
        self.modules.get_mut(path)
    }

    /// Iterate nodes in discovery order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleNode> {
        self.modules.values()
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

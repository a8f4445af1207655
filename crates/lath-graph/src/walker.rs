//! Depth-first import graph traversal with cycle recording.

use regex::Regex;
use rustc_hash::FxHashSet;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, trace};

use lath_store::{StagedFileStore, normalize_key};

use crate::cycle::Cycle;
use crate::registry::{GraphRegistry, ImportEdge};
use crate::Result;

/// The two static default-import shapes the converter emits. Named,
/// namespace, and side-effect-only imports are not graph edges.
static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^import (?:\{ default as (\w+) \}|(\w+)) from "([^"]+)";"#).unwrap()
});

/// Walks generated ES modules by following static default imports.
///
/// Cycle membership is tracked with an explicit traversal stack (the
/// "chain"): a module is in-progress iff its key is on the chain. Nodes
/// keep only a terminal `imports_processed` flag, so a module popped off
/// the chain can still appear in cycles discovered later from other roots.
/// Reads go through the staged store, so uncommitted generation output is
/// visible.
pub struct ImportGraphWalker<'a> {
    store: &'a mut StagedFileStore,
    registry: GraphRegistry,
    cycles: Vec<Cycle>,
}

impl<'a> ImportGraphWalker<'a> {
    /// Create a walker reading through `store`.
    pub fn new(store: &'a mut StagedFileStore) -> Self {
        Self {
            store,
            registry: GraphRegistry::new(),
            cycles: Vec::new(),
        }
    }

    /// Walk the graph reachable from one top-level generated file.
    ///
    /// Callers seed this once per generated root; listing order determines
    /// cycle reporting order, so pass a sorted listing for reproducible
    /// diagnostics.
    pub fn walk_root(&mut self, path: &Path) -> Result<()> {
        let key = normalize_key(path);
        let mut chain: Vec<String> = Vec::new();
        self.walk(&key, &mut chain)
    }

    /// The graph discovered so far.
    pub fn registry(&self) -> &GraphRegistry {
        &self.registry
    }

    /// Cycles recorded so far, in discovery order.
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    /// Consume the walker, yielding the graph and its cycles.
    pub fn into_parts(self) -> (GraphRegistry, Vec<Cycle>) {
        (self.registry, self.cycles)
    }

    fn walk(&mut self, key: &str, chain: &mut Vec<String>) -> Result<()> {
        if let Some(node) = self.registry.get(key) {
            if node.imports_processed || node.is_external {
                return Ok(());
            }
        }

        let content = self.store.read(Path::new(key))?;

        // Scan edges in declaration order before touching the registry.
        let declared: Vec<(String, String)> = IMPORT_RE
            .captures_iter(&content)
            .map(|caps| {
                let binding = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                (binding, caps[3].to_string())
            })
            .collect();
        trace!(path = key, imports = declared.len(), "scanned module");

        {
            let node = self.registry.get_or_create(key, false);
            node.content = content;
            node.imports_processed = true;
        }

        let mut edges: Vec<(String, bool)> = Vec::new();
        for (binding, specifier) in declared {
            let (target, is_external) = if is_relative(&specifier) {
                (resolve_specifier(key, &specifier), false)
            } else {
                (specifier.clone(), true)
            };

            if is_external {
                self.registry.get_or_create(&target, true);
            }

            let node = self.registry.get_mut(key).expect("node just created");
            node.imports.insert(
                target.clone(),
                ImportEdge {
                    target: target.clone(),
                    binding,
                    in_cycle: false,
                },
            );
            edges.push((target, is_external));
        }

        chain.push(key.to_string());
        for (target, is_external) in edges {
            if is_external {
                continue;
            }
            if let Some(pos) = chain.iter().position(|p| p == &target) {
                // The target is in-progress on the chain: everything from
                // its first occurrence to the current top closes a loop.
                // Do not descend this edge.
                let members = chain[pos..].to_vec();
                self.record_cycle(members);
                continue;
            }
            let processed = self
                .registry
                .get(&target)
                .map(|n| n.imports_processed)
                .unwrap_or(false);
            if !processed {
                self.walk(&target, chain)?;
            }
        }
        chain.pop();

        Ok(())
    }

    fn record_cycle(&mut self, members: Vec<String>) {
        let member_set: FxHashSet<&str> = members.iter().map(String::as_str).collect();

        // Mark every edge with both endpoints inside the recorded set.
        for member in &members {
            if let Some(node) = self.registry.get_mut(member) {
                for edge in node.imports.values_mut() {
                    if member_set.contains(edge.target.as_str()) {
                        edge.in_cycle = true;
                    }
                }
            }
        }

        debug!(len = members.len(), first = %members[0], "cycle recorded");
        self.cycles.push(Cycle { members });
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
}

/// Resolve a relative specifier against the importing module's directory.
/// Extension-less specifiers (the converted-require form) get `.js`.
fn resolve_specifier(importer_key: &str, specifier: &str) -> String {
    let dir = match importer_key.rfind('/') {
        Some(idx) => &importer_key[..idx],
        None => "",
    };
    let mut key = normalize_key(&Path::new(dir).join(specifier));
    if !key.ends_with(".js") {
        key.push_str(".js");
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_module(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        normalize_key(&path)
    }

    #[test]
    fn test_three_module_cycle_recorded_once() {
        let dir = TempDir::new().unwrap();
        let a = write_module(
            &dir,
            "A.js",
            "import { default as B } from \"./B\";\nimport { default as D } from \"./D\";\n",
        );
        let b = write_module(&dir, "B.js", "import C from \"./C\";\n");
        let c = write_module(&dir, "C.js", "import { default as A } from \"./A\";\n");
        let d = write_module(&dir, "D.js", "export default class D {}\n");

        let mut store = StagedFileStore::new();
        let mut walker = ImportGraphWalker::new(&mut store);
        walker.walk_root(Path::new(&a)).unwrap();

        let (registry, cycles) = walker.into_parts();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].members, vec![a.clone(), b.clone(), c.clone()]);

        // All three loop edges marked, the acyclic edge left alone.
        assert!(registry.get(&a).unwrap().imports[&b].in_cycle);
        assert!(registry.get(&b).unwrap().imports[&c].in_cycle);
        assert!(registry.get(&c).unwrap().imports[&a].in_cycle);
        assert!(!registry.get(&a).unwrap().imports[&d].in_cycle);
        assert!(!cycles[0].contains(&d));
    }

    #[test]
    fn test_external_specifiers_are_leaves() {
        let dir = TempDir::new().unwrap();
        let a = write_module(&dir, "A.js", "import Tween from \"tween\";\n");

        let mut store = StagedFileStore::new();
        let mut walker = ImportGraphWalker::new(&mut store);
        walker.walk_root(Path::new(&a)).unwrap();

        let (registry, cycles) = walker.into_parts();
        assert!(cycles.is_empty());
        let external = registry.get("tween").unwrap();
        assert!(external.is_external);
        assert!(external.imports.is_empty());
        assert_eq!(registry.get(&a).unwrap().imports["tween"].binding, "Tween");
    }

    #[test]
    fn test_only_default_import_shapes_are_edges() {
        let dir = TempDir::new().unwrap();
        write_module(&dir, "Helpers.js", "export const x = 1;\n");
        let a = write_module(
            &dir,
            "A.js",
            "import { x } from \"./Helpers\";\nimport * as all from \"./Helpers\";\n",
        );

        let mut store = StagedFileStore::new();
        let mut walker = ImportGraphWalker::new(&mut store);
        walker.walk_root(Path::new(&a)).unwrap();

        assert!(walker.registry().get(&a).unwrap().imports.is_empty());
    }

    #[test]
    fn test_two_module_cycle_binding_names_preserved() {
        let dir = TempDir::new().unwrap();
        let a = write_module(&dir, "Container.js", "import { default as Leaf } from \"./Leaf\";\n");
        let b = write_module(
            &dir,
            "Leaf.js",
            "import { default as Container } from \"./Container\";\n",
        );

        let mut store = StagedFileStore::new();
        let mut walker = ImportGraphWalker::new(&mut store);
        walker.walk_root(Path::new(&a)).unwrap();

        let (registry, cycles) = walker.into_parts();
        assert_eq!(cycles.len(), 1);
        assert_eq!(registry.get(&a).unwrap().imports[&b].binding, "Leaf");
        assert_eq!(registry.get(&b).unwrap().imports[&a].binding, "Container");
        assert_eq!(cycles[0].render(&registry), "Container -> Leaf -> Container");
    }

    #[test]
    fn test_walker_reads_through_overlay() {
        let dir = TempDir::new().unwrap();
        let staged_path = dir.path().join("Virtual.js");

        let mut store = StagedFileStore::new();
        store.write(
            &staged_path,
            "export default class Virtual {}\n",
            lath_store::WriteOptions::tagged("esm-module"),
        );

        let mut walker = ImportGraphWalker::new(&mut store);
        walker.walk_root(&staged_path).unwrap();
        assert_eq!(walker.registry().len(), 1);
    }
}

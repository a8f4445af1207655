//! Heuristic cycle risk analysis.
//!
//! ES-module semantics execute an imported module's top-level body fully
//! before control returns to the importer. Inside a cycle some module
//! necessarily runs while its dependency is half-initialized; whether that
//! breaks depends on *when* the binding is used. Two textual patterns
//! correlate with use-at-evaluation-time:
//!
//! - **Pattern A**: the importer extends `<binding>.prototype` at its top
//!   level (class wiring runs during evaluation).
//! - **Pattern B**: the binding is named in the module's init section — the
//!   span between the emitter's literal `// Init` marker and the following
//!   `// Export` marker — on a line that is not tab-indented (tab
//!   indentation means the usage sits inside a function body and runs
//!   later).
//!
//! These are proxies, not scope analysis: false positives and negatives are
//! possible, and the marker comments are a hard contract with the emitter's
//! output conventions. Diagnostics are informational only — the analysis
//! never fails a run.

use serde::Serialize;

use crate::cycle::Cycle;
use crate::registry::GraphRegistry;

/// Start-of-init-section marker the emitter writes into every module.
pub const INIT_MARKER: &str = "// Init";
/// End-of-init-section marker; absent in modules with no export section.
pub const EXPORT_MARKER: &str = "// Export";

/// Which heuristic matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskKind {
    /// The importer extends the imported binding's prototype.
    PrototypeExtension,
    /// The importer names the binding in its module-body init section.
    ModuleBodyUsage,
}

/// One likely-runtime-error finding for an in-cycle import edge.
#[derive(Debug, Clone, Serialize)]
pub struct CycleDiagnostic {
    /// Which pattern matched.
    pub kind: RiskKind,
    /// Short name of the importing module.
    pub module: String,
    /// Local binding name of the risky import.
    pub binding: String,
    /// The full cycle rendered as `a -> b -> … -> a`.
    pub cycle_path: String,
}

impl CycleDiagnostic {
    /// Human-readable first line of the finding.
    pub fn message(&self) -> String {
        match self.kind {
            RiskKind::PrototypeExtension => format!(
                "possible runtime error: module {} extends {}",
                self.module, self.binding
            ),
            RiskKind::ModuleBodyUsage => format!(
                "possible runtime error: module {} depends on {}",
                self.module, self.binding
            ),
        }
    }
}

/// Run both patterns over every in-cycle edge of every recorded cycle.
///
/// The tool reports everything it finds and keeps going; severity ranking
/// and process exit are the caller's concern.
pub fn analyze_cycles(registry: &GraphRegistry, cycles: &[Cycle]) -> Vec<CycleDiagnostic> {
    let mut diagnostics = Vec::new();

    for cycle in cycles {
        let cycle_path = cycle.render(registry);
        for member in &cycle.members {
            let Some(node) = registry.get(member) else {
                continue;
            };
            for edge in node.imports.values() {
                if !edge.in_cycle || !cycle.contains(&edge.target) {
                    continue;
                }
                if extends_prototype(&node.content, &edge.binding) {
                    diagnostics.push(CycleDiagnostic {
                        kind: RiskKind::PrototypeExtension,
                        module: node.short_name().to_string(),
                        binding: edge.binding.clone(),
                        cycle_path: cycle_path.clone(),
                    });
                }
                if init_section_uses(&node.content, &edge.binding) {
                    diagnostics.push(CycleDiagnostic {
                        kind: RiskKind::ModuleBodyUsage,
                        module: node.short_name().to_string(),
                        binding: edge.binding.clone(),
                        cycle_path: cycle_path.clone(),
                    });
                }
            }
        }
    }

    diagnostics
}

fn extends_prototype(content: &str, binding: &str) -> bool {
    content.contains(&format!("{binding}.prototype"))
}

fn init_section_uses(content: &str, binding: &str) -> bool {
    let Some(start) = content.find(INIT_MARKER) else {
        return false;
    };
    let after = &content[start + INIT_MARKER.len()..];
    let span = match after.find(EXPORT_MARKER) {
        Some(end) => &after[..end],
        None => after,
    };
    span.lines()
        .any(|line| !line.starts_with('\t') && line.contains(binding))
}

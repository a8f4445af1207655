//! External-namespace require rewriting for the CommonJS output.
//!
//! The generated tree requires sibling packages through deep relative paths
//! (`require("./../../tween/easing/Elastic")`). At distribution time those
//! packages are externally provided modules, so each such require collapses
//! onto a property access against the namespace's own top-level module:
//! `require("tween").easing.Elastic`. Separately, the emitter's lazy
//! accessor + `.default` access pattern for those namespaces collapses to a
//! direct call once the target is the external module object.

use regex::Regex;
use tracing::trace;

/// Apply both namespace rewrites for every configured namespace.
pub fn apply_namespace_fixups(content: &str, namespaces: &[String]) -> String {
    let mut out = content.to_string();
    for ns in namespaces {
        out = rewrite_namespace_requires(&out, ns);
        out = collapse_lazy_defaults(&out, ns);
    }
    out
}

/// Rewrite deep relative requires into a namespace into property access on
/// the namespace module.
///
/// The scan repeats until no match remains; each replacement removes the
/// relative marker that the pattern keys on, so it terminates.
pub fn rewrite_namespace_requires(content: &str, ns: &str) -> String {
    let re = Regex::new(&format!(
        r#"require\("\./(?:\.\./)*{}/([^"]+)"\)"#,
        regex::escape(ns)
    ))
    .expect("namespace require pattern");

    let mut out = content.to_string();
    loop {
        let Some((range, replacement)) = re.captures(&out).map(|caps| {
            let whole = caps.get(0).expect("match range");
            let dotted = caps[1].replace('/', ".");
            (whole.range(), format!("require(\"{ns}\").{dotted}"))
        }) else {
            break;
        };
        trace!(to = %replacement, "namespace require rewrite");
        out.replace_range(range, &replacement);
    }
    out
}

/// Collapse the lazy accessor + `.default` pattern for a namespace.
///
/// `tween_easing_Elastic().default` style accesses drop the `.default`
/// once the accessor resolves to the external module's own object, which
/// exposes the symbol directly.
pub fn collapse_lazy_defaults(content: &str, ns: &str) -> String {
    let re = Regex::new(&format!(
        r"({}(?:_\w+)+\(\))\.default",
        regex::escape(ns)
    ))
    .expect("lazy default pattern");

    let mut out = content.to_string();
    loop {
        let replaced = re.replace(&out, "$1").into_owned();
        if replaced == out {
            break;
        }
        out = replaced;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_require_collapses_to_property_access() {
        let out = rewrite_namespace_requires(
            "var Elastic = require(\"./../../tween/easing/Elastic\");",
            "tween",
        );
        assert_eq!(out, "var Elastic = require(\"tween\").easing.Elastic;");
    }

    #[test]
    fn test_every_occurrence_is_rewritten() {
        let content = "var A = require(\"./../tween/A\");\nvar B = require(\"./../tween/deep/B\");\n";
        let out = rewrite_namespace_requires(content, "tween");
        assert_eq!(
            out,
            "var A = require(\"tween\").A;\nvar B = require(\"tween\").deep.B;\n"
        );
    }

    #[test]
    fn test_unrelated_requires_untouched() {
        let content = "var X = require(\"./controls/X\");";
        assert_eq!(rewrite_namespace_requires(content, "tween"), content);
    }

    #[test]
    fn test_lazy_default_collapse() {
        let out = collapse_lazy_defaults(
            "var e = new (tween_easing_Elastic().default)(1.0);",
            "tween",
        );
        assert_eq!(out, "var e = new (tween_easing_Elastic())(1.0);");
    }

    #[test]
    fn test_lazy_default_requires_underscore_segments() {
        // A bare call of the namespace name itself is not the accessor
        // pattern and stays alone.
        let content = "tween().default";
        assert_eq!(collapse_lazy_defaults(content, "tween"), content);
    }

    #[test]
    fn test_fixups_compose_per_namespace() {
        let content = "var S = require(\"./../../stage/display/Sprite\");\n\
                       var done = stage_events_Event().default;\n";
        let out = apply_namespace_fixups(content, &["stage".to_string(), "tween".to_string()]);
        assert_eq!(
            out,
            "var S = require(\"stage\").display.Sprite;\n\
             var done = stage_events_Event();\n"
        );
    }
}

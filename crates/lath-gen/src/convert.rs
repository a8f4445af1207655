//! CommonJS → ES-module conversion.
//!
//! The emitter's CommonJS output is regular enough that conversion is a
//! fixed pipeline of narrow text rewrites, applied in this order:
//!
//! 1. [`rewrite_accessor_requires`] — lazy require accessors become static
//!    imports (collecting the accessor names);
//! 2. [`collapse_accessor_calls`] — call sites of those accessors collapse
//!    to plain identifier references;
//! 3. [`rewrite_default_requires`] — `var X = require("p").default;`
//!    becomes a default import;
//! 4. [`rewrite_object_requires`] — `var X = require("p");` becomes a
//!    namespace import;
//! 5. [`rewrite_exports`] — `module.exports` assignments become `export`
//!    declarations;
//! 6. [`collapse_external_specifiers`] — deep relative specifiers into an
//!    external namespace become bare package specifiers.
//!
//! Step 1 is a deliberate behavior change: the emitter defers requires that
//! participate in import cycles behind accessor functions so CommonJS
//! resolves them lazily, but ES-module tooling forbids expression-level
//! requires, so the bindings become eager static imports. The cycle
//! analyzer exists to flag the cases where that eagerness can bite.

use regex::Regex;
use std::sync::LazyLock;

static ACCESSOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"function (\w+)\(\)\s*\{\s*return require\("([^"]+)"\);?\s*\}"#).unwrap()
});

static DEFAULT_REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^(?:var|let|const)\s+(\w+)\s*=\s*require\("([^"]+)"\)\.default;"#).unwrap()
});

static OBJECT_REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^(?:var|let|const)\s+(\w+)\s*=\s*require\("([^"]+)"\);"#).unwrap()
});

static DEFAULT_EXPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^module\.exports\.default = (.+);$").unwrap());

static NAMED_EXPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^module\.exports\.(\w+) = (\w+);$").unwrap());

/// Run the full conversion pipeline over one module's text.
pub fn convert_cjs_to_esm(source: &str, external_namespaces: &[String]) -> String {
    let (source, accessors) = rewrite_accessor_requires(source);
    let source = collapse_accessor_calls(&source, &accessors);
    let source = rewrite_default_requires(&source);
    let source = rewrite_object_requires(&source);
    let source = rewrite_exports(&source);
    collapse_external_specifiers(&source, external_namespaces)
}

/// Rewrite lazy require accessors into static default imports.
///
/// `function Name() { return require("p"); }` → `import { default as Name }
/// from "p";`. Returns the rewritten text plus the accessor names, which
/// [`collapse_accessor_calls`] needs for the call sites.
pub fn rewrite_accessor_requires(source: &str) -> (String, Vec<String>) {
    let accessors: Vec<String> = ACCESSOR_RE
        .captures_iter(source)
        .map(|c| c[1].to_string())
        .collect();
    let rewritten = ACCESSOR_RE
        .replace_all(source, "import { default as $1 } from \"$2\";")
        .into_owned();
    (rewritten, accessors)
}

/// Collapse accessor call sites to the now-eagerly-bound identifier.
///
/// `Name().default` → `Name` first (the common emitted form), then any
/// remaining `Name()` → `Name`. Only names collected from accessor
/// declarations are touched.
pub fn collapse_accessor_calls(source: &str, accessors: &[String]) -> String {
    let mut out = source.to_string();
    for name in accessors {
        out = out.replace(&format!("{name}().default"), name);
        out = out.replace(&format!("{name}()"), name);
    }
    out
}

/// `var X = require("p").default;` → `import { default as X } from "p";`.
pub fn rewrite_default_requires(source: &str) -> String {
    DEFAULT_REQUIRE_RE
        .replace_all(source, "import { default as $1 } from \"$2\";")
        .into_owned()
}

/// `var X = require("p");` → `import * as X from "p";`.
pub fn rewrite_object_requires(source: &str) -> String {
    OBJECT_REQUIRE_RE
        .replace_all(source, "import * as $1 from \"$2\";")
        .into_owned()
}

/// Rewrite `module.exports` assignment patterns into `export` declarations.
///
/// Two shapes are recognized: `module.exports.default = EXPR;` becomes
/// `export default EXPR;`, and `module.exports.Name = Name;` (same
/// identifier on both sides) becomes `export { Name };`.
pub fn rewrite_exports(source: &str) -> String {
    let out = DEFAULT_EXPORT_RE
        .replace_all(source, "export default $1;")
        .into_owned();
    NAMED_EXPORT_RE
        .replace_all(&out, |caps: &regex::Captures<'_>| {
            if caps[1] == caps[2] {
                format!("export {{ {} }};", &caps[1])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Rewrite deep relative import specifiers that traverse into an external
/// namespace into bare package specifiers.
///
/// Applied only when the namespace marker actually appears in the text;
/// repeated per occurrence until no match remains (the replacement removes
/// the relative marker, so the scan terminates).
pub fn collapse_external_specifiers(source: &str, namespaces: &[String]) -> String {
    let mut out = source.to_string();
    for ns in namespaces {
        if !out.contains(&format!("/{ns}/")) {
            continue;
        }
        let re = Regex::new(&format!(
            r#"from "\./(?:\.\./)*{}/([^"]+)""#,
            regex::escape(ns)
        ))
        .expect("namespace specifier pattern");
        loop {
            let replaced = re.replace(&out, format!("from \"{ns}/$1\"")).into_owned();
            if replaced == out {
                break;
            }
            out = replaced;
        }
    }
    out
}

//! Exclusion rules for source modules with no runtime representation.

use crate::paths::symbol_name;

/// Decide whether a source module should be excluded from generation.
///
/// Two rules:
///
/// - anything under a `macros/` directory is build-time only;
/// - a module whose text declares an abstract wrapper type over an
///   underlying type, named after the file itself (`abstract Name(` or
///   `abstract Name<`), compiles away entirely and has no default export
///   to forward.
pub fn should_skip_source(path: &str, content: &str) -> bool {
    if path.contains("/macros/") {
        return true;
    }
    let name = symbol_name(path);
    content.contains(&format!("abstract {name}("))
        || content.contains(&format!("abstract {name}<"))
}

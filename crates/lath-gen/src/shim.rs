//! Re-export shims.
//!
//! A shim is a one-purpose module that forwards all access to a generated
//! module living deeper in the output tree. Consumers import the shallow
//! stable path; the generated internals behind it can be regenerated
//! freely.

use crate::paths::{dir_name, relative_path, strip_extension};

/// CommonJS re-export shim.
///
/// The require target is extension-stripped and always prefixed with `./`,
/// even when the relative path climbs (`./../../_gen/…`) — the
/// namespace-rewrite pass later keys off exactly that spelling.
pub fn cjs_reexport_shim(shim_path: &str, gen_path: &str) -> String {
    let rel = strip_extension(&relative_path(dir_name(shim_path), gen_path)).to_string();
    format!("module.exports = require(\"./{rel}\");")
}

/// ES-module re-export shim.
///
/// ESM specifiers keep their `.js` extension so the output resolves without
/// tooling-specific extension guessing.
pub fn esm_reexport_shim(shim_path: &str, gen_path: &str) -> String {
    let rel = relative_path(dir_name(shim_path), gen_path);
    format!("export * from \"./{rel}\";\nexport {{ default }} from \"./{rel}\";\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cjs_shim_points_into_generated_tree() {
        let shim = cjs_reexport_shim(
            "/root/lib/ui/controls/Button.js",
            "/root/lib/_gen/ui/controls/Button.js",
        );
        assert_eq!(
            shim,
            "module.exports = require(\"./../../_gen/ui/controls/Button\");"
        );
    }

    #[test]
    fn test_esm_shim_keeps_extension() {
        let shim = esm_reexport_shim(
            "/root/lib-esm/ui/Button.js",
            "/root/lib-esm/_gen/ui/Button.js",
        );
        assert_eq!(
            shim,
            "export * from \"./../_gen/ui/Button.js\";\nexport { default } from \"./../_gen/ui/Button.js\";\n"
        );
    }
}

//! Barrel (index) module assembly.
//!
//! For every directory containing generated modules the pipeline emits one
//! `index` module re-exporting each sibling file's default symbol under the
//! file's base name, and each child package directory as a nested
//! namespace. The caller supplies the member lists (discovery is a driver
//! concern) — sorted, so the emitted barrel is stable regardless of
//! enumeration order.

use crate::paths::{relative_path, strip_extension, symbol_name};

/// How a subdirectory entry resolves at generation time, which decides the
/// ESM re-export form used for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrelTarget {
    /// The target path is a single module file with a default export.
    File,
    /// The target path is a directory holding its own `index` barrel.
    Directory,
}

/// Assemble a CommonJS barrel for `dir`.
///
/// `files` are sibling module paths, `packages` are child package directory
/// paths; both absolute and normalized. Files re-export the module's
/// default; packages hang the subdirectory's own module object off the
/// subdirectory name.
pub fn cjs_barrel(dir: &str, files: &[String], packages: &[String]) -> String {
    let mut out = String::from("module.exports = {\n");
    for file in files {
        let rel = strip_extension(&relative_path(dir, file)).to_string();
        out.push_str(&format!(
            "\t{}: require(\"./{}\").default,\n",
            symbol_name(file),
            rel
        ));
    }
    for package in packages {
        let rel = relative_path(dir, package);
        out.push_str(&format!(
            "\t{}: require(\"./{}\"),\n",
            symbol_name(package),
            rel
        ));
    }
    out.push('}');
    out
}

/// Assemble an ES-module barrel for `dir`.
///
/// File entries alias each module's default export under the file name.
/// Package entries depend on what the target resolved to when the barrel
/// was generated: a single file keeps the default-alias form, a directory
/// is wildcard-re-exported through its own `index` barrel.
pub fn esm_barrel(dir: &str, files: &[String], packages: &[(String, BarrelTarget)]) -> String {
    let mut out = String::new();
    for file in files {
        let rel = relative_path(dir, file);
        out.push_str(&format!(
            "export {{ default as {} }} from \"./{}\";\n",
            symbol_name(file),
            rel
        ));
    }
    for (package, target) in packages {
        let rel = relative_path(dir, package);
        match target {
            BarrelTarget::File => {
                out.push_str(&format!(
                    "export {{ default as {} }} from \"./{}.js\";\n",
                    symbol_name(package),
                    rel
                ));
            }
            BarrelTarget::Directory => {
                out.push_str(&format!("export * from \"./{rel}/index.js\";\n"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cjs_barrel_files_and_packages() {
        let barrel = cjs_barrel(
            "/root/lib/ui",
            &[
                "/root/lib/ui/Button.js".to_string(),
                "/root/lib/ui/Label.js".to_string(),
            ],
            &["/root/lib/ui/layout".to_string()],
        );
        assert_eq!(
            barrel,
            "module.exports = {\n\
             \tButton: require(\"./Button\").default,\n\
             \tLabel: require(\"./Label\").default,\n\
             \tlayout: require(\"./layout\"),\n\
             }"
        );
    }

    #[test]
    fn test_cjs_barrel_empty_directory() {
        assert_eq!(cjs_barrel("/root/lib", &[], &[]), "module.exports = {\n}");
    }

    #[test]
    fn test_esm_barrel_directory_package_is_wildcarded() {
        let barrel = esm_barrel(
            "/root/esm/ui",
            &["/root/esm/ui/Button.js".to_string()],
            &[("/root/esm/ui/layout".to_string(), BarrelTarget::Directory)],
        );
        assert_eq!(
            barrel,
            "export { default as Button } from \"./Button.js\";\n\
             export * from \"./layout/index.js\";\n"
        );
    }

    #[test]
    fn test_esm_barrel_single_file_package_keeps_default_alias() {
        let barrel = esm_barrel(
            "/root/esm/ui",
            &[],
            &[("/root/esm/ui/theme".to_string(), BarrelTarget::File)],
        );
        assert_eq!(barrel, "export { default as theme } from \"./theme.js\";\n");
    }

    #[test]
    fn test_barrel_membership_is_exactly_the_inputs() {
        // Two files and one subdirectory: the barrel re-exports exactly
        // Button, Label, and layout — nothing else.
        let barrel = cjs_barrel(
            "/root/lib/ui",
            &[
                "/root/lib/ui/Button.js".to_string(),
                "/root/lib/ui/Label.js".to_string(),
            ],
            &["/root/lib/ui/layout".to_string()],
        );
        let mut names: Vec<&str> = barrel
            .lines()
            .filter_map(|l| l.trim().split(':').next())
            .filter(|n| !n.starts_with("module.exports") && !n.starts_with('}'))
            .collect();
        names.sort_unstable();
        assert_eq!(names, ["Button", "Label", "layout"]);
    }
}

//! Configuration loading and the resolved directory layout.
//!
//! One small JSON file (`lath.config.json` at the project root, or
//! `--config <path>`) describes where the trees live and which package
//! namespaces are externally provided. CLI flags override file values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::SharedArgs;
use crate::error::ConfigError;

/// Generator configuration, as written in `lath.config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LathConfig {
    /// Source tree directory name, relative to the project root.
    pub src_dir: String,
    /// CommonJS output directory name.
    pub lib_dir: String,
    /// ES-module output directory name.
    pub esm_dir: String,
    /// Name of the nested directory holding canonical generated modules
    /// (the public shim layer sits above it).
    pub gen_dirname: String,
    /// The package directory under `srcDir` that holds the library.
    pub package_root: String,
    /// Extension of the emitter's source modules.
    pub source_ext: String,
    /// Package namespaces resolved to externally provided modules.
    pub external_namespaces: Vec<String>,
}

impl Default for LathConfig {
    fn default() -> Self {
        Self {
            src_dir: "src".to_string(),
            lib_dir: "lib".to_string(),
            esm_dir: "lib-esm".to_string(),
            gen_dirname: "_gen".to_string(),
            package_root: String::new(),
            source_ext: "hx".to_string(),
            external_namespaces: Vec::new(),
        }
    }
}

impl LathConfig {
    /// Load configuration for a phase run: file (if present), then CLI
    /// overrides, then validation.
    pub fn resolve(shared: &SharedArgs) -> Result<Self, ConfigError> {
        let mut config = Self::load(&shared.root, shared.config.as_deref())?;
        config.apply_overrides(shared);
        config.validate()?;
        Ok(config)
    }

    /// Load the config file. An explicitly requested path must exist; the
    /// default location falling back to defaults is fine.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                path.to_path_buf()
            }
            None => {
                let default_path = root.join("lath.config.json");
                if !default_path.exists() {
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::NotFound(path.clone()))?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Apply CLI flag overrides on top of the file values.
    pub fn apply_overrides(&mut self, shared: &SharedArgs) {
        if let Some(package_root) = &shared.package_root {
            self.package_root = package_root.clone();
        }
        if !shared.namespaces.is_empty() {
            self.external_namespaces = shared.namespaces.clone();
        }
    }

    /// Validate field values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.package_root.is_empty() {
            return Err(ConfigError::MissingField {
                field: "packageRoot".to_string(),
                hint: "set packageRoot in lath.config.json or pass --package-root".to_string(),
            });
        }
        if self.gen_dirname.is_empty() || self.gen_dirname.contains('/') {
            return Err(ConfigError::InvalidValue {
                field: "genDirname".to_string(),
                value: self.gen_dirname.clone(),
                hint: "use a single directory name, e.g. \"_gen\"".to_string(),
            });
        }
        if self.source_ext.is_empty() || self.source_ext.starts_with('.') {
            return Err(ConfigError::InvalidValue {
                field: "sourceExt".to_string(),
                value: self.source_ext.clone(),
                hint: "use a bare extension without the dot, e.g. \"hx\"".to_string(),
            });
        }
        for ns in &self.external_namespaces {
            if ns.is_empty() || ns.contains('/') {
                return Err(ConfigError::InvalidValue {
                    field: "externalNamespaces".to_string(),
                    value: ns.clone(),
                    hint: "namespaces are bare package names, e.g. \"tween\"".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// The resolved directory layout a phase works over.
///
/// Source modules live under `src_package_dir`; each output tree has a
/// nested generated layer (`*_gen_dir`) holding canonical modules and a
/// shallower public layer (under `lib_dir`/`esm_dir`) holding shims.
#[derive(Debug, Clone)]
pub struct Layout {
    /// `<root>/<srcDir>`.
    pub src_dir: PathBuf,
    /// `<root>/<srcDir>/<packageRoot>`.
    pub src_package_dir: PathBuf,
    /// `<root>/<libDir>`.
    pub lib_dir: PathBuf,
    /// `<root>/<libDir>/<genDirname>`.
    pub lib_gen_dir: PathBuf,
    /// `<root>/<libDir>/<packageRoot>`.
    pub lib_package_dir: PathBuf,
    /// `<root>/<esmDir>`.
    pub esm_dir: PathBuf,
    /// `<root>/<esmDir>/<genDirname>`.
    pub esm_gen_dir: PathBuf,
    /// `<root>/<esmDir>/<packageRoot>`.
    pub esm_package_dir: PathBuf,
}

impl Layout {
    /// Resolve the configured directory names against the project root.
    pub fn new(root: &Path, config: &LathConfig) -> Self {
        let src_dir = root.join(&config.src_dir);
        let lib_dir = root.join(&config.lib_dir);
        let esm_dir = root.join(&config.esm_dir);
        Self {
            src_package_dir: src_dir.join(&config.package_root),
            src_dir,
            lib_gen_dir: lib_dir.join(&config.gen_dirname),
            lib_package_dir: lib_dir.join(&config.package_root),
            lib_dir,
            esm_gen_dir: esm_dir.join(&config.gen_dirname),
            esm_package_dir: esm_dir.join(&config.package_root),
            esm_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(root: &Path) -> SharedArgs {
        SharedArgs {
            root: root.to_path_buf(),
            config: None,
            dry_run: false,
            json: false,
            package_root: Some("ui".to_string()),
            namespaces: vec![],
        }
    }

    #[test]
    fn test_defaults_without_config_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = LathConfig::resolve(&shared(tmp.path())).unwrap();
        assert_eq!(config.src_dir, "src");
        assert_eq!(config.lib_dir, "lib");
        assert_eq!(config.gen_dirname, "_gen");
        assert_eq!(config.package_root, "ui");
    }

    #[test]
    fn test_config_file_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("lath.config.json"),
            r#"{
                "packageRoot": "widgets",
                "esmDir": "dist-esm",
                "externalNamespaces": ["stage", "tween"]
            }"#,
        )
        .unwrap();

        let mut args = shared(tmp.path());
        args.package_root = None;
        let config = LathConfig::resolve(&args).unwrap();
        assert_eq!(config.package_root, "widgets");
        assert_eq!(config.esm_dir, "dist-esm");
        assert_eq!(config.external_namespaces, ["stage", "tween"]);
    }

    #[test]
    fn test_cli_overrides_win() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("lath.config.json"),
            r#"{ "packageRoot": "widgets" }"#,
        )
        .unwrap();

        let mut args = shared(tmp.path());
        args.namespaces = vec!["tween".to_string()];
        let config = LathConfig::resolve(&args).unwrap();
        assert_eq!(config.package_root, "ui");
        assert_eq!(config.external_namespaces, ["tween"]);
    }

    #[test]
    fn test_missing_package_root_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut args = shared(tmp.path());
        args.package_root = None;
        let err = LathConfig::resolve(&args).unwrap_err();
        assert!(err.to_string().contains("packageRoot"));
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut args = shared(tmp.path());
        args.namespaces = vec!["deep/path".to_string()];
        let err = LathConfig::resolve(&args).unwrap_err();
        assert!(err.to_string().contains("externalNamespaces"));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut args = shared(tmp.path());
        args.config = Some(tmp.path().join("absent.json"));
        let err = LathConfig::resolve(&args).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_layout_resolution() {
        let config = LathConfig {
            package_root: "ui".to_string(),
            ..LathConfig::default()
        };
        let layout = Layout::new(Path::new("/proj"), &config);
        assert_eq!(layout.src_package_dir, Path::new("/proj/src/ui"));
        assert_eq!(layout.lib_gen_dir, Path::new("/proj/lib/_gen"));
        assert_eq!(layout.esm_package_dir, Path::new("/proj/lib-esm/ui"));
    }
}

//! Configuration loader with multi-source merging

use crate::PortcullisConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Git-tracked project config, relative to the project directory.
pub const PROJECT_CONFIG_FILE: &str = "portcullis.toml";

/// Gitignored local overrides, relative to the project directory.
pub const LOCAL_CONFIG_FILE: &str = "portcullis.local.toml";

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,

    /// Replaces the process environment when set.
    env_vars: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "PORTCULLIS".to_string(),
            env_vars: None,
        }
    }

    /// Set the project directory
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix (default: "PORTCULLIS")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Read environment overrides from `vars` instead of the process
    /// environment.
    pub fn with_env_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.env_vars = Some(vars);
        self
    }

    /// Config files [`load`](Self::load) merges, lowest precedence first.
    /// Missing files are skipped at load time.
    pub fn config_files(&self) -> Vec<PathBuf> {
        user_config_file()
            .into_iter()
            .chain([
                self.project_dir.join(PROJECT_CONFIG_FILE),
                self.project_dir.join(LOCAL_CONFIG_FILE),
            ])
            .collect()
    }

    /// Whether the project directory holds a `portcullis.toml`.
    pub fn is_initialized(&self) -> bool {
        self.project_dir.join(PROJECT_CONFIG_FILE).exists()
    }

    /// Load configuration from all sources with proper precedence
    pub fn load(self) -> Result<PortcullisConfig> {
        let mut builder = config::Config::builder();

        // 1. Start with built-in defaults
        let defaults = PortcullisConfig::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2-4. User, project and local files
        for file in self.config_files() {
            if file.exists() {
                builder = builder.add_source(
                    config::File::from(file)
                        .required(false)
                        .format(config::FileFormat::Toml),
                );
            }
        }

        // 5. Environment variables (PORTCULLIS_LOGGING__LEVEL=debug)
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(self.env_vars),
        );

        // Build and deserialize
        let config = builder.build().context("Failed to build configuration")?;

        let mut portcullis_config: PortcullisConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        portcullis_config.validate()?;

        // Resolve relative paths
        portcullis_config.resolve_paths(&self.project_dir);

        Ok(portcullis_config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// `~/.config/portcullis/config.toml` or the platform equivalent; `None`
/// without a home directory.
fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "Portcullis", "portcullis")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigError, LogFormat};
    use portcullis_types::ResourceType;
    use std::fs;
    use tempfile::tempdir;

    fn loader(project_dir: &Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_project_dir(project_dir)
            .with_env_vars(HashMap::new())
    }

    #[test]
    fn test_config_files_in_precedence_order() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        let files = loader(project_dir).config_files();
        let n = files.len();
        assert_eq!(files[n - 2], project_dir.join("portcullis.toml"));
        assert_eq!(files[n - 1], project_dir.join("portcullis.local.toml"));

        // Platform dependent; only present when a home directory is known.
        if n == 3 {
            assert!(files[0].to_string_lossy().contains("portcullis"));
            assert!(files[0].ends_with("config.toml"));
        }
    }

    #[test]
    fn test_is_initialized_tracks_project_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();
        assert!(!loader(project_dir).is_initialized());

        fs::write(project_dir.join(LOCAL_CONFIG_FILE), "").unwrap();
        assert!(!loader(project_dir).is_initialized());

        fs::write(project_dir.join(PROJECT_CONFIG_FILE), "").unwrap();
        assert!(loader(project_dir).is_initialized());
    }

    #[test]
    fn test_load_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = loader(temp_dir.path())
            .load()
            .expect("Failed to load config");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.catalog.resources.len(), 5);
        assert!(!config.catalog.expand_manage);
    }

    #[test]
    fn test_load_project_config() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        let config_content = r#"
[catalog]
expand_manage = true

[[catalog.resources]]
path = "/system/audit"
resource_type = "log"
actions = ["read", "delete"]

[logging]
level = "debug"
format = "json"

[directory]
snapshot = "data/directory.toml"
"#;
        fs::write(project_dir.join("portcullis.toml"), config_content)
            .expect("Failed to write config");

        let config = loader(project_dir).load().expect("Failed to load config");

        assert!(config.catalog.expand_manage);
        assert_eq!(config.catalog.resources.len(), 1);
        assert_eq!(config.catalog.resources[0].resource_type, ResourceType::Log);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(
            config.directory.snapshot,
            project_dir.join("data/directory.toml")
        );
    }

    #[test]
    fn test_local_overrides() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("portcullis.toml"),
            r#"
[logging]
level = "info"
format = "compact"
"#,
        )
        .expect("Failed to write project config");

        fs::write(
            project_dir.join("portcullis.local.toml"),
            r#"
[logging]
level = "trace"
"#,
        )
        .expect("Failed to write local config");

        let config = loader(project_dir).load().expect("Failed to load config");

        // Local config overrides project config key by key
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_env_overrides_files() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("portcullis.toml"),
            "[logging]\nlevel = \"info\"\n",
        )
        .expect("Failed to write project config");

        let vars = HashMap::from([
            ("PORTCULLIS_LOGGING__LEVEL".to_string(), "warn".to_string()),
            ("PORTCULLIS_CATALOG__EXPAND_MANAGE".to_string(), "true".to_string()),
        ]);

        let config = ConfigLoader::new()
            .with_project_dir(project_dir)
            .with_env_vars(vars)
            .load()
            .expect("Failed to load config");

        assert_eq!(config.logging.level, "warn");
        assert!(config.catalog.expand_manage);
    }

    #[test]
    fn test_invalid_catalog_fails_to_load() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("portcullis.toml"),
            r#"
[[catalog.resources]]
path = "/users"
resource_type = "user"

[[catalog.resources]]
path = "users/"
resource_type = "menu"
"#,
        )
        .expect("Failed to write config");

        let err = loader(project_dir).load().unwrap_err();
        let config_err = err.downcast_ref::<ConfigError>().expect("ConfigError");
        assert!(matches!(config_err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_unknown_resource_type_fails_to_load() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("portcullis.toml"),
            r#"
[[catalog.resources]]
path = "/billing"
resource_type = "invoice"
"#,
        )
        .expect("Failed to write config");

        assert!(loader(project_dir).load().is_err());
    }
}

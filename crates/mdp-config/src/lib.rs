//! Configuration management for mdp.
//!
//! Parses `mdp.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `preview.file` (also expands a leading `~`)
//! - `uploads.dir` (also expands a leading `~`)

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override first port to try.
    pub port: Option<u16>,
    /// Override last port to try.
    pub max_port: Option<u16>,
    /// Override markdown file to preview.
    pub file: Option<PathBuf>,
    /// Override upload directory.
    pub upload_dir: Option<PathBuf>,
    /// Override browser opening flag.
    pub open_browser: Option<bool>,
    /// Override live reload enabled flag.
    pub live_reload_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdp.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Preview configuration (paths are relative strings from TOML).
    preview: PreviewConfigRaw,
    /// Upload configuration (paths are relative strings from TOML).
    uploads: UploadsConfigRaw,
    /// Live reload configuration.
    pub live_reload: LiveReloadConfig,

    /// Resolved preview configuration (set after loading).
    #[serde(skip)]
    pub preview_resolved: PreviewConfig,
    /// Resolved upload configuration (set after loading).
    #[serde(skip)]
    pub uploads_resolved: UploadsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// First port to try.
    pub port: u16,
    /// Last port to try (inclusive).
    pub max_port: u16,
    /// Open the preview page in a browser after startup.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 8080,
            max_port: 8180,
            open_browser: true,
        }
    }
}

/// Raw preview configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PreviewConfigRaw {
    file: Option<String>,
}

/// Resolved preview configuration with absolute paths.
#[derive(Debug, Default)]
pub struct PreviewConfig {
    /// Markdown file watched for live reload.
    pub file: PathBuf,
}

/// Raw upload configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct UploadsConfigRaw {
    dir: Option<String>,
}

/// Resolved upload configuration with absolute paths.
#[derive(Debug, Default)]
pub struct UploadsConfig {
    /// Directory where uploaded images are stored.
    pub dir: PathBuf,
}

/// Live reload configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LiveReloadConfig {
    /// Whether live reload is enabled.
    pub enabled: bool,
}

impl Default for LiveReloadConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`preview.file`").
        field: String,
        /// Error message (e.g., "${`NOTES`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdp.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The merged result
    /// is validated once more so that overrides cannot produce an unusable
    /// port range.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(max_port) = settings.max_port {
            self.server.max_port = max_port;
        }
        if let Some(file) = &settings.file {
            self.preview_resolved.file.clone_from(file);
        }
        if let Some(upload_dir) = &settings.upload_dir {
            self.uploads_resolved.dir.clone_from(upload_dir);
        }
        if let Some(open_browser) = settings.open_browser {
            self.server.open_browser = open_browser;
        }
        if let Some(live_reload_enabled) = settings.live_reload_enabled {
            self.live_reload.enabled = live_reload_enabled;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            preview: PreviewConfigRaw::default(),
            uploads: UploadsConfigRaw::default(),
            live_reload: LiveReloadConfig::default(),
            preview_resolved: PreviewConfig {
                file: base.join("content.md"),
            },
            uploads_resolved: UploadsConfig {
                dir: base.join("uploads"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_preview()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        if self.server.max_port < self.server.port {
            return Err(ConfigError::Validation(format!(
                "server.max_port ({}) cannot be lower than server.port ({})",
                self.server.max_port, self.server.port
            )));
        }

        Ok(())
    }

    /// Validate preview configuration.
    fn validate_preview(&self) -> Result<(), ConfigError> {
        if self.preview_resolved.file.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "preview.file cannot be empty".to_owned(),
            ));
        }
        if self.uploads_resolved.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "uploads.dir cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref file) = self.preview.file {
            self.preview.file = Some(expand::expand_path(file, "preview.file")?);
        }

        if let Some(ref dir) = self.uploads.dir {
            self.uploads.dir = Some(expand::expand_path(dir, "uploads.dir")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.preview_resolved = PreviewConfig {
            file: resolve(self.preview.file.as_deref(), "content.md"),
        };
        self.uploads_resolved = UploadsConfig {
            dir: resolve(self.uploads.dir.as_deref(), "uploads"),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_port, 8180);
        assert!(config.server.open_browser);
        assert_eq!(
            config.preview_resolved.file,
            PathBuf::from("/test/content.md")
        );
        assert_eq!(config.uploads_resolved.dir, PathBuf::from("/test/uploads"));
        assert!(config.live_reload.enabled);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_parse_server_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
max_port = 9010
open_browser = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.max_port, 9010);
        assert!(!config.server.open_browser);
    }

    #[test]
    fn test_parse_live_reload_config() {
        let toml = r"
[live_reload]
enabled = false
";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.live_reload.enabled);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[preview]
file = "notes/today.md"

[uploads]
dir = "assets/img"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.preview_resolved.file,
            PathBuf::from("/project/notes/today.md")
        );
        assert_eq!(
            config.uploads_resolved.dir,
            PathBuf::from("/project/assets/img")
        );
    }

    #[test]
    fn test_resolve_paths_defaults() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.preview_resolved.file,
            PathBuf::from("/project/content.md")
        );
        assert_eq!(config.uploads_resolved.dir, PathBuf::from("/project/uploads"));
    }

    #[test]
    fn test_resolve_paths_keeps_absolute() {
        let toml = r#"
[preview]
file = "/elsewhere/README.md"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.preview_resolved.file,
            PathBuf::from("/elsewhere/README.md")
        );
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_validate_rejects_inverted_port_range() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 9000;
        config.server.max_port = 8999;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.max_port"));
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.host cannot be empty"));
    }

    #[test]
    fn test_validate_accepts_single_port_range() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 8080;
        config.server.max_port = 8080;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_cli_settings_port_range() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            port: Some(3000),
            max_port: Some(3005),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_port, 3005);
        assert_eq!(config.server.host, "localhost"); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_paths() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            file: Some(PathBuf::from("notes.md")),
            upload_dir: Some(PathBuf::from("/tmp/img")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.preview_resolved.file, PathBuf::from("notes.md"));
        assert_eq!(config.uploads_resolved.dir, PathBuf::from("/tmp/img"));
    }

    #[test]
    fn test_apply_cli_settings_flags() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            open_browser: Some(false),
            live_reload_enabled: Some(false),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert!(!config.server.open_browser);
        assert!(!config.live_reload.enabled);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, before.server.host);
        assert_eq!(config.server.port, before.server.port);
        assert_eq!(config.preview_resolved.file, before.preview_resolved.file);
    }

    #[test]
    fn test_expand_env_vars_server_host() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MDP_TEST_HOST", "0.0.0.0");
        }

        let toml = r#"
[server]
host = "${MDP_TEST_HOST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.server.host, "0.0.0.0");

        unsafe {
            std::env::remove_var("MDP_TEST_HOST");
        }
    }

    #[test]
    fn test_expand_env_vars_preview_file_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDP_TEST_NOTES");
        }

        let toml = r#"
[preview]
file = "${MDP_TEST_NOTES:-notes.md}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.preview_resolved.file,
            PathBuf::from("/project/notes.md")
        );
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/mdp.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("mdp.toml");
        std::fs::write(
            &config_path,
            "[server]\nport = 4000\nmax_port = 4001\n\n[preview]\nfile = \"doc.md\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&config_path), None).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.preview_resolved.file, temp_dir.path().join("doc.md"));
        assert_eq!(config.uploads_resolved.dir, temp_dir.path().join("uploads"));
        assert_eq!(config.config_path, Some(config_path));
    }

    #[test]
    fn test_load_invalid_file_reports_validation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("mdp.toml");
        std::fs::write(&config_path, "[server]\nport = 9000\nmax_port = 10\n").unwrap();

        let err = Config::load(Some(&config_path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_cli_settings_are_validated() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("mdp.toml");
        std::fs::write(&config_path, "").unwrap();
        let overrides = CliSettings {
            port: Some(9000),
            ..Default::default()
        };

        let err = Config::load(Some(&config_path), Some(&overrides)).unwrap_err();
        assert!(err.to_string().contains("server.max_port"));
    }

    #[test]
    fn test_load_malformed_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("mdp.toml");
        std::fs::write(&config_path, "[server\nport = 1").unwrap();

        let err = Config::load(Some(&config_path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}

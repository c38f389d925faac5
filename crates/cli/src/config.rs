use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::CliArgs;

/// CLI configuration loaded from TOML file.
///
/// Relative paths are resolved against the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Project root (default: current directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<PathBuf>,

    /// Control baseline level used by `--controls`
    #[serde(default = "default_control_level")]
    pub control_level: String,
}

fn default_control_level() -> String {
    "low".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            root: None,
            rules_dir: None,
            custom_dir: None,
            includes_dir: None,
            build_dir: None,
            control_level: default_control_level(),
        }
    }
}

/// Directories and files the generator reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub rules_dir: PathBuf,
    pub custom_dir: PathBuf,
    pub includes_dir: PathBuf,
    pub build_dir: PathBuf,
    pub version_file: PathBuf,
}

impl ProjectPaths {
    pub fn project_data(&self) -> PathBuf {
        self.includes_dir.join("mscp-data.yaml")
    }

    pub fn control_baselines(&self) -> PathBuf {
        self.includes_dir.join("800-53_baselines.yaml")
    }
}

impl CliConfig {
    /// Return the default config directory path: ~/.config/hardening-cli/
    pub fn default_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("could not determine user config directory")?
            .join("hardening-cli");
        Ok(config_dir)
    }

    /// Return the default config file path.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Load config from the given path, or the default path.
    /// Returns default config if the file does not exist.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            debug!(?config_path, "Loading config");
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read config: {}", config_path.display()))?;
            let config: Self = toml::from_str(&content)
                .with_context(|| format!("failed to parse config: {}", config_path.display()))?;
            Ok(config)
        } else {
            debug!(?config_path, "Config file not found, using defaults");
            let config = Self::default();
            // Create directory and write default config
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            let toml_str =
                toml::to_string_pretty(&config).context("failed to serialize default config")?;
            std::fs::write(&config_path, toml_str).ok();
            Ok(config)
        }
    }

    /// Resolve project paths.
    /// Priority: CLI flag or environment (both arrive through `args`) > config file > defaults.
    pub fn resolve_paths(&self, args: &CliArgs) -> Result<ProjectPaths> {
        let root = match args.root.as_ref().or(self.root.as_ref()) {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("could not determine current directory")?,
        };

        let pick = |cli: &Option<PathBuf>, file: &Option<PathBuf>, default: &str| {
            cli.as_ref()
                .or(file.as_ref())
                .map(|p| under(&root, p))
                .unwrap_or_else(|| root.join(default))
        };

        Ok(ProjectPaths {
            rules_dir: pick(&args.rules_dir, &self.rules_dir, "rules"),
            custom_dir: pick(&args.custom_dir, &self.custom_dir, "custom/rules"),
            includes_dir: pick(&args.includes_dir, &self.includes_dir, "includes"),
            build_dir: pick(&args.build_dir, &self.build_dir, "build/baselines"),
            version_file: root.join("VERSION.yaml"),
            root,
        })
    }

    /// Resolve the control level.
    /// Priority: cli_override > config file.
    pub fn resolve_control_level(&self, cli_override: Option<&str>) -> String {
        cli_override
            .map(str::to_string)
            .unwrap_or_else(|| self.control_level.clone())
    }
}

fn under(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/amisite/amisite.toml`
//! 3. Local config: `<data_dir>/.amisite.toml`
//! 4. Environment variables: `AMISITE_*` prefix, `__` between sections
//! 5. `--data-dir` on the command line

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::DeletePolicy;

/// Menu behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MenuConfig {
    /// What `menu remove` does with children unless told otherwise
    pub delete_policy: DeletePolicy,
    /// Whether `menu tree` hides drafts without `--published`
    pub published_only_default: bool,
}

/// Site identity shown by the rendering layer and the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrandSettings {
    pub site_name: String,
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: String,
}

impl Default for BrandSettings {
    fn default() -> Self {
        Self {
            site_name: "AMI".into(),
            tagline: Some("Audit Mutu Internal".into()),
            logo_url: None,
            primary_color: "#1e40af".into(),
        }
    }
}

/// Raw settings for intermediate parsing (None = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub menu: RawMenuConfig,
    pub brand: RawBrandSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawMenuConfig {
    pub delete_policy: Option<DeletePolicy>,
    pub published_only_default: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawBrandSettings {
    pub site_name: Option<String>,
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
}

/// Unified configuration for amisite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding `menu.json` and `pages/` (default: ~/.amisite)
    pub data_dir: PathBuf,
    pub menu: MenuConfig,
    pub brand: BrandSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            menu: MenuConfig::default(),
            brand: BrandSettings::default(),
        }
    }
}

/// Get the default data directory (~/.amisite).
fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".amisite"))
        .unwrap_or_else(|| PathBuf::from("~/.amisite"))
}

/// Get the XDG config directory for amisite.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "amisite").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("amisite.toml"))
}

/// Get the path to the local config file in a data directory.
pub fn local_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".amisite.toml")
}

/// Expand `~`, `$VAR` and `${VAR}`; unresolvable input is kept as is.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Directory holding one JSON document per page.
    pub fn pages_dir(&self) -> PathBuf {
        self.data_dir.join("pages")
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let brand = &overlay.brand;
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            menu: MenuConfig {
                delete_policy: overlay
                    .menu
                    .delete_policy
                    .unwrap_or(self.menu.delete_policy),
                published_only_default: overlay
                    .menu
                    .published_only_default
                    .unwrap_or(self.menu.published_only_default),
            },
            brand: BrandSettings {
                site_name: brand
                    .site_name
                    .clone()
                    .unwrap_or_else(|| self.brand.site_name.clone()),
                tagline: brand.tagline.clone().or_else(|| self.brand.tagline.clone()),
                logo_url: brand
                    .logo_url
                    .clone()
                    .or_else(|| self.brand.logo_url.clone()),
                primary_color: brand
                    .primary_color
                    .clone()
                    .unwrap_or_else(|| self.brand.primary_color.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `data_dir` - Data directory from the command line; also where the
    ///   local config is looked up
    pub fn load(data_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), data_dir)
    }

    /// Layered load with an explicit global config location.
    pub fn load_from(
        global_path: Option<&Path>,
        data_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config inside the data directory
        let local_dir = data_dir
            .map(expand_path)
            .unwrap_or_else(|| expand_path(&current.data_dir));
        let local_path = local_config_path(&local_dir);
        if local_path.exists() {
            debug!("local config: {}", local_path.display());
            let raw = load_raw_settings(&local_path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        // 5. Command line
        if let Some(dir) = data_dir {
            current.data_dir = dir.to_path_buf();
        }

        current.data_dir = expand_path(&current.data_dir);
        Ok(current)
    }

    /// Apply AMISITE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("AMISITE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("menu.delete_policy") {
            settings.menu.delete_policy = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("AMISITE_MENU__DELETE_POLICY: {e}"),
            })?;
        }
        if let Ok(val) = config.get_bool("menu.published_only_default") {
            settings.menu.published_only_default = val;
        }
        if let Ok(val) = config.get_string("brand.site_name") {
            settings.brand.site_name = val;
        }
        if let Ok(val) = config.get_string("brand.tagline") {
            settings.brand.tagline = Some(val);
        }
        if let Ok(val) = config.get_string("brand.logo_url") {
            settings.brand.logo_url = Some(val);
        }
        if let Ok(val) = config.get_string("brand.primary_color") {
            settings.brand.primary_color = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r##"# amisite configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/amisite/amisite.toml
#   Local:  <data_dir>/.amisite.toml
#   Env:    AMISITE_* environment variables, e.g. AMISITE_MENU__DELETE_POLICY=cascade

# Directory holding menu.json and pages/<id>.json
# data_dir = "~/.amisite"

[menu]
# What happens to the children of a removed node:
#   "reparent": children take the removed node's place
#   "cascade":  the whole subtree is removed
# delete_policy = "reparent"

# Hide unpublished nodes in `menu tree` by default
# published_only_default = false

[brand]
# site_name = "AMI"
# tagline = "Audit Mutu Internal"
# logo_url = "/media/logo.png"
# primary_color = "#1e40af"
"##
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

static BRAND: OnceCell<BrandSettings> = OnceCell::new();

/// Install the process-wide brand settings; the first call wins.
pub fn init_brand(brand: BrandSettings) -> &'static BrandSettings {
    BRAND.get_or_init(|| brand)
}

/// Process-wide brand settings, defaults if none were installed.
pub fn brand() -> &'static BrandSettings {
    BRAND.get_or_init(BrandSettings::default)
}

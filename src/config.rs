//! TOML configuration.
//!
//! ```toml
//! [infrastructure]
//! managed = true
//! sphinx_templates = ["standard", "knowledge"]
//!
//! [server]
//! bind = "127.0.0.1:7340"
//!
//! [theme]
//! primary = "#0291db"
//!
//! [[record_types]]
//! key = "article"
//! api_type_key = "article"
//! # ... all ten attributes
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use vanilla_search_core::header::{Color, GlobalVariables};
use vanilla_search_core::record_type::{InfrastructureCapabilities, RecordTypeSpec};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub infrastructure: InfrastructureConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default = "default_include_builtin")]
    pub include_builtin: bool,
    #[serde(default)]
    pub record_types: Vec<RecordTypeSpec>,
}

fn default_include_builtin() -> bool {
    true
}

/// Deployment capabilities, answered from configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct InfrastructureConfig {
    /// Running under managed infrastructure.
    #[serde(default)]
    pub managed: bool,
    /// Sphinx templates enabled on this deployment. Absent means all.
    #[serde(default)]
    pub sphinx_templates: Option<Vec<String>>,
}

impl InfrastructureCapabilities for InfrastructureConfig {
    fn managed_infrastructure(&self) -> bool {
        self.managed
    }

    fn enabled_templates(&self) -> Option<&[String]> {
        self.sphinx_templates.as_deref()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

/// Design-token overrides; unset entries keep the stock theme.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ThemeConfig {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub primary: Option<Color>,
    pub form_element_height: Option<f64>,
    pub one_column_breakpoint: Option<u32>,
}

impl ThemeConfig {
    pub fn global_variables(&self) -> GlobalVariables {
        let mut globals = GlobalVariables::default();
        if let Some(fg) = self.fg {
            globals.main_colors.fg = fg;
        }
        if let Some(bg) = self.bg {
            globals.main_colors.bg = bg;
        }
        if let Some(primary) = self.primary {
            globals.main_colors.primary = primary;
        }
        if let Some(height) = self.form_element_height {
            globals.form_element_height = height;
        }
        if let Some(bp) = self.one_column_breakpoint {
            globals.one_column_breakpoint = bp;
        }
        globals
    }
}

impl Config {
    /// Built-in record types only, self-hosted, default theme.
    pub fn minimal() -> Self {
        Self {
            include_builtin: true,
            ..Default::default()
        }
    }
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    if let Some(height) = config.theme.form_element_height {
        if height <= 0.0 {
            anyhow::bail!("theme.form_element_height must be > 0");
        }
    }

    if config.theme.one_column_breakpoint == Some(0) {
        anyhow::bail!("theme.one_column_breakpoint must be > 0");
    }

    if let Some(templates) = &config.infrastructure.sphinx_templates {
        if templates.iter().any(|t| t.trim().is_empty()) {
            anyhow::bail!("infrastructure.sphinx_templates must not contain empty names");
        }
    }

    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

// ============================================================================
// Config File
// ============================================================================

/// Optional defaults loaded from ~/.config/vargo/config.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Organization base URL
    #[serde(default)]
    pub org_url: Option<String>,

    /// Default project
    #[serde(default)]
    pub project: Option<String>,

    /// Personal access token
    #[serde(default)]
    pub token: Option<String>,
}

impl FileConfig {
    /// Load the config file, or defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Self::load_from(&home.join(".config").join("vargo").join("config.toml"))
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;
        toml::from_str(&content).context("Invalid TOML format in vargo config")
    }
}

// ============================================================================
// Resolved Settings
// ============================================================================

/// Fully resolved configuration for one run.
///
/// Flags and environment variables (already merged by clap) take precedence
/// over the config file. Nothing here is mutated after resolution.
#[derive(Debug)]
pub struct Settings {
    pub org_url: String,
    pub project: String,
    pub token: String,
}

impl Settings {
    /// Merge CLI-provided values over the config file.
    pub fn resolve(
        org_url: Option<String>,
        project: Option<String>,
        token: Option<String>,
        file: FileConfig,
    ) -> Result<Self> {
        let org_url = org_url
            .or(file.org_url)
            .context("Organization URL not set. Use --org-url, VARGO_ORG_URL, or the config file.")?;
        let project = project
            .or(file.project)
            .context("Project not set. Use --project, VARGO_PROJECT, or the config file.")?;
        let token = token
            .or(file.token)
            .context("Token not set. Use --token, VARGO_TOKEN, or the config file.")?;

        Ok(Self {
            org_url: org_url.trim_end_matches('/').to_string(),
            project,
            token,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

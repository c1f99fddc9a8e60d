use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Directory name under the platform config / data roots
const APP_DIR: &str = "neoseq";

/// Files whose presence in the working directory makes it the config dir
pub const LOCAL_FILES: [&str; 3] = ["neoseq.json", "neoseq_style.json", "neoseq_document.json"];

/// Configuration for overriding default application paths
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    /// Custom config directory (from CLI or ENV)
    pub config_dir: Option<PathBuf>,
}

impl PathConfig {
    /// Priority: CLI args → ENV var (NEOSEQ_CONFIG_DIR) → None (use defaults)
    pub fn from_env_and_cli(cli_dir: Option<PathBuf>) -> Self {
        let config_dir = cli_dir.or_else(|| std::env::var("NEOSEQ_CONFIG_DIR").ok().map(PathBuf::from));
        Self { config_dir }
    }
}

/// Path to a configuration file (window state, style).
///
/// Priority:
/// 1. CLI --config-dir argument
/// 2. NEOSEQ_CONFIG_DIR environment variable
/// 3. Current directory if it holds any of `LOCAL_FILES`
/// 4. Platform config directory from dirs-next, e.g. ~/.config/neoseq
pub fn config_file(name: &str, config: &PathConfig) -> PathBuf {
    resolve_dir(config, dirs_next::config_dir()).join(name)
}

/// Path to a data file (documents). Same priority as `config_file`, with the
/// platform data directory (~/.local/share/neoseq) as the last resort.
pub fn data_file(name: &str, config: &PathConfig) -> PathBuf {
    resolve_dir(config, dirs_next::data_dir()).join(name)
}

/// Create the config and data directories if missing
pub fn ensure_dirs(config: &PathConfig) -> Result<()> {
    let config_dir = resolve_dir(config, dirs_next::config_dir());
    let data_dir = resolve_dir(config, dirs_next::data_dir());

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;
    if data_dir != config_dir {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    }
    Ok(())
}

fn has_local_config_files(dir: &Path) -> bool {
    LOCAL_FILES.iter().any(|f| dir.join(f).exists())
}

fn resolve_dir(config: &PathConfig, platform: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = &config.config_dir {
        return dir.clone();
    }
    if let Ok(current_dir) = std::env::current_dir()
        && has_local_config_files(&current_dir)
    {
        return current_dir;
    }
    platform.map_or_else(|| PathBuf::from("."), |dir| dir.join(APP_DIR))
}

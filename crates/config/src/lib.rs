pub mod cli;
pub mod schema;

pub use cli::Cli;
pub use schema::{
    Alignment, BarConfig, Geometry, GlobalConfig, LayoutConfig, Margins, Position, ThemeConfig,
    DEFAULT_FONTS, MAX_EXTENT,
};

use limebar_core::{BarError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `BarConfig::default()` if
/// the file doesn't exist so the bar always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<BarConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(BarConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| BarError::Config(format!("cannot read '{}': {e}", path.display())))?;

    toml::from_str::<BarConfig>(&raw)
        .map(BarConfig::normalized)
        .map_err(|e| BarError::Config(format!("TOML parse error: {e}")))
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("limebar").join("limebar.toml")
}

/// Resolve the final configuration: file first (the `--config` path or the
/// default one), then command-line flags on top.
pub fn resolve(cli: Cli) -> Result<BarConfig> {
    let path = cli.config.clone().unwrap_or_else(default_path);
    let file = load(&path)?;
    Ok(cli.apply(file))
}

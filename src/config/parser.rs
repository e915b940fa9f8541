use super::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn parse_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    let settings: Settings = toml::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

    Ok(settings)
}

pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(settings)
        .context("Failed to serialize settings")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

    Ok(())
}

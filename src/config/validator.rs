use super::defaults::{LOG_FORMATS, LOG_LEVELS};
use super::Settings;
use crate::nginx::layout::FPM_CONF_DIR;
use crate::nginx::Template;
use anyhow::Result;

/// Entries with this prefix make a settings file unusable
pub const FATAL: &str = "[X]";

pub fn validate_settings(settings: &Settings) -> Result<Vec<String>> {
    let mut warnings = Vec::new();
    let generator = &settings.generator;

    if !generator.working_dir.is_absolute() {
        warnings.push(format!(
            "[!] Working directory {} is relative. It will be resolved against the current directory",
            generator.working_dir.display()
        ));
    }

    if !generator.working_dir.is_dir() {
        warnings.push(format!(
            "[X] Working directory not found: {}",
            generator.working_dir.display()
        ));
    } else if !generator.working_dir.join(FPM_CONF_DIR).is_dir() {
        warnings.push(format!(
            "[X] {} not found in {}. The FPM configuration cannot be written",
            FPM_CONF_DIR,
            generator.working_dir.display()
        ));
    }

    if let Some(ref layer_path) = generator.layer_path {
        if !layer_path.is_dir() {
            warnings.push(format!(
                "[X] Layer directory not found: {}",
                layer_path.display()
            ));
        }
    }

    if let Some(ref templates_dir) = generator.templates_dir {
        if !templates_dir.is_dir() {
            warnings.push(format!(
                "[X] Templates directory not found: {}",
                templates_dir.display()
            ));
        } else {
            for template in [Template::Nginx, Template::Fpm] {
                let path = templates_dir.join(template.file_name());
                if !path.is_file() {
                    warnings.push(format!("[X] Template not found: {}", path.display()));
                }
            }
        }
    }

    if !LOG_LEVELS.contains(&settings.logging.level.as_str()) {
        warnings.push(format!(
            "[X] Invalid log level: {}. Must be one of: {}",
            settings.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if !LOG_FORMATS.contains(&settings.logging.format.as_str()) {
        warnings.push(format!(
            "[X] Invalid log format: {}. Must be one of: {}",
            settings.logging.format,
            LOG_FORMATS.join(", ")
        ));
    }

    Ok(warnings)
}

pub fn has_fatal(warnings: &[String]) -> bool {
    warnings.iter().any(|w| w.starts_with(FATAL))
}

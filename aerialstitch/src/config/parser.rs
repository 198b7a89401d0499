//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::MAX_PARALLEL_DOWNLOADS;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::overlay::ResampleFilter;
use crate::provider::QUADKEY_PLACEHOLDER;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [provider] section
    if let Some(section) = ini.section(Some("provider")) {
        if let Some(v) = section.get("url_template") {
            let v = v.trim();
            if !v.contains(QUADKEY_PLACEHOLDER) {
                return Err(invalid(
                    "provider",
                    "url_template",
                    v,
                    "must contain the {quadkey} placeholder",
                ));
            }
            config.provider.url_template = v.to_string();
        }
    }

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("max_concurrent") {
            let n: usize = parse_number("download", "max_concurrent", v)?;
            if n == 0 || n > MAX_PARALLEL_DOWNLOADS {
                return Err(invalid(
                    "download",
                    "max_concurrent",
                    v,
                    &format!("must be between 1 and {}", MAX_PARALLEL_DOWNLOADS),
                ));
            }
            config.download.max_concurrent = n;
        }
        if let Some(v) = section.get("max_retries") {
            config.download.max_retries = parse_number("download", "max_retries", v)?;
        }
        if let Some(v) = section.get("timeout") {
            let secs: u64 = parse_number("download", "timeout", v)?;
            if secs == 0 {
                return Err(invalid("download", "timeout", v, "must be at least 1 second"));
            }
            config.download.timeout = secs;
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("shrink_factor") {
            let factor: u32 = parse_number("output", "shrink_factor", v)?;
            if factor == 0 {
                return Err(invalid("output", "shrink_factor", v, "must be at least 1"));
            }
            config.output.shrink_factor = factor;
        }
        if let Some(v) = section.get("filter") {
            config.output.filter = ResampleFilter::from_str(v.trim())
                .map_err(|reason| invalid("output", "filter", v, &reason))?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a non-negative integer"))
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

//! # Settings Module
//!
//! Display and runtime settings shared by every model: how decimal
//! approximations accompany exact results, how many significant digits
//! they carry, plot styling and log verbosity. Settings come from an
//! optional TOML file; absent keys fall back to defaults.

use log::info;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// How decimal approximations are shown next to exact results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum Approx {
    /// exact values only
    Hide,
    /// decimal values only
    Replace,
    /// exact value, then `\approx` and the decimal
    Append,
}

/// Plot background and accent styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum PlotTheme {
    Light,
    Dark,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("setting '{key}' has invalid value '{value}'")]
    InvalidValue { key: String, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub approx: Approx,
    /// significant digits for decimal approximations
    pub precision: usize,
    pub theme: PlotTheme,
    /// simplelog level name, "off" or "none" to disable
    pub loglevel: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            approx: Approx::Hide,
            precision: 15,
            theme: PlotTheme::Light,
            loglevel: Some("info".to_owned()),
        }
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "approx: {}, precision: {}, theme: {}, loglevel: {}",
            self.approx,
            self.precision,
            self.theme,
            self.loglevel.as_deref().unwrap_or("off")
        )
    }
}

impl Settings {
    /// Parses settings from TOML text. Unknown keys are ignored so config
    /// files stay forward compatible.
    pub fn from_toml_str(text: &str) -> Result<Settings, SettingsError> {
        let table: toml::Table = text.parse()?;
        let mut settings = Settings::default();

        if let Some(value) = table.get("approx").and_then(|v| v.as_str()) {
            settings.approx =
                Approx::from_str(value).map_err(|_| SettingsError::InvalidValue {
                    key: "approx".to_owned(),
                    value: value.to_owned(),
                })?;
        }
        if let Some(value) = table.get("precision").and_then(|v| v.as_integer()) {
            if value < 1 || value > 17 {
                return Err(SettingsError::InvalidValue {
                    key: "precision".to_owned(),
                    value: value.to_string(),
                });
            }
            settings.precision = value as usize;
        }
        if let Some(value) = table.get("theme").and_then(|v| v.as_str()) {
            settings.theme =
                PlotTheme::from_str(value).map_err(|_| SettingsError::InvalidValue {
                    key: "theme".to_owned(),
                    value: value.to_owned(),
                })?;
        }
        if let Some(value) = table.get("loglevel").and_then(|v| v.as_str()) {
            settings.loglevel = Some(value.to_owned());
        }
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Settings, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        let settings = Settings::from_toml_str(&text)?;
        info!("loaded settings: {}", settings);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.approx, Approx::Hide);
        assert_eq!(settings.precision, 15);
        assert_eq!(settings.theme, PlotTheme::Light);
    }

    #[test]
    fn parses_partial_toml_with_fallbacks() {
        let settings = Settings::from_toml_str("approx = \"Replace\"\nprecision = 4\n")
            .expect("valid settings");
        assert_eq!(settings.approx, Approx::Replace);
        assert_eq!(settings.precision, 4);
        assert_eq!(settings.theme, PlotTheme::Light);
    }

    #[test]
    fn rejects_unknown_approx_mode() {
        let result = Settings::from_toml_str("approx = \"Sometimes\"\n");
        assert!(matches!(
            result,
            Err(SettingsError::InvalidValue { ref key, .. }) if key == "approx"
        ));
    }

    #[test]
    fn rejects_out_of_range_precision() {
        assert!(Settings::from_toml_str("precision = 0\n").is_err());
        assert!(Settings::from_toml_str("precision = 40\n").is_err());
    }

    #[test]
    fn reads_settings_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "theme = \"Dark\"\nloglevel = \"debug\"").expect("write");
        let settings = Settings::from_file(file.path()).expect("read settings");
        assert_eq!(settings.theme, PlotTheme::Dark);
        assert_eq!(settings.loglevel.as_deref(), Some("debug"));
    }
}

//! Configuration management for countermax
//!
//! Config stored at: ~/.config/countermax/config.json

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use countermax_domain::model::lenient::parse_time;
use countermax_types::{ConfigError, OutputFormat, Result};

/// Overrides the data root for one process
pub const DATA_ROOT_ENV: &str = "COUNTERMAX_DATA_ROOT";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Folder holding the configuration tree and task files
    #[serde(default)]
    pub data_root: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Direction pool size for new sites
    #[serde(default = "default_direction_count")]
    pub default_direction_count: u32,

    /// Slot length used by `time generate` when none is given
    #[serde(default = "default_step_minutes")]
    pub default_step_minutes: u32,

    #[serde(default = "default_start")]
    pub default_start: String,

    #[serde(default = "default_end")]
    pub default_end: String,

    /// Operator written into task files when none is given
    #[serde(default)]
    pub operator_id: Option<String>,

    /// Refresh hotkeys_db.json on every save
    #[serde(default = "default_true")]
    pub export_hotkeys_db: bool,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_direction_count() -> u32 {
    4
}

fn default_step_minutes() -> u32 {
    15
}

fn default_start() -> String {
    "07:00".to_string()
}

fn default_end() -> String {
    "09:00".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: None,
            output_format: default_output_format(),
            default_direction_count: default_direction_count(),
            default_step_minutes: default_step_minutes(),
            default_start: default_start(),
            default_end: default_end(),
            operator_id: None,
            export_hotkeys_db: true,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("countermax");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Data root: `COUNTERMAX_DATA_ROOT` if it names a folder, then the
    /// configured path, then `<data dir>/countermax`
    pub fn data_root(&self) -> Result<PathBuf> {
        let env = std::env::var_os(DATA_ROOT_ENV).map(PathBuf::from);
        resolve_data_root(env, self.data_root.as_deref())
    }

    pub fn start_time(&self) -> Result<NaiveTime> {
        parse_config_time("default_start", &self.default_start)
    }

    pub fn end_time(&self) -> Result<NaiveTime> {
        parse_config_time("default_end", &self.default_end)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn parse_config_time(field: &str, raw: &str) -> Result<NaiveTime> {
    parse_time(raw).ok_or_else(|| {
        ConfigError::InvalidValue(format!("{} '{}' is not HH:MM", field, raw)).into()
    })
}

pub fn resolve_data_root(env: Option<PathBuf>, configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = env.filter(|d| d.is_dir()) {
        return Ok(dir);
    }
    if let Some(dir) = configured {
        return Ok(dir.to_path_buf());
    }
    let data_dir = dirs::data_dir()
        .ok_or(ConfigError::NotFound)?
        .join("countermax");
    Ok(data_dir)
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Countermax Configuration")?;
        writeln!(f, "========================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Data root:         {}",
            self.data_root()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:     {}", self.output_format)?;
        writeln!(f, "Directions:        {}", self.default_direction_count)?;
        writeln!(
            f,
            "Time slots:        {}~{} every {} min",
            self.default_start, self.default_end, self.default_step_minutes
        )?;
        writeln!(
            f,
            "Operator:          {}",
            self.operator_id.as_deref().unwrap_or("(none)")
        )?;
        writeln!(f, "Export hotkeys:    {}", self.export_hotkeys_db)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:       {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countermax_types::Error;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: Config = serde_json::from_str(r#"{"output_format": "json"}"#).unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.default_direction_count, 4);
        assert_eq!(config.default_step_minutes, 15);
        assert!(config.export_hotkeys_db);
        assert_eq!(config.start_time().unwrap(), NaiveTime::from_hms_opt(7, 0, 0).unwrap());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        assert_eq!(Config::load_from(&path).unwrap().default_end, "09:00");

        let config = Config {
            operator_id: Some("kim".into()),
            default_step_minutes: 10,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.operator_id.as_deref(), Some("kim"));
        assert_eq!(loaded.default_step_minutes, 10);
    }

    #[test]
    fn test_bad_time_is_config_error() {
        let config = Config {
            default_start: "7시".into(),
            ..Config::default()
        };
        assert!(matches!(config.start_time(), Err(Error::Config(_))));
    }

    #[test]
    fn test_data_root_precedence() {
        let env = tempfile::tempdir().unwrap();
        let configured = Path::new("/srv/countermax");
        assert_eq!(
            resolve_data_root(Some(env.path().to_path_buf()), Some(configured)).unwrap(),
            env.path()
        );
        // env pointing nowhere is ignored
        assert_eq!(
            resolve_data_root(Some(env.path().join("missing")), Some(configured)).unwrap(),
            configured
        );
        assert_eq!(resolve_data_root(None, Some(configured)).unwrap(), configured);
    }
}

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::errors::{PriceBaseError, Result};

pub const CONFIG_FILE_NAME: &str = "price-base.toml";
pub const CONFIG_PATH_ENV: &str = "PRICE_BASE_CONFIG";

/// Session-wide settings. Everything has a default, so a missing config file
/// is not an error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Establishment code stamped on every row of the base table.
    pub establishment_code: String,
    /// Sheet rows above the catalog header row.
    pub catalog_header_offset: usize,
    pub export_sheet_name: String,
    pub export_column_width: f64,
    /// Prefix CSV exports with a UTF-8 BOM so spreadsheet apps detect the encoding.
    pub csv_bom: bool,
    pub export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            establishment_code: "0021870".to_string(),
            catalog_header_offset: 6,
            export_sheet_name: "Base".to_string(),
            export_column_width: 15.0,
            csv_bom: true,
            export_dir: None,
        }
    }
}

impl AppConfig {
    fn validate(self) -> Result<Self> {
        let code = self.establishment_code.trim();
        if code.is_empty() || code.len() > 7 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(PriceBaseError::Config(format!(
                "establishment_code debe ser numérico de hasta 7 dígitos: {:?}",
                self.establishment_code
            )));
        }
        if self.export_sheet_name.trim().is_empty() {
            return Err(PriceBaseError::Config(
                "export_sheet_name no puede estar vacío".to_string(),
            ));
        }
        Ok(Self {
            establishment_code: format!("{code:0>7}"),
            ..self
        })
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents)
        .map_err(|err| PriceBaseError::Config(format!("TOML inválido: {err}")))?;
    config.validate()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    tracing::debug!("loading configuration from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|err| {
        PriceBaseError::Config(format!("no se pudo leer {}: {err}", path.display()))
    })?;
    parse_config(&contents)
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from("com", "farmacia", "price-base")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Reads `.env`, then the config file if one exists. Falls back to defaults
/// when there is nothing to read.
pub fn load_app_configuration() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_config(&path)?;
            tracing::info!("configuration loaded from {}", path.display());
            Ok(config)
        }
        _ => {
            tracing::info!("no configuration file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

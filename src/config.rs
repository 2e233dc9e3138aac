use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::schema::SchemaVariant;

/// File the configuration persists to, next to the executable's working dir.
pub const CONFIG_FILE: &str = "painel-desempenho.json";

/// Everything the dashboard needs to start: which workbook to read and
/// which schema it follows. Persisted as JSON so the last choice survives
/// a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub workbook_path: PathBuf,
    pub variant: SchemaVariant,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workbook_path: PathBuf::from("desempenho_sample.xlsx"),
            variant: SchemaVariant::Descriptors2025,
        }
    }
}

impl AppConfig {
    /// Read the config file, falling back to defaults when it is missing
    /// or unreadable. A malformed file is logged but never fatal.
    pub fn load_or_default() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("config inválida em {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist the current configuration.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(Path::new(CONFIG_FILE))
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("gravando {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = AppConfig {
            workbook_path: PathBuf::from("/tmp/planilha.xlsx"),
            variant: SchemaVariant::SchoolAssessment,
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.workbook_path, config.workbook_path);
        assert_eq!(loaded.variant, SchemaVariant::SchoolAssessment);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let loaded = AppConfig::load_from(Path::new("/nonexistent/painel.json"));
        assert_eq!(loaded.variant, SchemaVariant::Descriptors2025);
        assert_eq!(loaded.workbook_path, PathBuf::from("desempenho_sample.xlsx"));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.variant, SchemaVariant::Descriptors2025);
    }
}

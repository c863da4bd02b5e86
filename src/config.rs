// ============================================================================
// Configuration : variables d'environnement LUMENBOARD_*
// ============================================================================
// Un fichier .env optionnel est chargé d'abord (dotenv), puis chaque
// variable est lue avec une valeur par défaut.
//
// CONCEPT RUST : FromStr + Context
// - "30".parse::<u32>() retourne un Result
// - .with_context() nomme la variable fautive dans le message d'erreur
// ============================================================================

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::analytics::annotations::DEFAULT_THRESHOLD;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_FORECAST_DAYS: u32 = 30;

/// Origine des données affichées
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSource {
    /// Générateur aléatoire local (mode démo)
    #[default]
    Mock,
    /// API d'analyse distante
    Api,
}

impl FromStr for DataSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(DataSource::Mock),
            "api" => Ok(DataSource::Api),
            other => bail!("Source de données inconnue : {} (attendu : mock ou api)", other),
        }
    }
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Mock => "mock",
            DataSource::Api => "api",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub access_token: Option<String>,
    pub data_source: DataSource,
    pub analysis_id: Option<String>,
    pub forecast_days: u32,
    pub annotation_threshold: f64,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            access_token: None,
            data_source: DataSource::default(),
            analysis_id: None,
            forecast_days: DEFAULT_FORECAST_DAYS,
            annotation_threshold: DEFAULT_THRESHOLD,
            log_dir: None,
        }
    }
}

impl Config {
    /// Charge .env puis lit l'environnement du processus
    pub fn from_env() -> Result<Self> {
        // Absent = pas d'erreur
        if let Ok(path) = dotenv::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construit la configuration à partir d'une fonction de lecture
    ///
    /// CONCEPT RUST : Fn trait
    /// - Les tests passent une closure sur un HashMap au lieu de
    ///   modifier l'environnement global du processus
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Une variable vide compte comme absente
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let data_source = match get("LUMENBOARD_DATA_SOURCE") {
            Some(raw) => raw.parse::<DataSource>().context("LUMENBOARD_DATA_SOURCE invalide")?,
            None => defaults.data_source,
        };

        let forecast_days = match get("LUMENBOARD_FORECAST_DAYS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("LUMENBOARD_FORECAST_DAYS invalide : {}", raw))?,
            None => defaults.forecast_days,
        };

        let annotation_threshold = match get("LUMENBOARD_ANNOTATION_THRESHOLD") {
            Some(raw) => {
                let value = raw
                    .parse::<f64>()
                    .with_context(|| format!("LUMENBOARD_ANNOTATION_THRESHOLD invalide : {}", raw))?;
                if !(value.is_finite() && value > 0.0) {
                    bail!("LUMENBOARD_ANNOTATION_THRESHOLD doit être > 0 (reçu {})", value);
                }
                value
            }
            None => defaults.annotation_threshold,
        };

        let config = Self {
            api_url: get("LUMENBOARD_API_URL").unwrap_or(defaults.api_url),
            access_token: get("LUMENBOARD_ACCESS_TOKEN"),
            data_source,
            analysis_id: get("LUMENBOARD_ANALYSIS_ID"),
            forecast_days,
            annotation_threshold,
            log_dir: get("LUMENBOARD_LOG_DIR").map(PathBuf::from),
        };

        debug!(
            api_url = %config.api_url,
            source = config.data_source.label(),
            has_token = config.access_token.is_some(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Répertoire des logs
    ///
    /// - Linux/WSL : ~/.local/share/lumenboard/logs
    /// - macOS : ~/Library/Application Support/lumenboard/logs
    /// - Sinon : ./logs
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join("lumenboard").join("logs"))
                .unwrap_or_else(|| PathBuf::from("./logs"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.data_source, DataSource::Mock);
        assert_eq!(config.forecast_days, 30);
        assert!((config.annotation_threshold - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("LUMENBOARD_API_URL", "https://api.example.com"),
            ("LUMENBOARD_ACCESS_TOKEN", "secret"),
            ("LUMENBOARD_DATA_SOURCE", "API"),
            ("LUMENBOARD_ANALYSIS_ID", "42"),
            ("LUMENBOARD_FORECAST_DAYS", "14"),
            ("LUMENBOARD_ANNOTATION_THRESHOLD", "0.2"),
            ("LUMENBOARD_LOG_DIR", "/tmp/lumenboard"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.access_token.as_deref(), Some("secret"));
        assert_eq!(config.data_source, DataSource::Api);
        assert_eq!(config.analysis_id.as_deref(), Some("42"));
        assert_eq!(config.forecast_days, 14);
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/lumenboard"));
    }

    #[test]
    fn test_empty_value_is_absent() {
        let config = config_from(&[("LUMENBOARD_ACCESS_TOKEN", "  ")]).unwrap();
        assert_eq!(config.access_token, None);
    }

    #[test]
    fn test_invalid_values() {
        let err = config_from(&[("LUMENBOARD_FORECAST_DAYS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("LUMENBOARD_FORECAST_DAYS"));

        assert!(config_from(&[("LUMENBOARD_ANNOTATION_THRESHOLD", "0")]).is_err());
        assert!(config_from(&[("LUMENBOARD_ANNOTATION_THRESHOLD", "-0.1")]).is_err());
        assert!(config_from(&[("LUMENBOARD_DATA_SOURCE", "csv")]).is_err());
    }

    #[test]
    fn test_default_log_dir_ends_with_logs() {
        assert!(Config::default().log_dir().ends_with("logs"));
    }
}

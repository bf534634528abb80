use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::types::{Dataset, Severity};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub sources: SourceConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    pub server: ServerConfig,
}

/// One URL per dataset selector.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub hazard: String,
    pub reports: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProcessingConfig {
    /// Severities whose source features never produce hotspots. Defaults to
    /// Low only, matching the original dashboard; flagged for product
    /// confirmation rather than hardcoded.
    #[serde(default = "default_excluded")]
    pub excluded_severities: HashSet<Severity>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        ProcessingConfig {
            excluded_severities: default_excluded(),
        }
    }
}

fn default_excluded() -> HashSet<Severity> {
    HashSet::from([Severity::Low])
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    pub fn source_url(&self, dataset: Dataset) -> &str {
        match dataset {
            Dataset::Hazard => &self.sources.hazard,
            Dataset::Reports => &self.sources.reports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let toml = r#"
            [sources]
            hazard = "http://localhost/ocean_hazards.geojson"
            reports = "http://localhost/reports.geojson"

            [processing]
            excluded_severities = ["Low", "Moderate"]

            [server]
            port = 3000
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(
            config.source_url(Dataset::Reports),
            "http://localhost/reports.geojson"
        );
        assert!(config
            .processing
            .excluded_severities
            .contains(&Severity::Moderate));
    }

    #[test]
    fn excluded_severities_default_to_low() {
        let toml = r#"
            [sources]
            hazard = "http://localhost/a.geojson"
            reports = "http://localhost/b.geojson"

            [server]
            port = 8080
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.processing.excluded_severities,
            HashSet::from([Severity::Low])
        );
    }

    #[test]
    fn unknown_excluded_severity_fails_load() {
        let toml = r#"
            [sources]
            hazard = "http://localhost/a.geojson"
            reports = "http://localhost/b.geojson"

            [processing]
            excluded_severities = ["Lowish"]

            [server]
            port = 8080
        "#;
        assert!(toml::from_str::<AppConfig>(toml).is_err());
    }
}

use std::fmt;
use std::str::FromStr;

use geo::Point;

/// Closed-set severity classification driving both filtering and map
/// color-coding. Unrecognized or missing values fall back to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
pub enum Severity {
    Critical,
    High,
    Moderate,
    Low,
    Default,
}

impl Severity {
    /// Parse a property string, case-insensitively. The hazard-zone
    /// vocabulary uses "Very High" for its top band, which maps to Critical.
    /// Anything unrecognized is Default rather than an error.
    pub fn parse(s: &str) -> Severity {
        match s.trim().to_lowercase().as_str() {
            "critical" | "very high" => Severity::Critical,
            "high" => Severity::High,
            "moderate" => Severity::Moderate,
            "low" => Severity::Low,
            _ => Severity::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Moderate => "Moderate",
            Severity::Low => "Low",
            Severity::Default => "default",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Severity {
    type Error = String;

    // Config deserialization is strict: a typo in excluded_severities should
    // fail config load, not silently become Default.
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "critical" | "very high" => Ok(Severity::Critical),
            "high" => Ok(Severity::High),
            "moderate" => Ok(Severity::Moderate),
            "low" => Ok(Severity::Low),
            "default" => Ok(Severity::Default),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// The two logical datasets, each backed by its own geometry source.
/// Any other token is a caller error and is rejected, never defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Dataset {
    Hazard,
    Reports,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Hazard => "hazard",
            Dataset::Reports => "reports",
        }
    }
}

impl FromStr for Dataset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hazard" => Ok(Dataset::Hazard),
            "reports" => Ok(Dataset::Reports),
            other => Err(anyhow::anyhow!(
                "unknown dataset '{}' (expected 'hazard' or 'reports')",
                other
            )),
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single representative point marker derived from (or manually assigned
/// to) a hazard/report area.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub point: Point<f64>,
    pub severity: Severity,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!(Severity::parse("Critical"), Severity::Critical);
        assert_eq!(Severity::parse("high"), Severity::High);
        assert_eq!(Severity::parse("MODERATE"), Severity::Moderate);
        assert_eq!(Severity::parse("low"), Severity::Low);
    }

    #[test]
    fn very_high_zone_maps_to_critical() {
        assert_eq!(Severity::parse("Very High"), Severity::Critical);
    }

    #[test]
    fn unrecognized_severity_is_default() {
        assert_eq!(Severity::parse("banana"), Severity::Default);
        assert_eq!(Severity::parse(""), Severity::Default);
    }

    #[test]
    fn default_severity_renders_lowercase() {
        assert_eq!(Severity::Default.as_str(), "default");
        assert_eq!(Severity::Critical.as_str(), "Critical");
    }

    #[test]
    fn dataset_tokens_round_trip() {
        assert_eq!("hazard".parse::<Dataset>().unwrap(), Dataset::Hazard);
        assert_eq!("reports".parse::<Dataset>().unwrap(), Dataset::Reports);
    }

    #[test]
    fn unknown_dataset_token_is_rejected() {
        assert!("shelters".parse::<Dataset>().is_err());
        assert!("Hazard".parse::<Dataset>().is_err());
    }
}

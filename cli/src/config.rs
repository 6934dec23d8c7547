//! CLI configuration: logging plus the governance parameters, loaded from TOML.

use crate::error::CliError;
use agora_types::GovernanceConfig;
use agora_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgoraConfig {
    /// Log output format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub governance: GovernanceConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AgoraConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, CliError> {
        let config: Self = toml::from_str(s).map_err(|e| CliError::Config(e.to_string()))?;
        config
            .governance
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, CliError> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))
    }
}

impl Default for AgoraConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            governance: GovernanceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::QuorumRule;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = AgoraConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = AgoraConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = AgoraConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.governance.voting_delay_secs, 86_400);
        assert_eq!(config.governance.quorum, QuorumRule::Fraction { bps: 400 });
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            log_format = "json"

            [governance]
            voting_period_secs = 600
            quorum = { absolute = 4000000 }
        "#;
        let config = AgoraConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.governance.voting_period_secs, 600);
        assert_eq!(config.governance.quorum, QuorumRule::Absolute(4_000_000));
        assert_eq!(config.governance.quadratic_tag, "#QV");
    }

    #[test]
    fn invalid_governance_rejected() {
        let toml = r#"
            [governance]
            voting_period_secs = 0
        "#;
        assert!(matches!(AgoraConfig::from_toml_str(toml), Err(CliError::Config(_))));
    }
}

//! Config parser for JSON and YAML game documents
//!
//! Accepts the camelCase schema in JSON or YAML. Documents are checked against
//! [`ConfigLimits`] before full validation, so oversized input is rejected
//! cheaply.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let parser = ConfigParser::new();
//! let config = parser.parse_json(json_string)?;
//! ```

use log::debug;

use crate::config::GameConfig;
use crate::error::{ConfigError, ConfigResult};

/// Config Parser
#[derive(Debug, Clone, Default)]
pub struct ConfigParser {
    /// Validation limits
    pub limits: ConfigLimits,
}

/// Parsing limits for untrusted documents
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    pub max_name_length: usize,
    pub max_symbols: usize,
    pub max_paylines: usize,
    pub max_reels: u8,
    pub max_rows: u8,
    pub max_strip_length: usize,
    pub max_cascades: u32,
    pub max_pay_value: f64,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_name_length: 256,
            max_symbols: 64,
            max_paylines: 243,
            max_reels: 10,
            max_rows: 10,
            max_strip_length: 1_000,
            max_cascades: 100,
            max_pay_value: 100_000.0,
        }
    }
}

impl ConfigParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Create parser with custom limits
    pub fn with_limits(limits: ConfigLimits) -> Self {
        Self { limits }
    }

    /// Parse and validate a JSON document
    pub fn parse_json(&self, json: &str) -> ConfigResult<GameConfig> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        self.finish(config)
    }

    /// Parse and validate a YAML document
    pub fn parse_yaml(&self, yaml: &str) -> ConfigResult<GameConfig> {
        let config: GameConfig =
            serde_yml::from_str(yaml).map_err(|e| ConfigError::Yaml(e.to_string()))?;
        self.finish(config)
    }

    fn finish(&self, config: GameConfig) -> ConfigResult<GameConfig> {
        self.check_limits(&config)?;
        config.validate()?;
        debug!(
            "Loaded config '{}': {}×{}, {} symbols, {:?}",
            config.id,
            config.reels,
            config.rows,
            config.symbols.len(),
            config.win_mode
        );
        Ok(config)
    }

    /// Check document size limits
    pub fn check_limits(&self, config: &GameConfig) -> ConfigResult<()> {
        let limits = &self.limits;

        if config.name.len() > limits.max_name_length {
            return Err(ConfigError::Limit(format!(
                "Game name too long: {} > {}",
                config.name.len(),
                limits.max_name_length
            )));
        }

        if config.symbols.len() > limits.max_symbols {
            return Err(ConfigError::Limit(format!(
                "Too many symbols: {} > {}",
                config.symbols.len(),
                limits.max_symbols
            )));
        }

        if config.reels > limits.max_reels {
            return Err(ConfigError::Limit(format!(
                "Too many reels: {} > {}",
                config.reels, limits.max_reels
            )));
        }

        if config.rows > limits.max_rows {
            return Err(ConfigError::Limit(format!(
                "Too many rows: {} > {}",
                config.rows, limits.max_rows
            )));
        }

        if let Some(lines) = &config.paylines {
            if lines.len() > limits.max_paylines {
                return Err(ConfigError::Limit(format!(
                    "Too many paylines: {} > {}",
                    lines.len(),
                    limits.max_paylines
                )));
            }
        }

        let strips = &config.reel_strips;
        if let Some(strip) = strips
            .base_game
            .iter()
            .chain(&strips.free_spins)
            .find(|s| s.len() > limits.max_strip_length)
        {
            return Err(ConfigError::Limit(format!(
                "Reel strip too long: {} > {}",
                strip.len(),
                limits.max_strip_length
            )));
        }

        if config.max_cascades > limits.max_cascades {
            return Err(ConfigError::Limit(format!(
                "maxCascades too large: {} > {}",
                config.max_cascades, limits.max_cascades
            )));
        }

        let max_pay = config
            .symbols
            .iter()
            .flat_map(|s| s.pays.values().copied())
            .fold(0.0, f64::max);
        if max_pay > limits.max_pay_value {
            return Err(ConfigError::Limit(format!(
                "Pay value too large: {} > {}",
                max_pay, limits.max_pay_value
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WinMode;

    const MINIMAL_JSON: &str = r#"{
        "id": "mini",
        "name": "Mini",
        "reels": 5,
        "rows": 1,
        "minMatchLength": 4,
        "winMode": "adjacency",
        "symbols": [
            { "id": 0, "name": "-", "category": "blank" },
            { "id": 1, "name": "A", "category": "low", "pays": { "4": 2.0, "5": 5.0 } }
        ],
        "reelStrips": {
            "baseGame": [[0, 1], [0, 1], [0, 1], [0, 1], [0, 1]]
        }
    }"#;

    #[test]
    fn test_parse_minimal_json() {
        let parser = ConfigParser::new();
        let config = parser.parse_json(MINIMAL_JSON).unwrap();

        assert_eq!(config.id, "mini");
        assert_eq!(config.win_mode, WinMode::Adjacency);
        assert_eq!(config.symbols[1].get_pay(4), 2.0);
        assert_eq!(config.max_cascades, 20);
        assert!(config.cascades_enabled);
        assert!(config.reel_strips.free_spins.is_empty());
    }

    #[test]
    fn test_parse_minimal_yaml() {
        let yaml = r#"
id: mini
name: Mini
reels: 5
rows: 1
minMatchLength: 4
winMode: adjacency
symbols:
  - { id: 0, name: "-", category: blank }
  - { id: 1, name: A, category: low, pays: { 4: 2.0 } }
reelStrips:
  baseGame: [[0, 1], [0, 1], [0, 1], [0, 1], [0, 1]]
"#;
        let config = ConfigParser::new().parse_yaml(yaml).unwrap();
        assert_eq!(config.reels, 5);
        assert_eq!(config.symbols[1].get_pay(4), 2.0);
    }

    #[test]
    fn test_validation_limits() {
        let parser = ConfigParser::with_limits(ConfigLimits {
            max_reels: 4,
            ..ConfigLimits::default()
        });
        assert!(matches!(parser.parse_json(MINIMAL_JSON), Err(ConfigError::Limit(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = ConfigParser::new().parse_json("{ \"id\": ");
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let json = MINIMAL_JSON.replace(
            "[[0, 1], [0, 1], [0, 1], [0, 1], [0, 1]]",
            "[[0, 1], [], [0, 1], [0, 1], [0, 1]]",
        );
        let result = ConfigParser::new().parse_json(&json);
        assert!(matches!(result, Err(ConfigError::EmptyReelStrip { reel: 1, .. })));
    }
}

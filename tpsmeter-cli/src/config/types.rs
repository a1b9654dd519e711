use std::time::Duration;

use serde::{Deserialize, Serialize};
use tpsmeter_models::session::SimulationConfig;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawTpsConfig {
    #[serde(default)]
    pub simulation: RawSimulationConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Simulation config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSimulationConfig {
    /// Number of simulated chunks per run
    pub iterations: Option<u32>,

    /// Pause after each chunk, in milliseconds
    pub interval_ms: Option<u64>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TpsConfig {
    #[serde(default)]
    pub simulation: SimulationSection,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSection {
    /// Number of simulated chunks per run
    pub iterations: u32,

    /// Pause after each chunk, in milliseconds
    pub interval_ms: u64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl SimulationSection {
    /// Build the session parameters described by this section
    pub fn to_simulation_config(&self) -> SimulationConfig {
        SimulationConfig::default()
            .iterations(self.iterations)
            .interval(Duration::from_millis(self.interval_ms))
    }
}

/// Pre-selected form values
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Provider display name selected when the form opens
    pub provider: Option<String>,

    /// Model display name selected when the form opens
    pub model: Option<String>,
}

/// Default number of simulated chunks
pub const DEFAULT_ITERATIONS: u32 = 50;

/// Default pause between chunks
pub const DEFAULT_INTERVAL_MS: u64 = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = TpsConfig::default();
        assert_eq!(config.simulation.iterations, DEFAULT_ITERATIONS);
        assert_eq!(config.simulation.interval_ms, DEFAULT_INTERVAL_MS);
        assert!(config.defaults.provider.is_none());
        assert!(config.defaults.model.is_none());
    }

    #[test]
    fn test_default_section_matches_session_defaults() {
        let config = SimulationSection::default().to_simulation_config();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = TpsConfig {
            simulation: SimulationSection {
                iterations: 10,
                interval_ms: 20,
            },
            defaults: DefaultsConfig {
                provider: Some("Anthropic".to_string()),
                model: Some("Claude 3.7 Sonnet".to_string()),
            },
        };

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: TpsConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.simulation.iterations, 10);
        assert_eq!(parsed.simulation.interval_ms, 20);
        assert_eq!(parsed.defaults.provider, Some("Anthropic".to_string()));
        assert_eq!(parsed.defaults.model, Some("Claude 3.7 Sonnet".to_string()));
    }

    #[test]
    fn test_raw_config_partial_parsing() {
        let toml_str = r#"
[simulation]
iterations = 20
"#;
        let raw: RawTpsConfig = toml::from_str(toml_str).unwrap();

        // Only iterations was set, interval should be None
        assert_eq!(raw.simulation.iterations, Some(20));
        assert!(raw.simulation.interval_ms.is_none());
        assert!(raw.defaults.provider.is_none());
    }

    #[test]
    fn test_raw_config_empty_uses_none() {
        let raw: RawTpsConfig = toml::from_str("").unwrap();

        assert!(raw.simulation.iterations.is_none());
        assert!(raw.simulation.interval_ms.is_none());
    }
}

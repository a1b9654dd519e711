use super::types::{DefaultsConfig, RawSimulationConfig, RawTpsConfig, SimulationSection, TpsConfig};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<TpsConfig> {
        Self::load_from(
            Self::user_config_path().as_deref(),
            &Self::project_config_path(),
        )
    }

    /// Load merged configuration from explicit paths; missing files are skipped
    pub fn load_from(user_path: Option<&Path>, project_path: &Path) -> Result<TpsConfig> {
        let mut raw = RawTpsConfig::default();

        // Layer 1: User config
        if let Some(user_path) = user_path
            && user_path.exists()
        {
            raw = Self::merge_raw(raw, Self::read_raw(user_path)?);
        }

        // Layer 2: Project config
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(project_path)?);
        }

        // Convert to final config with defaults applied
        Ok(Self::finalize(raw))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tpsmeter").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with TPSMETER_PROJECT_CONFIG_DIR env var (useful for isolated e2e tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("TPSMETER_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".tpsmeter/config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<RawTpsConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let raw = toml::from_str(&contents)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        debug!(path = %path.display(), "loaded config layer");
        Ok(raw)
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawTpsConfig, overlay: RawTpsConfig) -> RawTpsConfig {
        RawTpsConfig {
            simulation: RawSimulationConfig {
                iterations: overlay.simulation.iterations.or(base.simulation.iterations),
                interval_ms: overlay.simulation.interval_ms.or(base.simulation.interval_ms),
            },
            defaults: DefaultsConfig {
                provider: overlay.defaults.provider.or(base.defaults.provider),
                model: overlay.defaults.model.or(base.defaults.model),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawTpsConfig) -> TpsConfig {
        let defaults = SimulationSection::default();
        TpsConfig {
            simulation: SimulationSection {
                iterations: raw.simulation.iterations.unwrap_or(defaults.iterations),
                interval_ms: raw.simulation.interval_ms.unwrap_or(defaults.interval_ms),
            },
            defaults: raw.defaults,
        }
    }
}

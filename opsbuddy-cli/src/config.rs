use anyhow::{Context, Result};
use opsbuddy_core::{OpsBuddyConfig, ResponseMode};

/// Command-line flags that take precedence over files and environment.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub mode: Option<ResponseMode>,
    pub backend_url: Option<String>,
    pub no_color: bool,
}

pub fn load_config(overrides: &CliOverrides) -> Result<OpsBuddyConfig> {
    let config = OpsBuddyConfig::load().context("Failed to load OpsBuddy configuration")?;
    apply_overrides(config, overrides)
}

pub fn apply_overrides(
    mut config: OpsBuddyConfig,
    overrides: &CliOverrides,
) -> Result<OpsBuddyConfig> {
    if let Some(mode) = overrides.mode {
        config.chat.mode = mode;
    }

    if let Some(url) = &overrides.backend_url {
        config.backend.url = url.clone();
    }

    if overrides.no_color {
        config.display.color = false;
    }

    config.validate()?;
    Ok(config)
}

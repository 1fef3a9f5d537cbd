//! Base layer for every merge: the serialized built-in defaults.

use crate::config::SkillmuxConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Start a builder seeded with `SkillmuxConfig::default()`.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Config::try_from(&SkillmuxConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}

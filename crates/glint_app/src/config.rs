//! Site configuration (glint.toml)
//!
//! Every section and every key is optional; anything left out keeps the
//! built-in value.
//!
//! ```toml
//! [reveal]
//! stagger_ms = 80
//! root_margin = "0px 0px -80px 0px"
//!
//! [counter]
//! duration_ms = 1500
//!
//! [typewriter]
//! selector = "#hero-code code"
//! max_char_delay_ms = 40
//! ```

use std::fs;
use std::path::Path;

use glint_effects::{CounterConfig, ParallaxConfig, RevealConfig, TypewriterConfig};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// File name looked up by [`SiteConfig::load_from_dir`]
pub const CONFIG_FILE: &str = "glint.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub counter: CounterConfig,
    #[serde(default)]
    pub typewriter: TypewriterConfig,
    #[serde(default)]
    pub parallax: ParallaxConfig,
}

impl SiteConfig {
    /// Parse and validate TOML text
    pub fn load_from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&content)
    }

    /// Load `glint.toml` from a directory, or the given file directly
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load_from_path(path)
        } else {
            Self::load_from_path(&path.join(CONFIG_FILE))
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the engines cannot honour
    pub fn validate(&self) -> Result<()> {
        check_threshold("reveal.threshold", self.reveal.threshold)?;
        check_threshold("counter.threshold", self.counter.threshold)?;
        check_threshold("typewriter.threshold", self.typewriter.threshold)?;

        if self.counter.fps == 0 {
            return Err(invalid("counter.fps", "must be at least 1"));
        }
        if self.counter.target_attribute.trim().is_empty() {
            return Err(invalid("counter.target_attribute", "must not be empty"));
        }

        let typewriter = &self.typewriter;
        if typewriter.min_char_delay_ms > typewriter.max_char_delay_ms {
            return Err(invalid(
                "typewriter.min_char_delay_ms",
                format!(
                    "{} is greater than max_char_delay_ms ({})",
                    typewriter.min_char_delay_ms, typewriter.max_char_delay_ms
                ),
            ));
        }

        check_width("typewriter.min_viewport_width", typewriter.min_viewport_width)?;
        check_width("parallax.min_viewport_width", self.parallax.min_viewport_width)?;
        if !self.parallax.intensity_step.is_finite() {
            return Err(invalid("parallax.intensity_step", "must be finite"));
        }
        if !self.reveal.offset_px.is_finite() {
            return Err(invalid("reveal.offset_px", "must be finite"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_threshold(field: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is outside 0.0..=1.0")))
    }
}

fn check_width(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is not a non-negative width")))
    }
}

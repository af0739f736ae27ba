//! Scenario definition for headless page runs.

use std::path::Path;

use anyhow::{Context, Result};
use glint_core::Selector;
use serde::Deserialize;

/// Sequence of user actions and checks replayed against a page.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Let virtual time pass
    Wait { ms: u64 },
    /// Scroll vertically to a page offset
    Scroll { y: f32 },
    Resize { width: f32, height: f32 },
    /// Move the pointer to a client position
    Pointer { x: f32, y: f32 },
    AssertExists { selector: Selector },
    /// Exact text content of the first match
    AssertText { selector: Selector, value: String },
    AssertTextContains { selector: Selector, value: String },
    /// Inline style property of the first match
    AssertStyle {
        selector: Selector,
        property: String,
        value: String,
    },
}

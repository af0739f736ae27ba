//! Headless runtime for deterministic page runs.

use std::time::Duration;

use anyhow::{bail, Result};
use glint_animation::RandomDelay;
use glint_core::{Document, DocumentTree};
use glint_viewport::Viewport;

use crate::app::GlintApp;
use crate::config::SiteConfig;

/// Configuration for a deterministic headless run.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRunConfig {
    /// Logical viewport width used by the headless run.
    pub width: f32,
    /// Logical viewport height used by the headless run.
    pub height: f32,
    /// Logical milliseconds per tick; waits advance in slices of this size.
    pub tick_ms: u64,
    /// Seed for the typing jitter so runs are reproducible.
    pub seed: u64,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            tick_ms: 16,
            seed: 0,
        }
    }
}

impl HeadlessRunConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            bail!("headless dimensions must be positive");
        }
        if self.tick_ms == 0 {
            bail!("headless tick_ms must be > 0");
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

/// A mounted page driven by virtual time.
pub struct HeadlessRuntime<D: Document = DocumentTree> {
    app: GlintApp<D>,
    cfg: HeadlessRunConfig,
    elapsed_ms: u64,
    tasks_run: u64,
}

impl<D: Document> HeadlessRuntime<D> {
    /// Mount `document` with `config` at the configured viewport.
    pub fn new(document: D, config: SiteConfig, cfg: HeadlessRunConfig) -> Result<Self> {
        cfg.validate()?;

        let mut app = GlintApp::new(document, config, cfg.viewport())
            .with_delay_source(RandomDelay::seeded(cfg.seed));
        app.mount();

        Ok(Self {
            app,
            cfg,
            elapsed_ms: 0,
            tasks_run: 0,
        })
    }

    /// Advance virtual time by `ms`, one tick at a time.
    pub fn wait(&mut self, ms: u64) {
        let mut remaining = ms;
        while remaining > 0 {
            let step = remaining.min(self.cfg.tick_ms);
            remaining -= step;
            self.tick(step);
        }
    }

    fn tick(&mut self, ms: u64) {
        let ran = self.app.advance(Duration::from_millis(ms));
        self.tasks_run = self.tasks_run.saturating_add(ran as u64);
        self.elapsed_ms = self.elapsed_ms.saturating_add(ms);
    }

    pub fn app(&self) -> &GlintApp<D> {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut GlintApp<D> {
        &mut self.app
    }

    pub fn into_app(self) -> GlintApp<D> {
        self.app
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn tasks_run(&self) -> u64 {
        self.tasks_run
    }
}

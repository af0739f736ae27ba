//! Pointer parallax for the hero's background glows

use glint_core::{Document, NodeId, Selector};
use glint_viewport::Viewport;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParallaxConfig {
    #[serde(default = "default_hero_selector")]
    pub hero_selector: Selector,
    #[serde(default = "default_glow_selector")]
    pub glow_selector: Selector,
    /// Narrower viewports get no parallax
    #[serde(default = "default_min_viewport_width")]
    pub min_viewport_width: f32,
    /// Maximum shift of the first glow; glow `i` moves `i + 1` times as far
    #[serde(default = "default_intensity_step")]
    pub intensity_step: f32,
}

fn default_hero_selector() -> Selector {
    Selector::parse(".hero").expect("default hero selector is valid")
}

fn default_glow_selector() -> Selector {
    Selector::parse(".glow").expect("default glow selector is valid")
}

fn default_min_viewport_width() -> f32 {
    1024.0
}

fn default_intensity_step() -> f32 {
    15.0
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            hero_selector: default_hero_selector(),
            glow_selector: default_glow_selector(),
            min_viewport_width: default_min_viewport_width(),
            intensity_step: default_intensity_step(),
        }
    }
}

/// Offset of glow `index` for a pointer at client position `pointer`.
///
/// The pointer position is normalised to -1..1 across the viewport and scaled
/// by `(index + 1) × step`. Returns `None` for a viewport without area.
pub fn glow_offset(
    pointer: (f32, f32),
    viewport: &Viewport,
    index: usize,
    step: f32,
) -> Option<(f32, f32)> {
    if !(viewport.width > 0.0 && viewport.height > 0.0) {
        return None;
    }
    let x_percent = (pointer.0 / viewport.width - 0.5) * 2.0;
    let y_percent = (pointer.1 / viewport.height - 0.5) * 2.0;
    let intensity = (index + 1) as f32 * step;
    Some((x_percent * intensity, y_percent * intensity))
}

pub struct ParallaxEngine {
    config: ParallaxConfig,
    hero: Option<NodeId>,
    glows: Vec<NodeId>,
}

impl ParallaxEngine {
    pub fn new(config: ParallaxConfig) -> Self {
        Self {
            config,
            hero: None,
            glows: Vec::new(),
        }
    }

    pub fn config(&self) -> &ParallaxConfig {
        &self.config
    }

    pub fn is_armed(&self) -> bool {
        self.hero.is_some()
    }

    pub fn glows(&self) -> &[NodeId] {
        &self.glows
    }

    /// Arm the engine when the viewport is wide enough and the hero has glows
    pub fn mount<D: Document + ?Sized>(&mut self, doc: &D, viewport: &Viewport) -> bool {
        if self.is_armed() || viewport.width < self.config.min_viewport_width {
            return false;
        }
        let Some(hero) = doc.select_first(&self.config.hero_selector) else {
            return false;
        };
        let glows = doc.select_all(&self.config.glow_selector);
        if glows.is_empty() {
            return false;
        }

        debug!(glows = glows.len(), "parallax armed");
        self.hero = Some(hero);
        self.glows = glows;
        true
    }

    /// Shift the glows for a pointer at client position `(x, y)`.
    ///
    /// Only moves over the hero count, and nothing moves while the viewport
    /// has no area. Returns whether the glows moved.
    pub fn on_pointer_move<D: Document + ?Sized>(
        &self,
        doc: &mut D,
        viewport: &Viewport,
        x: f32,
        y: f32,
    ) -> bool {
        let Some(hero) = self.hero else {
            return false;
        };
        let (page_x, page_y) = viewport.to_page(x, y);
        let over_hero = doc
            .bounding_rect(hero)
            .is_some_and(|rect| rect.contains_point(page_x, page_y));
        if !over_hero {
            return false;
        }

        for (index, &glow) in self.glows.iter().enumerate() {
            let Some((dx, dy)) = glow_offset((x, y), viewport, index, self.config.intensity_step)
            else {
                return false;
            };
            doc.set_style(glow, "transform", &format!("translate({dx}px, {dy}px)"));
        }
        trace!(x, y, "parallax moved");
        true
    }
}

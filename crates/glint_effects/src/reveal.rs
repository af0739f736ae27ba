//! Staggered scroll reveals
//!
//! Every element matching the reveal selector starts hidden (transparent and
//! pushed down). When it scrolls into view it is revealed after a delay of
//! `sibling index × stagger step`, so cards sharing a parent cascade in while
//! unrelated groups reveal independently.

use std::time::Duration;

use glint_animation::Easing;
use glint_core::{Document, NodeId, Selector};
use glint_viewport::{ObserveOptions, RootMargin};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::task::{Task, TaskQueue, Trigger, TriggerObserver};

/// Selector list used by the reveal engine unless configured otherwise
pub const DEFAULT_REVEAL_SELECTOR: &str = ".section-tag, .section-title, .section-subtitle, \
    .sobre-description, .sobre-highlights, .code-window, .servico-card, .processo-step, \
    .portfolio-item, .contacto-info, .contacto-form";

/// Reveal engine configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RevealConfig {
    #[serde(default = "default_selector")]
    pub selector: Selector,
    /// Visible fraction that triggers the reveal
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default = "default_root_margin")]
    pub root_margin: RootMargin,
    /// Delay added per sibling index
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u64,
    /// Transition duration for opacity and transform
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Initial downward offset
    #[serde(default = "default_offset_px")]
    pub offset_px: f32,
    #[serde(default)]
    pub easing: Easing,
}

fn default_selector() -> Selector {
    Selector::parse(DEFAULT_REVEAL_SELECTOR).expect("default reveal selector is valid")
}

fn default_threshold() -> f32 {
    0.1
}

fn default_root_margin() -> RootMargin {
    RootMargin::px(0.0, 0.0, -50.0, 0.0)
}

fn default_stagger_ms() -> u64 {
    100
}

fn default_duration_ms() -> u64 {
    600
}

fn default_offset_px() -> f32 {
    30.0
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            threshold: default_threshold(),
            root_margin: default_root_margin(),
            stagger_ms: default_stagger_ms(),
            duration_ms: default_duration_ms(),
            offset_px: default_offset_px(),
            easing: Easing::default(),
        }
    }
}

/// Inline style values an element had before the engine hid it
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleSnapshot {
    pub opacity: Option<String>,
    pub transform: Option<String>,
    pub transition: Option<String>,
}

impl StyleSnapshot {
    fn capture<D: Document + ?Sized>(doc: &D, node: NodeId) -> Self {
        Self {
            opacity: doc.style(node, "opacity"),
            transform: doc.style(node, "transform"),
            transition: doc.style(node, "transition"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealState {
    /// Hidden, waiting to become visible
    Pending,
    /// Visible; reveal scheduled after the stagger delay
    Scheduled,
    /// Visible style applied
    Revealed,
}

/// One element managed by the reveal engine
#[derive(Clone, Debug)]
pub struct RevealTarget {
    pub node: NodeId,
    pub original: StyleSnapshot,
    pub sibling_index: usize,
    pub delay: Duration,
    pub state: RevealState,
}

/// Hides matching elements and reveals them with a sibling stagger
pub struct RevealEngine {
    config: RevealConfig,
    targets: FxHashMap<NodeId, RevealTarget>,
}

impl RevealEngine {
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            targets: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn options(&self) -> ObserveOptions {
        ObserveOptions::new(self.config.threshold).with_root_margin(self.config.root_margin)
    }

    /// Delay for a given sibling index
    pub fn stagger_delay(&self, index: usize) -> Duration {
        Duration::from_millis(self.config.stagger_ms.saturating_mul(index as u64))
    }

    /// Inline `transition` value applied to every target
    pub fn transition(&self) -> String {
        let secs = self.config.duration_ms as f64 / 1000.0;
        let easing = self.config.easing.to_css();
        format!("opacity {secs}s {easing}, transform {secs}s {easing}")
    }

    /// Hide every matching element and register it for visibility.
    ///
    /// Elements already mounted are left alone, so calling this again only
    /// picks up new matches. Returns the number of newly mounted targets.
    pub fn mount<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        observer: &mut TriggerObserver,
    ) -> usize {
        let options = self.options();
        let transition = self.transition();
        let hidden = format!("translateY({}px)", self.config.offset_px);

        let mut mounted = 0;
        for node in doc.select_all(&self.config.selector) {
            if self.targets.contains_key(&node) {
                continue;
            }

            let original = StyleSnapshot::capture(&*doc, node);
            let sibling_index = sibling_index(&*doc, node);
            let delay = self.stagger_delay(sibling_index);

            doc.set_style(node, "opacity", "0");
            doc.set_style(node, "transform", &hidden);
            doc.set_style(node, "transition", &transition);
            observer.observe(&*doc, node, options, Trigger::Reveal);

            self.targets.insert(
                node,
                RevealTarget {
                    node,
                    original,
                    sibling_index,
                    delay,
                    state: RevealState::Pending,
                },
            );
            mounted += 1;
        }

        debug!(mounted, selector = %self.config.selector, "reveal targets mounted");
        mounted
    }

    /// Handle a visibility trigger: schedule the reveal after the stagger delay.
    ///
    /// Returns the scheduled delay, or `None` if the element is unknown or was
    /// already triggered.
    pub fn on_visible<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        node: NodeId,
        queue: &mut TaskQueue,
    ) -> Option<Duration> {
        let index = sibling_index(doc, node);
        let delay = self.stagger_delay(index);

        let target = self.targets.get_mut(&node)?;
        if target.state != RevealState::Pending {
            return None;
        }

        target.sibling_index = index;
        target.delay = delay;
        target.state = RevealState::Scheduled;
        queue.schedule(delay, Task::Reveal(node));

        trace!(?node, index, delay_ms = delay.as_millis() as u64, "reveal scheduled");
        Some(delay)
    }

    /// Apply the visible style. Returns false if nothing changed.
    pub fn reveal<D: Document + ?Sized>(&mut self, doc: &mut D, node: NodeId) -> bool {
        let Some(target) = self.targets.get_mut(&node) else {
            return false;
        };
        if target.state == RevealState::Revealed {
            return false;
        }

        let opacity = target.original.opacity.as_deref().unwrap_or("1");
        let transform = target.original.transform.as_deref().unwrap_or("none");
        doc.set_style(node, "opacity", opacity);
        doc.set_style(node, "transform", transform);
        target.state = RevealState::Revealed;
        true
    }

    pub fn target(&self, node: NodeId) -> Option<&RevealTarget> {
        self.targets.get(&node)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Zero-based position among the parent's element children; 0 without a parent
pub fn sibling_index<D: Document + ?Sized>(doc: &D, node: NodeId) -> usize {
    doc.parent(node)
        .and_then(|parent| doc.children(parent).iter().position(|&child| child == node))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::DocumentTree;
    use glint_viewport::Viewport;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    /// A services grid with five cards, a title in another section, and a
    /// detached card with no parent.
    fn services_page() -> (DocumentTree, NodeId, Vec<NodeId>) {
        let mut tree = DocumentTree::new();
        let root = tree.root();

        let intro = tree.append(root, "section").rect(0.0, 0.0, 1280.0, 400.0).finish();
        let title = tree
            .append(intro, "h2")
            .class("section-title")
            .rect(0.0, 100.0, 1280.0, 60.0)
            .finish();

        let grid = tree.append(root, "div").class("servicos-grid").finish();
        let cards = (0..5)
            .map(|i| {
                tree.append(grid, "article")
                    .class("servico-card")
                    .rect(i as f32 * 250.0, 1000.0, 240.0, 300.0)
                    .finish()
            })
            .collect();

        (tree, title, cards)
    }

    fn fire_all(
        engine: &mut RevealEngine,
        tree: &DocumentTree,
        observer: &mut TriggerObserver,
        viewport: &Viewport,
        queue: &mut TaskQueue,
    ) -> Vec<Duration> {
        observer
            .process(tree, viewport)
            .into_iter()
            .filter_map(|fired| engine.on_visible(tree, fired.node, queue))
            .collect()
    }

    #[test]
    fn test_mount_hides_targets() {
        let (mut tree, title, cards) = services_page();
        let mut engine = RevealEngine::new(RevealConfig::default());
        let mut observer = TriggerObserver::new();

        assert_eq!(engine.mount(&mut tree, &mut observer), 6);
        assert_eq!(observer.len(), 6);

        for node in cards.iter().copied().chain([title]) {
            assert_eq!(tree.style(node, "opacity").as_deref(), Some("0"));
            assert_eq!(tree.style(node, "transform").as_deref(), Some("translateY(30px)"));
            assert_eq!(
                tree.style(node, "transition").as_deref(),
                Some("opacity 0.6s ease, transform 0.6s ease")
            );
        }

        // Mounting again picks up nothing new
        assert_eq!(engine.mount(&mut tree, &mut observer), 0);
        assert_eq!(observer.len(), 6);
    }

    #[test]
    fn test_siblings_fired_together_stagger_by_index() {
        let (mut tree, _, cards) = services_page();
        let mut engine = RevealEngine::new(RevealConfig::default());
        let mut observer = TriggerObserver::new();
        let mut queue = TaskQueue::new();
        engine.mount(&mut tree, &mut observer);

        // Only the grid is in view
        let viewport = Viewport::new(1280.0, 800.0).scrolled_to(700.0);
        let delays = fire_all(&mut engine, &tree, &mut observer, &viewport, &mut queue);

        assert_eq!(delays, vec![ms(0), ms(100), ms(200), ms(300), ms(400)]);
        for (i, &card) in cards.iter().enumerate() {
            let target = engine.target(card).unwrap();
            assert_eq!(target.sibling_index, i);
            assert_eq!(target.state, RevealState::Scheduled);
        }
    }

    #[test]
    fn test_reveal_applies_after_delay() {
        let (mut tree, _, cards) = services_page();
        let mut engine = RevealEngine::new(RevealConfig::default());
        let mut observer = TriggerObserver::new();
        let mut queue = TaskQueue::new();
        engine.mount(&mut tree, &mut observer);

        let viewport = Viewport::new(1280.0, 800.0).scrolled_to(700.0);
        fire_all(&mut engine, &tree, &mut observer, &viewport, &mut queue);

        let mut run_until = |tree: &mut DocumentTree, deadline: Duration| {
            while let Some(task) = queue.pop_due(deadline) {
                if let Task::Reveal(node) = task {
                    engine.reveal(tree, node);
                }
            }
            queue.advance_clock(deadline);
        };

        run_until(&mut tree, ms(150));
        assert_eq!(tree.style(cards[0], "opacity").as_deref(), Some("1"));
        assert_eq!(tree.style(cards[0], "transform").as_deref(), Some("none"));
        assert_eq!(tree.style(cards[1], "opacity").as_deref(), Some("1"));
        assert_eq!(tree.style(cards[2], "opacity").as_deref(), Some("0"));

        run_until(&mut tree, ms(400));
        assert!(cards
            .iter()
            .all(|&card| tree.style(card, "opacity").as_deref() == Some("1")));
    }

    #[test]
    fn test_triggers_at_most_once() {
        let (mut tree, title, _) = services_page();
        let mut engine = RevealEngine::new(RevealConfig::default());
        let mut observer = TriggerObserver::new();
        let mut queue = TaskQueue::new();
        engine.mount(&mut tree, &mut observer);

        assert_eq!(engine.on_visible(&tree, title, &mut queue), Some(ms(0)));
        assert_eq!(engine.on_visible(&tree, title, &mut queue), None);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_lone_and_parentless_elements_have_no_delay() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let wrapper = tree.append(root, "div").finish();
        let only = tree.append(wrapper, "p").finish();
        let detached = tree.create_element("p");

        assert_eq!(sibling_index(&tree, only), 0);
        assert_eq!(sibling_index(&tree, detached), 0);
        assert_eq!(sibling_index(&tree, root), 0);
    }

    #[test]
    fn test_restores_authored_inline_style() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let tag = tree
            .append(root, "span")
            .class("section-tag")
            .style("transform", "rotate(-2deg)")
            .rect(0.0, 0.0, 100.0, 20.0)
            .finish();

        let mut engine = RevealEngine::new(RevealConfig::default());
        let mut observer = TriggerObserver::new();
        engine.mount(&mut tree, &mut observer);

        assert_eq!(
            engine.target(tag).unwrap().original.transform.as_deref(),
            Some("rotate(-2deg)")
        );
        assert!(engine.reveal(&mut tree, tag));
        assert_eq!(tree.style(tag, "transform").as_deref(), Some("rotate(-2deg)"));
        assert!(!engine.reveal(&mut tree, tag));
    }

    #[test]
    fn test_custom_stagger_and_transition() {
        let config = RevealConfig {
            stagger_ms: 50,
            duration_ms: 250,
            easing: Easing::EaseOut,
            ..Default::default()
        };
        let engine = RevealEngine::new(config);

        assert_eq!(engine.stagger_delay(3), ms(150));
        assert_eq!(
            engine.transition(),
            "opacity 0.25s ease-out, transform 0.25s ease-out"
        );
    }
}

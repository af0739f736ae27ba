//! One-shot visibility observer
//!
//! Each observation carries a payload. The first time the observed element's
//! visible fraction reaches the observation's threshold, the payload is moved
//! out and the observation is dropped, so delivery happens at most once no
//! matter how often the element scrolls in and out afterwards.

use glint_core::{Document, NodeId, Rect};
use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use crate::viewport::{RootMargin, Viewport};

new_key_type! {
    pub struct ObservationId;
}

/// When an observed element counts as visible
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ObserveOptions {
    /// Required visible fraction of the element's area, 0.0 to 1.0
    pub threshold: f32,
    /// Adjustment applied to the viewport before measuring
    pub root_margin: RootMargin,
}

impl ObserveOptions {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            root_margin: RootMargin::zero(),
        }
    }

    pub fn with_root_margin(mut self, root_margin: RootMargin) -> Self {
        self.root_margin = root_margin;
        self
    }
}

struct Observation<T> {
    node: NodeId,
    options: ObserveOptions,
    payload: T,
    seq: u64,
}

/// A delivered visibility notification
#[derive(Debug)]
pub struct Fired<T> {
    pub id: ObservationId,
    pub node: NodeId,
    /// Visible fraction at the moment of firing
    pub ratio: f32,
    pub payload: T,
}

/// Tracks elements until they first become visible
pub struct VisibilityObserver<T> {
    observations: SlotMap<ObservationId, Observation<T>>,
    next_seq: u64,
}

impl<T: PartialEq> VisibilityObserver<T> {
    pub fn new() -> Self {
        Self {
            observations: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Start tracking an element.
    ///
    /// Returns `None` (and does nothing) when the document does not contain
    /// the element. Observing the same element with an equal payload again
    /// returns the existing observation.
    pub fn observe<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        node: NodeId,
        options: ObserveOptions,
        payload: T,
    ) -> Option<ObservationId> {
        if !doc.contains(node) {
            return None;
        }

        if let Some((id, _)) = self
            .observations
            .iter()
            .find(|(_, obs)| obs.node == node && obs.payload == payload)
        {
            return Some(id);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        Some(self.observations.insert(Observation {
            node,
            options,
            payload,
            seq,
        }))
    }

    /// Stop tracking; unknown or already-fired ids are ignored
    pub fn unobserve(&mut self, id: ObservationId) -> Option<T> {
        self.observations.remove(id).map(|obs| obs.payload)
    }

    pub fn is_observing(&self, node: NodeId) -> bool {
        self.observations.values().any(|obs| obs.node == node)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Evaluate every observation against a new viewport.
    ///
    /// Observations that reached their threshold are removed and returned in
    /// the order they were registered.
    pub fn process<D: Document + ?Sized>(&mut self, doc: &D, viewport: &Viewport) -> Vec<Fired<T>> {
        let root = viewport.root_rect();

        let mut ready: Vec<(u64, ObservationId, f32)> = self
            .observations
            .iter()
            .filter_map(|(id, obs)| {
                let target = doc.bounding_rect(obs.node)?;
                let ratio = intersection_ratio(target, obs.options.root_margin.apply(root))?;
                (ratio >= obs.options.threshold).then_some((obs.seq, id, ratio))
            })
            .collect();
        ready.sort_by_key(|(seq, _, _)| *seq);

        ready
            .into_iter()
            .filter_map(|(_, id, ratio)| {
                let obs = self.observations.remove(id)?;
                trace!(?obs.node, ratio, "element became visible");
                Some(Fired {
                    id,
                    node: obs.node,
                    ratio,
                    payload: obs.payload,
                })
            })
            .collect()
    }
}

impl<T: PartialEq> Default for VisibilityObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Visible fraction of `target` within `root`.
///
/// `None` when the two do not touch at all. A zero-area target that touches
/// the root counts as fully visible.
pub fn intersection_ratio(target: Rect, root: Rect) -> Option<f32> {
    let overlap = target.intersection(&root)?;
    let area = target.area();
    if area == 0.0 {
        return Some(1.0);
    }
    Some((overlap.area() / area).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::DocumentTree;

    fn page_with_box(y: f32, height: f32) -> (DocumentTree, NodeId) {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let node = tree.append(root, "section").rect(0.0, y, 400.0, height).finish();
        (tree, node)
    }

    #[test]
    fn test_options_clamp_threshold() {
        assert_eq!(ObserveOptions::new(1.5).threshold, 1.0);
        assert_eq!(ObserveOptions::new(-0.2).threshold, 0.0);
        assert_eq!(ObserveOptions::new(0.5).root_margin, RootMargin::zero());
    }

    #[test]
    fn test_ratio_partial() {
        let ratio = intersection_ratio(
            Rect::new(0.0, 600.0, 100.0, 200.0),
            Rect::new(0.0, 0.0, 1000.0, 700.0),
        );
        assert_eq!(ratio, Some(0.5));
    }

    #[test]
    fn test_ratio_zero_area_target() {
        let root = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(intersection_ratio(Rect::new(10.0, 10.0, 0.0, 0.0), root), Some(1.0));
        assert_eq!(intersection_ratio(Rect::new(10.0, 200.0, 0.0, 0.0), root), None);
    }

    #[test]
    fn test_fires_once_at_threshold() {
        let (tree, node) = page_with_box(1000.0, 100.0);
        let mut observer = VisibilityObserver::new();
        observer.observe(&tree, node, ObserveOptions::new(0.5), "stat");

        let viewport = Viewport::new(800.0, 600.0);
        // 40% visible
        assert!(observer.process(&tree, &viewport.scrolled_to(440.0)).is_empty());

        // 60% visible
        let fired = observer.process(&tree, &viewport.scrolled_to(460.0));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].node, node);
        assert_eq!(fired[0].payload, "stat");
        assert!(observer.is_empty());

        // Scrolling away and back never fires again
        for y in [0.0, 500.0, 0.0, 900.0] {
            assert!(observer.process(&tree, &viewport.scrolled_to(y)).is_empty());
        }
    }

    #[test]
    fn test_root_margin_delays_firing() {
        let (tree, node) = page_with_box(620.0, 100.0);
        let options =
            ObserveOptions::new(0.1).with_root_margin(RootMargin::px(0.0, 0.0, -50.0, 0.0));
        let viewport = Viewport::new(800.0, 700.0);

        let mut observer = VisibilityObserver::new();
        observer.observe(&tree, node, options, ());

        // Root bottom is 650: 30px of 100 visible
        let fired = observer.process(&tree, &viewport);
        assert_eq!(fired.len(), 1);

        let mut strict = VisibilityObserver::new();
        strict.observe(&tree, node, options, ());
        // Root bottom is 600 when scrolled up 50px: nothing visible
        let scrolled_up = Viewport {
            scroll_y: -50.0,
            ..viewport
        };
        assert!(strict.process(&tree, &scrolled_up).is_empty());
    }

    #[test]
    fn test_missing_element_is_noop() {
        let (tree, _) = page_with_box(0.0, 10.0);
        // A key from a larger tree points past the end of this one
        let mut other = DocumentTree::new();
        for _ in 0..8 {
            other.create_element("div");
        }
        let foreign = other.create_element("div");

        let mut observer = VisibilityObserver::new();
        assert_eq!(observer.observe(&tree, foreign, ObserveOptions::new(0.0), ()), None);
        assert!(observer.is_empty());
    }

    #[test]
    fn test_duplicate_observe_is_idempotent() {
        let (tree, node) = page_with_box(0.0, 10.0);
        let mut observer = VisibilityObserver::new();

        let first = observer.observe(&tree, node, ObserveOptions::new(0.1), 1);
        let second = observer.observe(&tree, node, ObserveOptions::new(0.1), 1);
        let other = observer.observe(&tree, node, ObserveOptions::new(0.1), 2);

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(observer.len(), 2);
    }

    #[test]
    fn test_fired_in_registration_order() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let a = tree.append(root, "div").rect(0.0, 0.0, 10.0, 10.0).finish();
        let b = tree.append(root, "div").rect(0.0, 20.0, 10.0, 10.0).finish();

        let mut observer = VisibilityObserver::new();
        observer.observe(&tree, b, ObserveOptions::new(0.1), 'b');
        observer.observe(&tree, a, ObserveOptions::new(0.1), 'a');
        let removed = observer.observe(&tree, a, ObserveOptions::new(0.1), 'x').unwrap();
        assert_eq!(observer.unobserve(removed), Some('x'));
        assert_eq!(observer.unobserve(removed), None);

        let fired: Vec<char> = observer
            .process(&tree, &Viewport::new(100.0, 100.0))
            .into_iter()
            .map(|f| f.payload)
            .collect();
        assert_eq!(fired, vec!['b', 'a']);
    }

    #[test]
    fn test_element_without_box_never_fires() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let hidden = tree.append(root, "div").finish();

        let mut observer = VisibilityObserver::new();
        observer.observe(&tree, hidden, ObserveOptions::new(0.0), ());
        assert!(observer.process(&tree, &Viewport::default()).is_empty());
        assert!(observer.is_observing(hidden));
    }
}

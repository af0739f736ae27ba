//! Page runtime
//!
//! [`GlintApp`] owns a document together with every effect engine, the
//! visibility observer and the virtual-time task queue. The host pushes
//! viewport changes and pointer moves in and advances time; the app routes
//! visibility triggers to the engines and runs due tasks in order.

use std::time::Duration;

use glint_animation::{DelaySource, RandomDelay};
use glint_core::{Document, DocumentTree};
use glint_effects::{
    CounterEngine, ParallaxEngine, RevealEngine, Task, TaskQueue, Trigger, TriggerObserver,
    TypewriterEngine,
};
use glint_viewport::{Fired, Viewport};
use tracing::debug;

use crate::config::SiteConfig;

pub struct GlintApp<D: Document = DocumentTree> {
    document: D,
    config: SiteConfig,
    viewport: Viewport,
    queue: TaskQueue,
    observer: TriggerObserver,
    delays: Box<dyn DelaySource>,
    reveal: RevealEngine,
    counter: CounterEngine,
    typewriter: TypewriterEngine,
    parallax: ParallaxEngine,
    mounted: bool,
}

impl<D: Document> GlintApp<D> {
    /// Create an unmounted app with entropy-seeded typing jitter
    pub fn new(document: D, config: SiteConfig, viewport: Viewport) -> Self {
        Self {
            document,
            reveal: RevealEngine::new(config.reveal.clone()),
            counter: CounterEngine::new(config.counter.clone()),
            typewriter: TypewriterEngine::new(config.typewriter.clone()),
            parallax: ParallaxEngine::new(config.parallax.clone()),
            config,
            viewport,
            queue: TaskQueue::new(),
            observer: TriggerObserver::new(),
            delays: Box::new(RandomDelay::from_entropy()),
            mounted: false,
        }
    }

    /// Replace the source of per-character typing delays
    pub fn with_delay_source(mut self, delays: impl DelaySource + 'static) -> Self {
        self.delays = Box::new(delays);
        self
    }

    /// Initialise every effect, then evaluate visibility for the current viewport.
    ///
    /// Calling this more than once has no further effect.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;

        let revealed = self.reveal.mount(&mut self.document, &mut self.observer);
        let counters = self.counter.mount(&self.document, &mut self.observer);
        let typewriter = self
            .typewriter
            .mount(&mut self.document, &mut self.observer, &self.viewport);
        let parallax = self.parallax.mount(&self.document, &self.viewport);
        debug!(revealed, counters, typewriter, parallax, "page mounted");

        self.process_visibility();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.process_visibility();
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.set_viewport(self.viewport.scrolled_to(y));
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.set_viewport(Viewport {
            width,
            height,
            ..self.viewport
        });
    }

    /// Pointer moved to client position `(x, y)`. Returns whether anything moved.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.parallax
            .on_pointer_move(&mut self.document, &self.viewport, x, y)
    }

    /// Advance virtual time by `dt`, running every task that falls due.
    ///
    /// Tasks scheduled while advancing run in the same call when they are due
    /// before the new time. Returns the number of tasks run.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let deadline = self.queue.now().saturating_add(dt);
        let ran = self.run_due(deadline);
        self.queue.advance_clock(deadline);
        ran
    }

    /// Run tasks until none are pending or `limit` has elapsed.
    ///
    /// `Duration::MAX` means no limit. The clock stops at the last task run.
    /// Returns the number of tasks run.
    pub fn run_until_idle(&mut self, limit: Duration) -> usize {
        let deadline = self.queue.now().saturating_add(limit);
        self.run_due(deadline)
    }

    fn run_due(&mut self, deadline: Duration) -> usize {
        let mut ran = 0;
        while let Some(task) = self.queue.pop_due(deadline) {
            self.dispatch(task);
            ran += 1;
        }
        ran
    }

    fn dispatch(&mut self, task: Task) {
        match task {
            Task::Reveal(node) => {
                self.reveal.reveal(&mut self.document, node);
            }
            Task::CounterFrame(stat) => {
                self.counter.frame(&mut self.document, stat, &mut self.queue);
            }
            Task::TypewriterStep => {
                self.typewriter
                    .step(&mut self.document, &mut self.queue, &mut *self.delays);
            }
            Task::TypewriterCursorExpired => {
                self.typewriter.expire_cursor(&mut self.document);
            }
        }
    }

    fn process_visibility(&mut self) {
        for Fired { node, payload, .. } in self.observer.process(&self.document, &self.viewport) {
            match payload {
                Trigger::Reveal => {
                    self.reveal.on_visible(&self.document, node, &mut self.queue);
                }
                Trigger::Counter => {
                    self.counter.on_visible(node, &mut self.queue);
                }
                Trigger::Typewriter => {
                    self.typewriter
                        .on_visible(&mut self.document, node, &mut self.queue);
                }
            }
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn into_document(self) -> D {
        self.document
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.queue.now()
    }

    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Elements still waiting to become visible
    pub fn pending_observations(&self) -> usize {
        self.observer.len()
    }

    pub fn reveal(&self) -> &RevealEngine {
        &self.reveal
    }

    pub fn counter(&self) -> &CounterEngine {
        &self.counter
    }

    pub fn typewriter(&self) -> &TypewriterEngine {
        &self.typewriter
    }

    pub fn parallax(&self) -> &ParallaxEngine {
        &self.parallax
    }
}

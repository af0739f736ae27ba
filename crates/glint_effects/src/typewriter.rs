//! Typewriter playback of syntax-highlighted code
//!
//! A [`Typewriter`] is a state machine over `(line, char)`. Each call to
//! [`Typewriter::advance`] produces the next rendering and the delay before the
//! following step:
//!
//! - while the current line is incomplete, the completed lines are shown with
//!   their highlighting and the current line as escaped plain text, one more
//!   character each step
//! - when the line is complete it is re-rendered with its highlighting and the
//!   machine pauses before the next line
//! - after the last line the full markup is shown with a cursor that lingers
//!   before being removed
//!
//! The partial line is always plain text, so a half-typed tag never reaches
//! the document. [`TypewriterEngine`] wires the machine to a container element,
//! the visibility observer and the task queue.

use std::ops::Range;
use std::time::Duration;

use glint_animation::DelaySource;
use glint_core::markup::{escape_text, plain_text, split_lines};
use glint_core::{Document, NodeId, Selector};
use glint_viewport::{ObserveOptions, RootMargin, Viewport};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::task::{Task, TaskQueue, Trigger, TriggerObserver};

/// Blinking cursor appended after the typed content
pub const CURSOR_MARKUP: &str = r#"<span class="typing-cursor">|</span>"#;

/// The hero code window's highlighted snippet, one entry per line
pub const DEFAULT_SNIPPET: &[&str] = &[
    r#"<span class="keyword">const</span> <span class="variable">codezyro</span> = {"#,
    r#"    <span class="property">missão</span>: <span class="string">"Simplificar"</span>,"#,
    r#"    <span class="property">foco</span>: <span class="string">"Resultados"</span>,"#,
    r#"    <span class="property">método</span>: <span class="string">"Ágil"</span>,"#,
    "    ",
    r#"    <span class="function">transformar</span>(<span class="param">problema</span>) {"#,
    r#"        <span class="keyword">return</span> <span class="variable">solução</span>.<span class="function">digital</span>();"#,
    "    }",
    "};",
];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypewriterConfig {
    /// Code container
    #[serde(default = "default_selector")]
    pub selector: Selector,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default)]
    pub root_margin: RootMargin,
    /// Delay between the container becoming visible and the first step
    #[serde(default = "default_start_delay_ms")]
    pub start_delay_ms: u64,
    /// Pause after each completed line
    #[serde(default = "default_line_pause_ms")]
    pub line_pause_ms: u64,
    /// Per-character delay is drawn from `min..max`
    #[serde(default = "default_min_char_delay_ms")]
    pub min_char_delay_ms: u64,
    #[serde(default = "default_max_char_delay_ms")]
    pub max_char_delay_ms: u64,
    /// How long the final cursor stays
    #[serde(default = "default_cursor_linger_ms")]
    pub cursor_linger_ms: u64,
    /// Narrower viewports keep the authored markup untouched
    #[serde(default = "default_min_viewport_width")]
    pub min_viewport_width: f32,
    /// Lines to type; the container's own markup split on newlines when unset.
    /// Elements spanning a line break are closed and reopened per line.
    #[serde(default)]
    pub lines: Option<Vec<String>>,
}

fn default_selector() -> Selector {
    Selector::parse(".window-body code").expect("default typewriter selector is valid")
}

fn default_threshold() -> f32 {
    0.3
}

fn default_start_delay_ms() -> u64 {
    300
}

fn default_line_pause_ms() -> u64 {
    200
}

fn default_min_char_delay_ms() -> u64 {
    20
}

fn default_max_char_delay_ms() -> u64 {
    50
}

fn default_cursor_linger_ms() -> u64 {
    2000
}

fn default_min_viewport_width() -> f32 {
    768.0
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            threshold: default_threshold(),
            root_margin: RootMargin::zero(),
            start_delay_ms: default_start_delay_ms(),
            line_pause_ms: default_line_pause_ms(),
            min_char_delay_ms: default_min_char_delay_ms(),
            max_char_delay_ms: default_max_char_delay_ms(),
            cursor_linger_ms: default_cursor_linger_ms(),
            min_viewport_width: default_min_viewport_width(),
            lines: None,
        }
    }
}

impl TypewriterConfig {
    pub fn timing(&self) -> TypewriterTiming {
        TypewriterTiming {
            char_delay: Duration::from_millis(self.min_char_delay_ms)
                ..Duration::from_millis(self.max_char_delay_ms),
            line_pause: Duration::from_millis(self.line_pause_ms),
            cursor_linger: Duration::from_millis(self.cursor_linger_ms),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypewriterTiming {
    pub char_delay: Range<Duration>,
    pub line_pause: Duration,
    pub cursor_linger: Duration,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        TypewriterConfig::default().timing()
    }
}

/// One line of highlighted code
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypewriterLine {
    pub markup: String,
    /// Text content with tags stripped and entities decoded
    pub plain: String,
    /// Length of `plain` in characters
    pub len: usize,
}

impl TypewriterLine {
    pub fn new(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let plain = plain_text(&markup);
        let len = plain.chars().count();
        Self { markup, plain, len }
    }

    /// Escaped markup for the first `chars` characters of the line
    fn typed_prefix(&self, chars: usize) -> String {
        let prefix: String = self.plain.chars().take(chars).collect();
        escape_text(&prefix)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypewriterCursor {
    pub line: usize,
    pub char_index: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypewriterPhase {
    #[default]
    Idle,
    Playing,
    Finished,
}

/// Outcome of one typewriter step
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// One more character of the current line
    Typed { markup: String, delay: Duration },
    /// Current line shown with highlighting
    LineCommitted { markup: String, delay: Duration },
    /// Everything typed; the cursor lingers for `cursor_linger`
    Finished { markup: String, cursor_linger: Duration },
    /// Nothing left to do
    Halted,
}

impl Step {
    pub fn markup(&self) -> Option<&str> {
        match self {
            Step::Typed { markup, .. }
            | Step::LineCommitted { markup, .. }
            | Step::Finished { markup, .. } => Some(markup),
            Step::Halted => None,
        }
    }
}

/// Character-by-character playback over a list of lines
#[derive(Clone, Debug)]
pub struct Typewriter {
    lines: Vec<TypewriterLine>,
    cursor: TypewriterCursor,
    phase: TypewriterPhase,
    timing: TypewriterTiming,
}

impl Typewriter {
    pub fn new<I, S>(lines: I, timing: TypewriterTiming) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(TypewriterLine::new).collect(),
            cursor: TypewriterCursor::default(),
            phase: TypewriterPhase::Idle,
            timing,
        }
    }

    pub fn lines(&self) -> &[TypewriterLine] {
        &self.lines
    }

    pub fn cursor(&self) -> TypewriterCursor {
        self.cursor
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    pub fn timing(&self) -> &TypewriterTiming {
        &self.timing
    }

    /// Highlighted markup of the first `count` lines joined by newlines
    pub fn committed_markup(&self, count: usize) -> String {
        self.lines[..count.min(self.lines.len())]
            .iter()
            .map(|line| line.markup.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Content once playback is complete, without the cursor
    pub fn final_markup(&self) -> String {
        self.committed_markup(self.lines.len())
    }

    /// Produce the next rendering
    pub fn advance(&mut self, delays: &mut dyn DelaySource) -> Step {
        if self.lines.is_empty() || self.phase == TypewriterPhase::Finished {
            return Step::Halted;
        }
        self.phase = TypewriterPhase::Playing;

        let TypewriterCursor { line, char_index } = self.cursor;
        if line >= self.lines.len() {
            self.phase = TypewriterPhase::Finished;
            return Step::Finished {
                markup: format!("{}{CURSOR_MARKUP}", self.final_markup()),
                cursor_linger: self.timing.cursor_linger,
            };
        }

        let current = &self.lines[line];
        if char_index < current.len {
            let mut markup = self.committed_markup(line);
            if line > 0 {
                markup.push('\n');
            }
            markup.push_str(&current.typed_prefix(char_index + 1));
            markup.push_str(CURSOR_MARKUP);

            self.cursor.char_index += 1;
            Step::Typed {
                markup,
                delay: delays.sample(self.timing.char_delay.clone()),
            }
        } else {
            let markup = format!("{}{CURSOR_MARKUP}", self.committed_markup(line + 1));
            self.cursor = TypewriterCursor {
                line: line + 1,
                char_index: 0,
            };
            Step::LineCommitted {
                markup,
                delay: self.timing.line_pause,
            }
        }
    }
}

/// Drives a [`Typewriter`] over the page's code container
pub struct TypewriterEngine {
    config: TypewriterConfig,
    container: Option<NodeId>,
    typewriter: Option<Typewriter>,
    started: bool,
}

impl TypewriterEngine {
    pub fn new(config: TypewriterConfig) -> Self {
        Self {
            config,
            container: None,
            typewriter: None,
            started: false,
        }
    }

    pub fn config(&self) -> &TypewriterConfig {
        &self.config
    }

    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    pub fn typewriter(&self) -> Option<&Typewriter> {
        self.typewriter.as_ref()
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.typewriter
            .as_ref()
            .map(Typewriter::phase)
            .unwrap_or_default()
    }

    /// Hide the container and wait for it to become visible.
    ///
    /// Does nothing, and returns false, when the container is missing, the
    /// viewport is too narrow or there is nothing to type.
    pub fn mount<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        observer: &mut TriggerObserver,
        viewport: &Viewport,
    ) -> bool {
        if self.container.is_some() {
            return false;
        }
        let Some(container) = doc.select_first(&self.config.selector) else {
            return false;
        };
        if viewport.width < self.config.min_viewport_width {
            return false;
        }

        let lines = match &self.config.lines {
            Some(lines) => lines.clone(),
            None => {
                let authored = doc.inner_markup(container).unwrap_or_default();
                if authored.is_empty() {
                    Vec::new()
                } else {
                    split_lines(&authored)
                }
            }
        };
        if lines.is_empty() {
            return false;
        }

        let options =
            ObserveOptions::new(self.config.threshold).with_root_margin(self.config.root_margin);
        doc.set_style(container, "opacity", "0");
        observer.observe(&*doc, container, options, Trigger::Typewriter);

        debug!(lines = lines.len(), "typewriter mounted");
        self.typewriter = Some(Typewriter::new(lines, self.config.timing()));
        self.container = Some(container);
        true
    }

    /// Clear and show the container, then start typing after the start delay
    pub fn on_visible<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        node: NodeId,
        queue: &mut TaskQueue,
    ) -> bool {
        if self.started || self.container != Some(node) {
            return false;
        }
        self.started = true;

        doc.set_inner_markup(node, String::new());
        doc.set_style(node, "opacity", "1");
        queue.schedule(Duration::from_millis(self.config.start_delay_ms), Task::TypewriterStep);
        debug!("typewriter started");
        true
    }

    /// Render the next step and schedule the one after it
    pub fn step<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        queue: &mut TaskQueue,
        delays: &mut dyn DelaySource,
    ) -> Step {
        let (Some(container), Some(typewriter)) = (self.container, self.typewriter.as_mut()) else {
            return Step::Halted;
        };

        let step = typewriter.advance(delays);
        match &step {
            Step::Typed { markup, delay } | Step::LineCommitted { markup, delay } => {
                doc.set_inner_markup(container, markup.clone());
                queue.schedule(*delay, Task::TypewriterStep);
                trace!(cursor = ?typewriter.cursor(), "typewriter step");
            }
            Step::Finished {
                markup,
                cursor_linger,
            } => {
                doc.set_inner_markup(container, markup.clone());
                queue.schedule(*cursor_linger, Task::TypewriterCursorExpired);
                debug!("typewriter finished");
            }
            Step::Halted => {}
        }
        step
    }

    /// Remove the trailing cursor. Returns false if there was none.
    pub fn expire_cursor<D: Document + ?Sized>(&mut self, doc: &mut D) -> bool {
        let Some(container) = self.container else {
            return false;
        };
        let Some(mut markup) = doc.inner_markup(container) else {
            return false;
        };
        let Some(at) = markup.rfind(CURSOR_MARKUP) else {
            return false;
        };

        markup.replace_range(at..at + CURSOR_MARKUP.len(), "");
        doc.set_inner_markup(container, markup);
        true
    }
}

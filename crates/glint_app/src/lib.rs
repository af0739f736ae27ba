//! Glint App
//!
//! Ties the effects to a page:
//!
//! - [`GlintApp`]: owns a document, the engines, the visibility observer and
//!   the virtual-time task queue
//! - [`SiteConfig`]: `glint.toml` loading with per-effect defaults
//! - headless scenarios: replay scrolls, waits and pointer moves against an
//!   in-memory page and check the result, producing a JSON report
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use glint_app::{GlintApp, SiteConfig};
//! use glint_core::{Document, DocumentTree};
//! use glint_viewport::Viewport;
//!
//! let mut page = DocumentTree::new();
//! let root = page.root();
//! let stat = page
//!     .append(root, "div")
//!     .class("stat")
//!     .attr("data-target", "250")
//!     .rect(0.0, 100.0, 200.0, 80.0)
//!     .finish();
//! let counter = page.append(stat, "span").class("counter").text("0").finish();
//!
//! let mut app = GlintApp::new(page, SiteConfig::default(), Viewport::new(1280.0, 720.0));
//! app.mount();
//! app.advance(Duration::from_secs(2));
//!
//! assert_eq!(app.document().text_content(counter).as_deref(), Some("250"));
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod headless_assert;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_runtime;
pub mod headless_scenario;

pub use app::GlintApp;
pub use config::{SiteConfig, CONFIG_FILE};
pub use error::{ConfigError, Result};
pub use headless_report::{HeadlessReport, ReportStatus};
pub use headless_runner::{run_loaded_scenario, run_scenario, RunOutcome};
pub use headless_runtime::{HeadlessRunConfig, HeadlessRuntime};
pub use headless_scenario::{HeadlessScenario, ScenarioStep};

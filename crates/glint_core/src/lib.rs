//! Glint Core
//!
//! Foundational primitives shared by every Glint crate:
//!
//! - **Document capability**: the [`Document`] trait, the only way effects touch a page
//! - **Selectors**: a small CSS selector subset for locating effect targets
//! - **Markup helpers**: plain-text extraction and escaping for rich-text fragments
//! - **Document tree**: an in-memory [`Document`] used for headless runs and tests
//!
//! # Example
//!
//! ```rust
//! use glint_core::{Document, DocumentTree, Selector};
//!
//! let mut tree = DocumentTree::new();
//! let root = tree.root();
//! let stat = tree.append(root, "div").class("stat").attr("data-target", "1500").finish();
//! let counter = tree.append(stat, "span").class("counter").text("0").finish();
//!
//! let selector: Selector = ".stat[data-target] .counter".parse().unwrap();
//! assert_eq!(tree.select_first(&selector), Some(counter));
//! ```

pub mod dom;
pub mod error;
pub mod geometry;
pub mod markup;
pub mod selector;
pub mod tree;

pub use dom::{Document, NodeId};
pub use error::SelectorError;
pub use geometry::Rect;
pub use selector::Selector;
pub use tree::{DocumentTree, ElementBuilder};

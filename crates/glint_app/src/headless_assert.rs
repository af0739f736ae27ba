//! Assertion helpers for headless scenario checks.

use glint_core::{Document, NodeId, Selector};

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

fn missing(selector: &Selector) -> AssertionResult {
    AssertionResult::Failed {
        code: "missing_element".to_string(),
        message: format!("{selector}: element not found"),
    }
}

fn first_match<D: Document + ?Sized>(
    doc: &D,
    selector: &Selector,
) -> Result<NodeId, AssertionResult> {
    doc.select_first(selector).ok_or_else(|| missing(selector))
}

pub fn evaluate_assert_exists<D: Document + ?Sized>(
    doc: &D,
    selector: &Selector,
) -> AssertionResult {
    match first_match(doc, selector) {
        Ok(_) => AssertionResult::Passed,
        Err(failed) => failed,
    }
}

pub fn evaluate_assert_text<D: Document + ?Sized>(
    doc: &D,
    selector: &Selector,
    expected: &str,
) -> AssertionResult {
    evaluate_text(doc, selector, |text| {
        (text == expected).then_some(()).ok_or_else(|| {
            format!("{selector}: expected text '{expected}', got '{text}'")
        })
    })
}

pub fn evaluate_assert_text_contains<D: Document + ?Sized>(
    doc: &D,
    selector: &Selector,
    expected: &str,
) -> AssertionResult {
    evaluate_text(doc, selector, |text| {
        text.contains(expected).then_some(()).ok_or_else(|| {
            format!("{selector}: expected substring '{expected}', got '{text}'")
        })
    })
}

fn evaluate_text<D, F>(doc: &D, selector: &Selector, check: F) -> AssertionResult
where
    D: Document + ?Sized,
    F: FnOnce(&str) -> Result<(), String>,
{
    let node = match first_match(doc, selector) {
        Ok(node) => node,
        Err(failed) => return failed,
    };
    let Some(text) = doc.text_content(node) else {
        return AssertionResult::Failed {
            code: "missing_text".to_string(),
            message: format!("{selector}: text not available"),
        };
    };
    match check(&text) {
        Ok(()) => AssertionResult::Passed,
        Err(message) => AssertionResult::Failed {
            code: "text_mismatch".to_string(),
            message,
        },
    }
}

pub fn evaluate_assert_style<D: Document + ?Sized>(
    doc: &D,
    selector: &Selector,
    property: &str,
    expected: &str,
) -> AssertionResult {
    let node = match first_match(doc, selector) {
        Ok(node) => node,
        Err(failed) => return failed,
    };
    match doc.style(node, property) {
        Some(actual) if actual == expected => AssertionResult::Passed,
        Some(actual) => AssertionResult::Failed {
            code: "style_mismatch".to_string(),
            message: format!("{selector}: expected {property} '{expected}', got '{actual}'"),
        },
        None => AssertionResult::Failed {
            code: "missing_style".to_string(),
            message: format!("{selector}: no inline {property}"),
        },
    }
}

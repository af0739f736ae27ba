//! Scenario runner that replays user actions against a mounted page.

use anyhow::Result;
use glint_core::Document;
use tracing::debug;

use crate::config::SiteConfig;
use crate::headless_assert::{
    evaluate_assert_exists, evaluate_assert_style, evaluate_assert_text,
    evaluate_assert_text_contains, AssertionResult,
};
use crate::headless_report::HeadlessReport;
use crate::headless_runtime::{HeadlessRunConfig, HeadlessRuntime};
use crate::headless_scenario::{HeadlessScenario, ScenarioStep};

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Mount `document` and execute scenario JSON against it.
pub fn run_scenario<D: Document>(
    input: &str,
    document: D,
    config: SiteConfig,
    runtime_cfg: HeadlessRunConfig,
) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    let mut runtime = HeadlessRuntime::new(document, config, runtime_cfg)?;
    Ok(run_loaded_scenario(&scenario, &mut runtime))
}

/// Execute a pre-loaded scenario on an already mounted page.
///
/// Stops at the first failing assertion.
pub fn run_loaded_scenario<D: Document>(
    scenario: &HeadlessScenario,
    runtime: &mut HeadlessRuntime<D>,
) -> RunOutcome {
    for (step_index, step) in scenario.steps.iter().enumerate() {
        let (assertion, result) = match step {
            ScenarioStep::Wait { ms } => {
                runtime.wait(*ms);
                continue;
            }
            ScenarioStep::Scroll { y } => {
                runtime.app_mut().scroll_to(*y);
                continue;
            }
            ScenarioStep::Resize { width, height } => {
                runtime.app_mut().resize(*width, *height);
                continue;
            }
            ScenarioStep::Pointer { x, y } => {
                runtime.app_mut().pointer_move(*x, *y);
                continue;
            }
            ScenarioStep::AssertExists { selector } => (
                "assert_exists",
                evaluate_assert_exists(runtime.app().document(), selector),
            ),
            ScenarioStep::AssertText { selector, value } => (
                "assert_text",
                evaluate_assert_text(runtime.app().document(), selector, value),
            ),
            ScenarioStep::AssertTextContains { selector, value } => (
                "assert_text_contains",
                evaluate_assert_text_contains(runtime.app().document(), selector, value),
            ),
            ScenarioStep::AssertStyle {
                selector,
                property,
                value,
            } => (
                "assert_style",
                evaluate_assert_style(runtime.app().document(), selector, property, value),
            ),
        };

        if let AssertionResult::Failed { message, .. } = result {
            debug!(step_index, assertion, %message, "scenario failed");
            let report = HeadlessReport::failed(
                assertion,
                step_index,
                message,
                runtime.elapsed_ms(),
                runtime.tasks_run(),
            );
            return RunOutcome::Failed { report };
        }
    }

    RunOutcome::Passed {
        report: HeadlessReport::passed(runtime.elapsed_ms(), runtime.tasks_run()),
    }
}

//! Playground: a scratchpad with a nested, step-based test runner.
//!
//! The browser page (served on `*.playground` requests) carries the
//! interactive surfaces and runs user scripts against them. This module is
//! the headless counterpart: the same surfaces modelled in memory and the
//! same tree-structured runner protocol, usable and testable without a DOM.

pub mod page;
pub mod runner;
pub mod surfaces;

pub use runner::{run_test, StepError, StepResult, TestContext, TestNode};
pub use surfaces::{Code, Logs, NodeHandle, Preview, PreviewContent};

use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// The playground's surfaces plus the test entry point.
#[derive(Debug, Default)]
pub struct Playground {
    code: Code,
    preview: Preview,
    logs: Logs,
}

impl Playground {
    /// Create a playground with empty surfaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// The editable code surface.
    pub fn code(&self) -> &Code {
        &self.code
    }

    /// The preview surface.
    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    /// The append-only log surface.
    pub fn logs(&self) -> &Logs {
        &self.logs
    }

    /// Add a log entry. Alias for `logs().add()`.
    pub fn log(&self, parts: &[Value]) {
        self.logs.add(parts);
    }

    /// Run a test and flush its report to the log surface.
    ///
    /// Returns whether the whole tree passed.
    pub async fn test<F, Fut>(&self, name: &str, f: F) -> bool
    where
        F: FnOnce(TestContext) -> Fut,
        Fut: Future<Output = StepResult>,
    {
        let node = run_test(name, f).await;
        runner::render_report(&node, &self.logs);
        node.passed
    }

    /// Pause execution for the given number of milliseconds.
    pub async fn sleep(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Render a value the way the log surface does: strings bare, everything
/// else as JSON.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_value_strings_are_bare() {
        assert_eq!(render_value(&json!("hello")), "hello");
        assert_eq!(render_value(&json!(42)), "42");
        assert_eq!(render_value(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_playground_test_flushes_report() {
        let playground = Playground::new();

        let passed = playground
            .test("smoke", |_t| async { Ok(Some(json!("done"))) })
            .await;

        assert!(passed);
        let logs = playground.logs().get();
        assert_eq!(logs[0], "# smoke ... Passed");
        assert_eq!(logs[1], "Result: done");
    }

    #[tokio::test]
    async fn test_log_alias_appends() {
        let playground = Playground::new();
        playground.log(&[json!("a"), json!(1)]);
        assert_eq!(playground.logs().get(), vec!["a 1".to_string()]);
    }
}

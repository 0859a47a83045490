//! Tree-structured test runner.
//!
//! `run_test` executes a root function that receives a [`TestContext`]; the
//! context's `step` nests to arbitrary depth, building a result tree in call
//! order. A node passes when its own function returns `Ok` and every child it
//! recorded passed. Steps are awaited sequentially by convention; callers
//! that race unawaited steps keep insertion order but own the aggregation
//! consequences.

use crate::playground::render_value;
use crate::playground::surfaces::Logs;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Outcome of a step function: an optional result value, or the thrown
/// exception value.
pub type StepResult = std::result::Result<Option<Value>, StepError>;

/// The exception value recorded on a failing node.
#[derive(Debug, Clone)]
pub struct StepError(Value);

impl StepError {
    /// Wrap any JSON-representable value as an exception.
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// The wrapped value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    fn into_value(self) -> Value {
        self.0
    }
}

impl From<&str> for StepError {
    fn from(message: &str) -> Self {
        Self(Value::String(message.to_string()))
    }
}

impl From<String> for StepError {
    fn from(message: String) -> Self {
        Self(Value::String(message))
    }
}

impl std::fmt::Display for StepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", render_value(&self.0))
    }
}

impl std::error::Error for StepError {}

/// A finished node of the result tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestNode {
    /// Name given at the `test`/`step` call
    pub name: String,
    /// Whether this node's function and all of its children passed
    pub passed: bool,
    /// Value the node's function returned, if any
    pub result: Option<Value>,
    /// Value the node's function failed with, if any
    pub exception: Option<Value>,
    /// Child nodes in call order
    pub children: Vec<TestNode>,
}

struct NodeState {
    name: String,
    passed: bool,
    result: Option<Value>,
    exception: Option<Value>,
    children: Vec<Arc<Mutex<NodeState>>>,
}

impl NodeState {
    fn new(name: String) -> Self {
        Self {
            name,
            passed: false,
            result: None,
            exception: None,
            children: Vec::new(),
        }
    }
}

/// Context handed to every test and step function.
#[derive(Clone)]
pub struct TestContext {
    node: Arc<Mutex<NodeState>>,
}

impl TestContext {
    /// Run a named step nested under this node.
    ///
    /// The step is linked into this node's children at call time, so call
    /// order is report order. Returns whether the step (including its own
    /// nested steps) passed.
    pub async fn step<F, Fut>(&self, name: impl Into<String>, f: F) -> bool
    where
        F: FnOnce(TestContext) -> Fut,
        Fut: Future<Output = StepResult>,
    {
        let child = Arc::new(Mutex::new(NodeState::new(name.into())));
        self.node.lock().children.push(Arc::clone(&child));
        run_node(child, f).await
    }
}

/// Execute one node's function and finalize its state.
async fn run_node<F, Fut>(node: Arc<Mutex<NodeState>>, f: F) -> bool
where
    F: FnOnce(TestContext) -> Fut,
    Fut: Future<Output = StepResult>,
{
    let context = TestContext {
        node: Arc::clone(&node),
    };

    let outcome = f(context).await;

    let mut state = node.lock();
    let own_ok = match outcome {
        Ok(result) => {
            state.result = result;
            true
        }
        Err(exception) => {
            state.exception = Some(exception.into_value());
            false
        }
    };

    // Children ran and recorded inside the function body, so they are final
    // by the time the body's outcome is known.
    let passed = own_ok && state.children.iter().all(|child| child.lock().passed);
    state.passed = passed;
    passed
}

fn snapshot(node: &Arc<Mutex<NodeState>>) -> TestNode {
    let state = node.lock();
    TestNode {
        name: state.name.clone(),
        passed: state.passed,
        result: state.result.clone(),
        exception: state.exception.clone(),
        children: state.children.iter().map(snapshot).collect(),
    }
}

/// Run a root test and return the finished result tree.
pub async fn run_test<F, Fut>(name: impl Into<String>, f: F) -> TestNode
where
    F: FnOnce(TestContext) -> Fut,
    Fut: Future<Output = StepResult>,
{
    let root = Arc::new(Mutex::new(NodeState::new(name.into())));
    run_node(Arc::clone(&root), f).await;
    snapshot(&root)
}

/// Flush a result tree to the log surface.
///
/// Depth-first pre-order; one status line per node with a `#` marker per
/// nesting level (root depth 1), followed by the node's result or exception
/// when present.
pub fn render_report(node: &TestNode, logs: &Logs) {
    render_into(node, 1, logs);
}

fn render_into(node: &TestNode, depth: usize, logs: &Logs) {
    let status = if node.passed { "Passed" } else { "Failed" };
    logs.add(&[Value::String(format!(
        "{} {} ... {}",
        "#".repeat(depth),
        node.name,
        status
    ))]);

    if let Some(result) = &node.result {
        logs.add(&[Value::String(format!("Result: {}", render_value(result)))]);
    }
    if let Some(exception) = &node.exception {
        logs.add(&[Value::String(format!(
            "Exception: {}",
            render_value(exception)
        ))]);
    }

    for child in &node.children {
        render_into(child, depth + 1, logs);
    }
}

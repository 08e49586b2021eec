//! Callable tool abstraction
//!
//! Tools are async callables taking a JSON argument object. The alias keeps
//! the adapter generic over closures, functions, and framework-bound
//! callables alike.

use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Error type produced by underlying tools
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Future returned by a tool invocation
pub type ToolFuture = Pin<Box<dyn Future<Output = std::result::Result<Value, BoxError>> + Send>>;

/// An async callable tool
pub type ToolFn = Arc<dyn Fn(Map<String, Value>) -> ToolFuture + Send + Sync>;

/// Wrap an async closure or function as a [`ToolFn`]
///
/// # Example
///
/// ```
/// use gate_intercept::tool_fn;
/// use serde_json::json;
///
/// let echo = tool_fn(|args| async move { Ok(json!({"echoed": args})) });
/// ```
pub fn tool_fn<F, Fut>(f: F) -> ToolFn
where
    F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<Value, BoxError>> + Send + 'static,
{
    Arc::new(move |args| Box::pin(f(args)))
}

//! Observer hook for tool activity
//!
//! The loop reports dispatches and results through an injected sink
//! instead of touching any display state itself; presentation decides
//! what to show.

use serde_json::Value;

pub trait EventSink: Send + Sync {
    fn on_tool_call(&self, _name: &str, _args: &Value) {}
    fn on_tool_result(&self, _name: &str, _result: &str) {}
}

/// Sink that discards everything
pub struct NullSink;

impl EventSink for NullSink {}

//! Built-in tools and the registry that dispatches to them

pub mod filesystem;
pub mod sandbox;
pub mod script;

pub use filesystem::{ListFilesTool, ReadFileTool, WriteFileTool};
pub use sandbox::{resolve_in_sandbox, SandboxError};
pub use script::RunScriptTool;

use async_trait::async_trait;
use quill_config::Config;
use quill_provider::{Tool, ToolCall};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Tool-level faults. Typed internally for testability; the model
/// only ever sees these rendered as result text.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("sandbox violation: {0}")]
    Sandbox(SandboxError),

    #[error("invalid arguments: {0}")]
    InvalidArgument(String),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("execution timed out after {0} seconds")]
    Timeout(u64),

    #[error("unknown tool '{0}'")]
    UnknownTool(String),
}

type BoxedTool = Box<dyn ToolTrait + Send + Sync>;

#[async_trait]
pub trait ToolTrait: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> Value;
    async fn execute(&self, args: Value) -> Result<String, ToolError>;
}

pub fn to_provider_tool(tool: &dyn ToolTrait) -> Tool {
    Tool::new(tool.name(), tool.description(), tool.parameters())
}

/// Closed set of tools, built once at startup. No dynamic loading.
pub struct ToolRegistry {
    tools: HashMap<String, BoxedTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register<T: ToolTrait + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&(dyn ToolTrait + Send + Sync)> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Schemas advertised to the model
    pub fn definitions(&self) -> Vec<Tool> {
        self.tools
            .values()
            .map(|t| to_provider_tool(t.as_ref()))
            .collect()
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.execute(args).await
    }

    /// Total dispatch: every fault is absorbed into result text so the
    /// model can react to it instead of the run dying.
    pub async fn dispatch(&self, call: &ToolCall) -> String {
        debug!("dispatching tool: {}", call.name);
        self.execute(&call.name, call.arguments.clone())
            .await
            .unwrap_or_else(|e| format!("Error: {}", e))
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Register the built-in tools against the configured sandbox root
pub fn register_default_tools(registry: &mut ToolRegistry, config: &Config) {
    let root = config.sandbox_root();

    registry.register(ListFilesTool::new(root.clone()));
    registry.register(ReadFileTool::new(root.clone(), config.agent.max_read_chars));
    registry.register(WriteFileTool::new(root.clone()));
    registry.register(RunScriptTool::new(root, config.agent.script_timeout_secs));
}

//! Tests for the tool registry and the total-dispatch boundary

use quill_agent::tools::{
    register_default_tools, ListFilesTool, ReadFileTool, RunScriptTool, ToolError, ToolRegistry,
    WriteFileTool,
};
use quill_config::Config;
use quill_provider::ToolCall;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_registry_new_is_empty() {
    let registry = ToolRegistry::new();
    assert!(registry.names().is_empty());
}

#[test]
fn test_registry_register_builtins() {
    let mut registry = ToolRegistry::new();
    let root = std::path::PathBuf::from("/tmp");
    registry.register(ListFilesTool::new(root.clone()));
    registry.register(ReadFileTool::new(root.clone(), 100));
    registry.register(WriteFileTool::new(root.clone()));
    registry.register(RunScriptTool::new(root, 30));

    assert_eq!(registry.names().len(), 4);
    assert!(registry.has("list_files"));
    assert!(registry.has("read_file"));
    assert!(registry.has("write_file"));
    assert!(registry.has("run_script"));
    assert!(!registry.has("edit_file"));
}

#[test]
fn test_register_default_tools_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.agent.sandbox_root = temp_dir.path().display().to_string();

    let mut registry = ToolRegistry::new();
    register_default_tools(&mut registry, &config);
    assert_eq!(registry.names().len(), 4);
}

#[test]
fn test_definitions_advertise_schemas() {
    let mut registry = ToolRegistry::new();
    registry.register(ReadFileTool::new(std::path::PathBuf::from("/tmp"), 100));

    let definitions = registry.definitions();
    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].function.name, "read_file");
    assert!(!definitions[0].function.description.is_empty());

    let params = &definitions[0].function.parameters;
    assert_eq!(params["type"], "object");
    assert_eq!(params["required"][0], "path");
}

#[tokio::test]
async fn test_execute_unknown_tool_is_typed() {
    let registry = ToolRegistry::new();
    let result = registry.execute("nonexistent", json!({})).await;
    assert!(matches!(result, Err(ToolError::UnknownTool(_))));
}

#[tokio::test]
async fn test_dispatch_unknown_tool_never_raises() {
    let registry = ToolRegistry::new();
    let call = ToolCall {
        id: "call_1".to_string(),
        name: "nonexistent".to_string(),
        arguments: json!({}),
    };

    let text = registry.dispatch(&call).await;
    assert!(text.contains("unknown tool 'nonexistent'"), "got: {}", text);
}

#[tokio::test]
async fn test_dispatch_renders_sandbox_violation_as_text() {
    let temp_dir = TempDir::new().unwrap();
    let mut registry = ToolRegistry::new();
    registry.register(WriteFileTool::new(temp_dir.path().to_path_buf()));

    let call = ToolCall {
        id: "call_1".to_string(),
        name: "write_file".to_string(),
        arguments: json!({"path": "../../etc/passwd", "content": "x"}),
    };

    let text = registry.dispatch(&call).await;
    assert!(text.starts_with("Error:"), "got: {}", text);
    assert!(text.contains("sandbox violation"), "got: {}", text);
}

#[tokio::test]
async fn test_dispatch_renders_invalid_arguments_as_text() {
    let temp_dir = TempDir::new().unwrap();
    let mut registry = ToolRegistry::new();
    registry.register(ReadFileTool::new(temp_dir.path().to_path_buf(), 100));

    let call = ToolCall {
        id: "call_1".to_string(),
        name: "read_file".to_string(),
        arguments: json!({"wrong_field": 42}),
    };

    let text = registry.dispatch(&call).await;
    assert!(text.contains("invalid arguments"), "got: {}", text);
}

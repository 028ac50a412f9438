//! File system tools

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;

use tracing::debug;

use super::sandbox::resolve_in_sandbox;
use super::{ToolError, ToolTrait};

fn parse_args<T: serde::de::DeserializeOwned>(args: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArgument(e.to_string()))
}

/// Directory listing tool
pub struct ListFilesTool {
    root: PathBuf,
}

impl ListFilesTool {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[derive(Deserialize)]
struct ListFilesArgs {
    #[serde(default)]
    path: Option<String>,
}

#[async_trait]
impl ToolTrait for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }
    fn description(&self) -> &str {
        "Lists files in the specified directory along with their sizes, constrained to the sandbox root."
    }
    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory to list, relative to the sandbox root. Defaults to the root itself."
                }
            }
        })
    }
    async fn execute(&self, args: serde_json::Value) -> Result<String, ToolError> {
        let args: ListFilesArgs = parse_args(args)?;
        let target = args.path.unwrap_or_else(|| ".".to_string());
        let path = resolve_in_sandbox(&target, &self.root).await?;

        debug!("listing directory: {:?}", path);
        if !path.is_dir() {
            return Ok(format!("Error: \"{}\" is not a directory", target));
        }

        let mut entries = tokio::fs::read_dir(&path).await?;
        let mut items = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            let meta = entry.metadata().await?;
            items.push(format!(
                "- {}: file_size={} bytes, is_dir={}",
                name,
                meta.len(),
                meta.is_dir()
            ));
        }
        items.sort();
        if items.is_empty() {
            Ok(format!("Directory \"{}\" is empty", target))
        } else {
            Ok(items.join("\n"))
        }
    }
}

/// File reading tool with a character ceiling
pub struct ReadFileTool {
    root: PathBuf,
    max_chars: usize,
}

impl ReadFileTool {
    pub fn new(root: PathBuf, max_chars: usize) -> Self {
        Self { root, max_chars }
    }
}

#[derive(Deserialize)]
struct ReadFileArgs {
    path: String,
}

#[async_trait]
impl ToolTrait for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }
    fn description(&self) -> &str {
        "Reads the contents of a file, truncated past a character ceiling, limited to the sandbox root."
    }
    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the file to read, relative to the sandbox root."
                }
            },
            "required": ["path"]
        })
    }
    async fn execute(&self, args: serde_json::Value) -> Result<String, ToolError> {
        let args: ReadFileArgs = parse_args(args)?;
        let path = resolve_in_sandbox(&args.path, &self.root).await?;

        debug!("reading file: {:?}", path);
        if !path.is_file() {
            return Ok(format!(
                "Error: File not found or is not a regular file: \"{}\"",
                args.path
            ));
        }

        let content = tokio::fs::read_to_string(&path).await?;
        // Content exactly at the ceiling passes through unmarked.
        if content.chars().count() > self.max_chars {
            let truncated: String = content.chars().take(self.max_chars).collect();
            Ok(format!(
                "{}[...File \"{}\" truncated at {} characters]",
                truncated, args.path, self.max_chars
            ))
        } else {
            Ok(content)
        }
    }
}

/// File writing tool; creates parent directories, overwrites
pub struct WriteFileTool {
    root: PathBuf,
}

impl WriteFileTool {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[derive(Deserialize)]
struct WriteFileArgs {
    path: String,
    content: String,
}

#[async_trait]
impl ToolTrait for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }
    fn description(&self) -> &str {
        "Writes or overwrites content to a file within the sandbox root."
    }
    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the file to write, relative to the sandbox root."
                },
                "content": {
                    "type": "string",
                    "description": "The content to write into the file."
                }
            },
            "required": ["path", "content"]
        })
    }
    async fn execute(&self, args: serde_json::Value) -> Result<String, ToolError> {
        let args: WriteFileArgs = parse_args(args)?;
        let path = resolve_in_sandbox(&args.path, &self.root).await?;

        debug!("writing file: {:?}", path);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &args.content).await?;
        Ok(format!(
            "Successfully wrote to \"{}\" ({} characters written)",
            args.path,
            args.content.chars().count()
        ))
    }
}

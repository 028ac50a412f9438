//! Script execution tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::sandbox::resolve_in_sandbox;
use super::{ToolError, ToolTrait};

/// Runs an executable script inside the sandbox under a hard
/// wall-clock timeout
pub struct RunScriptTool {
    root: PathBuf,
    timeout_secs: u64,
}

impl RunScriptTool {
    pub fn new(root: PathBuf, timeout_secs: u64) -> Self {
        Self { root, timeout_secs }
    }
}

#[derive(Deserialize)]
struct RunScriptArgs {
    path: String,
    #[serde(default)]
    args: Vec<String>,
}

#[async_trait]
impl ToolTrait for RunScriptTool {
    fn name(&self) -> &str {
        "run_script"
    }
    fn description(&self) -> &str {
        "Executes a script with optional arguments, limited to the sandbox root."
    }
    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the executable script, relative to the sandbox root."
                },
                "args": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Command-line arguments passed to the script."
                }
            },
            "required": ["path"]
        })
    }
    async fn execute(&self, args: serde_json::Value) -> Result<String, ToolError> {
        let args: RunScriptArgs =
            serde_json::from_value(args).map_err(|e| ToolError::InvalidArgument(e.to_string()))?;
        let path = resolve_in_sandbox(&args.path, &self.root).await?;

        if !path.is_file() {
            return Ok(format!("Error: File \"{}\" not found.", args.path));
        }

        debug!("executing script: {:?}", path);
        let root = tokio::fs::canonicalize(&self.root).await?;
        let mut cmd = Command::new(&path);
        cmd.args(&args.args)
            .current_dir(&root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Hard-kill on timeout: dropping the future reaps the child
            .kill_on_drop(true);

        let output = match tokio::time::timeout(
            tokio::time::Duration::from_secs(self.timeout_secs),
            cmd.output(),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(ToolError::Timeout(self.timeout_secs)),
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if stdout.is_empty() && stderr.is_empty() && output.status.success() {
            return Ok("No output produced.".to_string());
        }

        let mut parts = vec![
            format!("STDOUT: {}", stdout),
            format!("STDERR: {}", stderr),
        ];
        if !output.status.success() {
            parts.push(format!(
                "Process exited with code {}",
                output.status.code().unwrap_or(-1)
            ));
        }
        Ok(parts.join("\n"))
    }
}

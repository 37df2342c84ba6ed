//! Delegated-Execution Memory Backend
//!
//! Information Hiding:
//! - How the target unit is executed is hidden behind `WorkflowRunner`
//! - Only the first item of the last executed step is read back
//! - Process spawning and stdin/stdout framing hidden inside `ProcessRunner`

use super::protocol::MemoryRequest;
use super::TransportBackend;
use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Output of one executed step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepRun {
    pub name: String,
    pub items: Vec<Value>,
}

/// Steps in execution order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionResult {
    pub steps: Vec<StepRun>,
}

impl ExecutionResult {
    pub fn single(name: impl Into<String>, items: Vec<Value>) -> Self {
        Self {
            steps: vec![StepRun {
                name: name.into(),
                items,
            }],
        }
    }

    /// First output item of the last executed step, if any
    pub fn last_output(&self) -> Option<&Value> {
        self.steps.last()?.items.first()
    }
}

/// Runs an executable unit (sub-workflow, sub-process) with a list of input items
#[async_trait]
pub trait WorkflowRunner: Send + Sync {
    async fn execute(&self, target: &str, items: Vec<Value>)
        -> Result<ExecutionResult, TransportError>;
}

/// Delivers memory requests by invoking a workflow target
pub struct WorkflowBackend {
    runner: Arc<dyn WorkflowRunner>,
    target: String,
}

impl WorkflowBackend {
    pub fn new(runner: Arc<dyn WorkflowRunner>, target: impl Into<String>) -> Self {
        Self {
            runner,
            target: target.into(),
        }
    }

    /// Backend that runs the target as a shell command line
    pub fn process(target: impl Into<String>) -> Self {
        Self::new(Arc::new(ProcessRunner), target)
    }
}

#[async_trait]
impl TransportBackend for WorkflowBackend {
    fn name(&self) -> &'static str {
        "WorkflowBackend"
    }

    async fn dispatch(&self, request: &MemoryRequest) -> Result<Value, TransportError> {
        tracing::debug!(
            "[WorkflowBackend] {:?} for session '{}' -> {}",
            request.action,
            request.session_id,
            self.target
        );

        let input = serde_json::to_value(request)?;
        let result = self.runner.execute(&self.target, vec![input]).await?;

        Ok(result.last_output().cloned().unwrap_or_else(|| json!({})))
    }
}

/// Runs the target with `sh -c`, one JSON item per line on stdin and stdout
///
/// The whole process counts as a single step. There is no timeout.
pub struct ProcessRunner;

#[async_trait]
impl WorkflowRunner for ProcessRunner {
    async fn execute(
        &self,
        target: &str,
        items: Vec<Value>,
    ) -> Result<ExecutionResult, TransportError> {
        tracing::debug!("[ProcessRunner] Running: {}", target);

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(target)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut payload = String::new();
        for item in &items {
            payload.push_str(&serde_json::to_string(item)?);
            payload.push('\n');
        }

        // stdin is fed from its own task so a target that writes while it reads
        // cannot fill the stdout pipe and deadlock against us
        let writer = child.stdin.take().map(|mut stdin| {
            tokio::spawn(async move {
                match stdin.write_all(payload.as_bytes()).await {
                    Ok(()) => Ok(()),
                    // target exited without reading its input
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                        tracing::debug!("[ProcessRunner] Target closed stdin early");
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            })
        });

        let output = child.wait_with_output().await?;

        if let Some(writer) = writer {
            writer.await.map_err(|e| {
                TransportError::Workflow(format!("stdin writer task failed: {}", e))
            })??;
        }

        if !output.status.success() {
            return Err(TransportError::ProcessFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let outputs = stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<Result<Vec<Value>, _>>()?;

        Ok(ExecutionResult::single(target, outputs))
    }
}

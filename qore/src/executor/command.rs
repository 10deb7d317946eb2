//! Executor that runs each stage as an external process.

use super::{StageExecutor, StageResult};
use crate::capture::CaptureSink;
use crate::context::InputContext;
use crate::errors::StageExecutionError;
use crate::registry::StageDescriptor;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs `<program> <args...> <stage_id>` once per stage.
///
/// The rendered task description goes to the child's stdin and its stdout
/// is the stage result (a JSON object on stdout is treated as a mapping).
/// Stderr lines are written to the run's log sink. The child also sees
/// `QORE_STAGE`, `QORE_AGENT` and `QORE_INPUTS` (JSON) in its environment.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandExecutor {
    /// Creates an executor for `program`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Adds arguments placed before the stage identifier.
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the child's working directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Returns the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl StageExecutor for CommandExecutor {
    async fn execute(
        &self,
        stage: &StageDescriptor,
        inputs: &InputContext,
        log: &CaptureSink,
    ) -> Result<StageResult, StageExecutionError> {
        let fail = |message: String| StageExecutionError::new(stage.id(), message);

        let prompt = stage.task.render(inputs);
        let inputs_json = serde_json::to_string(inputs).map_err(|e| fail(e.to_string()))?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(stage.id())
            .env("QORE_STAGE", stage.id())
            .env("QORE_AGENT", &stage.agent.key)
            .env("QORE_INPUTS", inputs_json)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        debug!(stage = %stage.kind, program = %self.program, "Spawning stage process");
        let mut child = command
            .spawn()
            .map_err(|e| fail(format!("failed to spawn '{}': {e}", self.program)))?;

        // The child may log before it reads its task, so stdin is fed while
        // stdout and stderr are drained. Dropping stdin at the end sends EOF.
        let stdin = child.stdin.take();
        let feed = async move {
            match stdin {
                Some(mut stdin) => stdin.write_all(prompt.as_bytes()).await,
                None => Ok(()),
            }
        };
        let (written, output) = tokio::join!(feed, child.wait_with_output());

        match written {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!(stage = %stage.kind, "Stage process closed stdin early");
            }
            Err(e) => return Err(fail(format!("failed to write task to stdin: {e}"))),
        }
        let output = output.map_err(|e| fail(format!("failed to wait for process: {e}")))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            log.write_line(line);
        }

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            warn!(stage = %stage.kind, code = %code, "Stage process failed");
            return Err(fail(format!(
                "process exited with code {code}: {}",
                stderr.trim()
            )));
        }

        Ok(StageResult::from_stdout(&String::from_utf8_lossy(&output.stdout)))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::capture::OutputCapture;
    use crate::core::StageKind;
    use crate::registry::{AgentDescriptor, TaskDescriptor};
    use pretty_assertions::assert_eq;

    fn stage() -> StageDescriptor {
        StageDescriptor::new(
            StageKind::Budget,
            AgentDescriptor::new("budget_agent", "Budget planner"),
            TaskDescriptor::new("budget_task", "Budget for {current_year}"),
        )
    }

    fn shell(script: &str) -> CommandExecutor {
        CommandExecutor::new("sh").with_args(["-c", script, "qore-stage"])
    }

    #[tokio::test]
    async fn test_stdout_becomes_text() {
        let executor = shell(r#"echo "stage=$1"; cat"#);
        let inputs = InputContext::new().with("current_year", "2025");

        let result = executor
            .execute(&stage(), &inputs, &CaptureSink::discard())
            .await
            .unwrap();

        assert_eq!(
            result,
            StageResult::Text("stage=budget\nBudget for 2025".to_string())
        );
    }

    #[tokio::test]
    async fn test_json_stdout_becomes_mapping() {
        let executor = shell(r#"echo '{"output": "- keep it"}'"#);

        let result = executor
            .execute(&stage(), &InputContext::new(), &CaptureSink::discard())
            .await
            .unwrap();

        assert_eq!(result.into_raw_output(), "- keep it");
    }

    #[tokio::test]
    async fn test_environment_is_set() {
        let executor = shell(r#"echo "$QORE_STAGE $QORE_AGENT $QORE_INPUTS""#);
        let inputs = InputContext::new().with("budget", "tight");

        let result = executor
            .execute(&stage(), &inputs, &CaptureSink::discard())
            .await
            .unwrap();

        assert_eq!(
            result.into_raw_output(),
            "budget budget_agent {\"budget\":\"tight\"}\n"
        );
    }

    #[tokio::test]
    async fn test_stderr_goes_to_log() {
        let executor = shell("echo 'Crew Execution Started' >&2; echo '- answer'");
        let capture = OutputCapture::begin();

        executor
            .execute(&stage(), &InputContext::new(), &capture.sink())
            .await
            .unwrap();

        assert_eq!(capture.finish(), "Crew Execution Started\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_error() {
        let executor = shell("echo 'model unavailable' >&2; exit 3");

        let err = executor
            .execute(&stage(), &InputContext::new(), &CaptureSink::discard())
            .await
            .unwrap_err();

        assert_eq!(err.stage, "budget");
        assert_eq!(err.message, "process exited with code 3: model unavailable");
    }

    #[tokio::test]
    async fn test_large_task_with_chatty_process_completes() {
        let description = "x".repeat(300_000);
        let stage = StageDescriptor::new(
            StageKind::Budget,
            AgentDescriptor::new("budget_agent", "Budget planner"),
            TaskDescriptor::new("budget_task", description),
        );
        // Fills the stderr pipe before reading any of stdin.
        let executor = shell(
            "head -c 300000 /dev/zero | tr '\\0' L >&2; wc -c | tr -d ' '",
        );
        let capture = OutputCapture::begin();

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            executor.execute(&stage, &InputContext::new(), &capture.sink()),
        )
        .await
        .expect("stage process should not block on its pipes")
        .unwrap();

        assert_eq!(result.into_raw_output().trim(), "300000");
        assert_eq!(capture.finish().trim_end().len(), 300_000);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_error() {
        let executor = CommandExecutor::new("/nonexistent/qore-agent");

        let err = executor
            .execute(&stage(), &InputContext::new(), &CaptureSink::discard())
            .await
            .unwrap_err();

        assert!(err.message.starts_with("failed to spawn"));
    }
}

/// Process Runner
///
/// **Core Responsibility:**
/// Execute one harness in a fresh interpreter process and capture its raw output.
///
/// **Guarantees:**
/// - The harness file is a `NamedTempFile` owned by the call, so it is removed on
///   every exit path: normal completion, timeout, or an early `?` return
/// - Hard wall-clock timeout; on expiry the child is killed and reaped, and no
///   partial output is returned
/// - `PLTCOLLECTS` always points at the bundled installation, whatever the
///   caller's environment says
/// - The child is spawned with `kill_on_drop`, so a cancelled caller cannot leave
///   a runaway interpreter behind
///
/// The runner does not judge anything: exit status is logged, not interpreted.
use crate::config::RuntimeConfig;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

const HARNESS_PREFIX: &str = "submission-";
const HARNESS_SUFFIX: &str = ".rkt";

/// Raw result of running one harness
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { stdout: String, stderr: String },
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct ProcessRunner {
    interpreter: PathBuf,
    collects: PathBuf,
    timeout: Duration,
    scratch_dir: Option<PathBuf>,
}

impl ProcessRunner {
    pub fn new(interpreter: PathBuf, collects: PathBuf, timeout: Duration) -> Self {
        Self {
            interpreter,
            collects,
            timeout,
            scratch_dir: None,
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            interpreter: config.interpreter_path(),
            collects: config.collects_path(),
            timeout: config.timeout(),
            scratch_dir: config.scratch_dir.clone(),
        }
    }

    pub fn with_scratch_dir(mut self, dir: PathBuf) -> Self {
        self.scratch_dir = Some(dir);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn create_harness_file(&self, harness: &str) -> Result<tempfile::NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(HARNESS_PREFIX).suffix(HARNESS_SUFFIX);

        let mut file = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .context("Failed to create harness file")?;

        file.write_all(harness.as_bytes())
            .context("Failed to write harness file")?;
        file.flush().context("Failed to flush harness file")?;

        Ok(file)
    }

    /// Run `harness` to completion or until the timeout expires
    pub async fn execute(&self, harness: &str) -> Result<RunOutcome> {
        let harness_file = self.create_harness_file(harness)?;

        let mut child = Command::new(&self.interpreter)
            .arg(harness_file.path())
            .env("PLTCOLLECTS", &self.collects)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn interpreter {}", self.interpreter.display()))?;

        let mut stdout_pipe = child.stdout.take().context("Child stdout was not captured")?;
        let mut stderr_pipe = child.stderr.take().context("Child stderr was not captured")?;

        let start = Instant::now();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        // Drain both pipes while waiting, otherwise a chatty child blocks on a full pipe
        let waited = tokio::time::timeout(self.timeout, async {
            let (out, err, status) = tokio::join!(
                stdout_pipe.read_to_end(&mut stdout),
                stderr_pipe.read_to_end(&mut stderr),
                child.wait(),
            );
            out?;
            err?;
            Ok::<_, std::io::Error>(status?)
        })
        .await;

        let elapsed_ms = start.elapsed().as_millis() as u64;

        match waited {
            Ok(status) => {
                let status = status.context("Failed to wait for interpreter")?;
                debug!(
                    exit_status = %status,
                    elapsed_ms,
                    stdout_bytes = stdout.len(),
                    stderr_bytes = stderr.len(),
                    "Interpreter finished"
                );
                Ok(RunOutcome::Completed {
                    stdout: String::from_utf8_lossy(&stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&stderr).into_owned(),
                })
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    elapsed_ms,
                    "Interpreter timed out, killing it"
                );
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "Failed to kill timed-out interpreter");
                }
                Ok(RunOutcome::TimedOut)
            }
        }
    }
}

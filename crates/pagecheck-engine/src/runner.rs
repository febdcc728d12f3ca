//! Script and batch execution.
//!
//! A failing assertion is fatal to its script, never to the process:
//! the batch runner records the failure and moves on to the next
//! script unless asked to stop.

use crate::backend::Backend;
use crate::executor::{CommandExecutor, ExecutorError};
use pagecheck_parser::{normalize, parse};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

/// Outcome of one script run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptReport {
    pub name: String,
    pub passed: bool,
    /// Diagnostic for the first failing command, if any.
    pub error: Option<String>,
    pub duration: Duration,
    /// Output lines of the commands that completed.
    pub steps: Vec<String>,
}

impl ScriptReport {
    pub fn pass(name: impl Into<String>, duration: Duration, steps: Vec<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            error: None,
            duration,
            steps,
        }
    }

    pub fn fail(
        name: impl Into<String>,
        error: impl Into<String>,
        duration: Duration,
        steps: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            passed: false,
            error: Some(error.into()),
            duration,
            steps,
        }
    }
}

/// Aggregated outcomes for a batch of scripts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub scripts: Vec<ScriptReport>,
    pub duration: Duration,
}

impl BatchReport {
    pub fn add(&mut self, report: ScriptReport) {
        self.scripts.push(report);
    }

    pub fn passed(&self) -> usize {
        self.scripts.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.scripts.iter().filter(|r| !r.passed).count()
    }

    pub fn total(&self) -> usize {
        self.scripts.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

pub struct RunOptions {
    /// Abort the batch at the first failing script.
    pub stop_on_error: bool,
    /// Operational safeguard; the script language itself has no
    /// timeout semantics.
    pub timeout: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            stop_on_error: false,
            timeout: None,
        }
    }
}

/// Run one script from raw text. Commands execute strictly in order;
/// the first failure ends the script.
pub async fn run_script<B: Backend + ?Sized>(
    backend: &mut B,
    executor: &mut CommandExecutor,
    name: &str,
    text: &str,
) -> ScriptReport {
    let started = Instant::now();
    let mut steps = Vec::new();

    let script = match parse(&normalize(text)) {
        Ok(script) => script,
        Err(e) => {
            let error = ExecutorError::from(e).diagnostic();
            return ScriptReport::fail(name, error, started.elapsed(), steps);
        }
    };

    for command in script.commands() {
        match executor.execute(backend, command).await {
            Ok(result) => steps.push(result.output),
            Err(e) => {
                tracing::debug!(script = name, %command, "command failed");
                let error = format!("{}: {}", command, e.diagnostic());
                return ScriptReport::fail(name, error, started.elapsed(), steps);
            }
        }
    }

    ScriptReport::pass(name, started.elapsed(), steps)
}

/// Run one script file, naming the report after the path.
pub async fn run_file<B: Backend + ?Sized>(
    backend: &mut B,
    executor: &mut CommandExecutor,
    path: &Path,
) -> ScriptReport {
    let name = path.display().to_string();
    let started = Instant::now();
    match tokio::fs::read_to_string(path).await {
        Ok(text) => run_script(backend, executor, &name, &text).await,
        Err(e) => ScriptReport::fail(
            &name,
            ExecutorError::from(e).diagnostic(),
            started.elapsed(),
            Vec::new(),
        ),
    }
}

/// Run a batch of script files sequentially against one session. A
/// failing script is recorded and the batch continues, unless
/// `stop_on_error` is set.
pub async fn run_files<B: Backend + ?Sized>(
    backend: &mut B,
    paths: &[impl AsRef<Path>],
    options: &RunOptions,
) -> BatchReport {
    let started = Instant::now();
    let mut batch = BatchReport::default();

    for path in paths {
        let path = path.as_ref();
        let mut executor = CommandExecutor::new();

        let report = match options.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, run_file(backend, &mut executor, path)).await {
                    Ok(report) => report,
                    Err(_) => ScriptReport::fail(
                        path.display().to_string(),
                        format!("[TIMEOUT] script exceeded {}s", limit.as_secs()),
                        limit,
                        Vec::new(),
                    ),
                }
            }
            None => run_file(backend, &mut executor, path).await,
        };

        if report.passed {
            tracing::info!(script = %report.name, "script passed");
        } else {
            tracing::warn!(script = %report.name, error = ?report.error, "script failed");
        }

        let stop = !report.passed && options.stop_on_error;
        batch.add(report);
        if stop {
            break;
        }
    }

    batch.duration = started.elapsed();
    batch
}

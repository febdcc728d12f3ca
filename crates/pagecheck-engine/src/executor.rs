//! Shared command execution pipeline.
//!
//! Commands run strictly in the order they were declared: the session
//! is configured (viewport, text rendering), the page is loaded, then
//! assertions are evaluated against the live DOM.

use crate::assertion::{self, AssertionError};
use crate::backend::{Backend, BackendError};
use pagecheck_parser::ast::{
    AssertCountCmd, AssertPropertyCmd, Command, GotoCmd, ShowTextCmd, SizeCmd,
};
use pagecheck_parser::parser::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Assertion failed: {0}")]
    Assertion(#[from] AssertionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecutorError {
    /// Human-readable diagnostic with a stable code prefix where one
    /// exists.
    pub fn diagnostic(&self) -> String {
        match self {
            ExecutorError::Backend(err) => format!("[{}] {}", err.code(), err),
            other => other.to_string(),
        }
    }
}

/// Result of executing a single command.
pub struct ExecutionResult {
    /// Formatted output string for display.
    pub output: String,
    /// Whether execution was successful.
    pub success: bool,
}

impl ExecutionResult {
    fn ok(output: String) -> Self {
        Self {
            output,
            success: true,
        }
    }
}

#[derive(Default)]
pub struct CommandExecutor {
    executed: usize,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands executed so far, for step reporting.
    pub fn executed(&self) -> usize {
        self.executed
    }

    /// Execute one command against the session.
    pub async fn execute<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        command: &Command,
    ) -> Result<ExecutionResult, ExecutorError> {
        tracing::debug!(step = self.executed + 1, ?command, "executing command");
        let result = match command {
            Command::Goto(cmd) => self.execute_goto(backend, cmd).await,
            Command::ShowText(cmd) => self.execute_show_text(backend, cmd).await,
            Command::Size(cmd) => self.execute_size(backend, cmd).await,
            Command::AssertCount(cmd) => self.execute_assert_count(backend, cmd).await,
            Command::AssertProperty(cmd) => self.execute_assert_property(backend, cmd).await,
        };
        if result.is_ok() {
            self.executed += 1;
        }
        result
    }

    async fn execute_goto<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        cmd: &GotoCmd,
    ) -> Result<ExecutionResult, ExecutorError> {
        url::Url::parse(&cmd.url)
            .map_err(|e| BackendError::Navigation(format!("invalid URL {:?}: {}", cmd.url, e)))?;
        let res = backend.navigate(&cmd.url).await?;
        Ok(ExecutionResult::ok(format!("Navigated to {}", res.url)))
    }

    async fn execute_show_text<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        cmd: &ShowTextCmd,
    ) -> Result<ExecutionResult, ExecutorError> {
        backend.set_text_rendering(cmd.enabled).await?;
        let state = if cmd.enabled { "on" } else { "off" };
        Ok(ExecutionResult::ok(format!("Text rendering {}", state)))
    }

    async fn execute_size<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        cmd: &SizeCmd,
    ) -> Result<ExecutionResult, ExecutorError> {
        backend.set_viewport(cmd.width, cmd.height).await?;
        Ok(ExecutionResult::ok(format!(
            "Viewport set to {}x{}",
            cmd.width, cmd.height
        )))
    }

    async fn execute_assert_count<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        cmd: &AssertCountCmd,
    ) -> Result<ExecutionResult, ExecutorError> {
        let actual = backend.query_count(&cmd.selector).await?;
        assertion::check_count(&cmd.selector, cmd.count, actual)?;
        Ok(ExecutionResult::ok(format!(
            "{:?} matches {} element(s)",
            cmd.selector, actual
        )))
    }

    async fn execute_assert_property<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        cmd: &AssertPropertyCmd,
    ) -> Result<ExecutionResult, ExecutorError> {
        let matched = backend.query_count(&cmd.selector).await?;
        if matched == 0 {
            return Err(BackendError::ElementNotFound {
                selector: cmd.selector.clone(),
            }
            .into());
        }

        let mut readings = Vec::with_capacity(cmd.properties.len());
        for property in &cmd.properties {
            let actual = backend.get_property(&cmd.selector, &property.name).await?;
            readings.push((property.name.clone(), property.expected.clone(), actual));
        }
        assertion::check_properties(&cmd.selector, &readings)?;

        Ok(ExecutionResult::ok(format!(
            "{:?} has {} expected propert{}",
            cmd.selector,
            cmd.properties.len(),
            if cmd.properties.len() == 1 { "y" } else { "ies" }
        )))
    }
}

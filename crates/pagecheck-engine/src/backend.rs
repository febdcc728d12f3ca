use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
    pub status: u16, // generic status code (e.g. 200)
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum BackendError {
    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("No element matches selector {selector:?}")]
    ElementNotFound { selector: String },

    #[error("Invalid selector: {selector}")]
    SelectorInvalid { selector: String },

    #[error("Script execution error: {0}")]
    ScriptError(String),

    #[error("Timeout: {operation}")]
    Timeout { operation: String },

    #[error("Not ready")]
    NotReady,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Other: {0}")]
    Other(String),

    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Serialization(err.to_string())
    }
}

impl BackendError {
    /// Stable error code, used in diagnostics surfaced by the runner.
    pub fn code(&self) -> &'static str {
        match self {
            BackendError::Navigation(_) => "NAVIGATION_ERROR",
            BackendError::ElementNotFound { .. } => "ELEMENT_NOT_FOUND",
            BackendError::SelectorInvalid { .. } => "SELECTOR_INVALID",
            BackendError::ScriptError(_) => "SCRIPT_ERROR",
            BackendError::Timeout { .. } => "TIMEOUT",
            BackendError::NotReady => "NOT_READY",
            BackendError::Io(_) => "IO_ERROR",
            BackendError::Serialization(_) => "SERIALIZATION_ERROR",
            BackendError::Other(_) => "INTERNAL_ERROR",
            BackendError::NotSupported(_) => "NOT_SUPPORTED",
        }
    }
}

/// Controlled browser session. Commands hold `&mut` access for their
/// whole duration, so execution against one session is strictly
/// sequential and each call blocks until the browser reports
/// completion.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Launch the backend (start browser, connect to remote, etc.)
    async fn launch(&mut self) -> Result<(), BackendError>;

    /// Close the backend and cleanup resources.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Check if the backend is ready to accept commands.
    async fn is_ready(&self) -> bool;

    /// Navigate to a specific URL.
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError>;

    /// Override the viewport dimensions, in CSS pixels.
    async fn set_viewport(&mut self, width: u32, height: u32) -> Result<(), BackendError>;

    /// Toggle text rendering on the current page and all pages
    /// navigated to afterwards.
    async fn set_text_rendering(&mut self, enabled: bool) -> Result<(), BackendError>;

    /// Number of elements matching a CSS selector.
    async fn query_count(&mut self, selector: &str) -> Result<usize, BackendError>;

    /// Read a named property from the first element matching the
    /// selector, serialized as a string.
    async fn get_property(&mut self, selector: &str, name: &str) -> Result<String, BackendError>;
}

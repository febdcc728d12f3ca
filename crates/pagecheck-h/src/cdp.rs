//! Chromium session plumbing over the DevTools protocol.

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;

type CdpResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Exclusively-owned browser session: one browser, one page, one
/// event-handler task. Dropped profiles are temporary unless the
/// operator pins one via PAGECHECK_USER_DATA_DIR.
pub struct CdpClient {
    pub browser: Browser,
    pub handler_task: JoinHandle<()>,
    pub page: Page,
    user_data_dir: Option<PathBuf>,
    cleanup_user_data_dir: bool,
}

impl CdpClient {
    pub async fn launch(visible: bool) -> CdpResult<Self> {
        let (user_data_dir, cleanup_user_data_dir) = resolve_user_data_dir()?;
        let config = build_config(visible, &user_data_dir)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| format!("Failed to launch browser: {}", e))?;

        // The handler stream must be drained for the session to make
        // progress; individual handler errors are not fatal.
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if let Err(e) = h {
                    tracing::error!("Browser handler error (ignoring): {}", e);
                }
            }
            tracing::debug!("Browser handler task ended");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| format!("Failed to create page: {}", e))?;

        Ok(Self {
            browser,
            handler_task,
            page,
            user_data_dir: Some(user_data_dir),
            cleanup_user_data_dir,
        })
    }

    /// Tear the session down; called in all exit paths, pass or fail.
    pub async fn close(mut self) -> CdpResult<()> {
        self.browser
            .close()
            .await
            .map_err(|e| format!("Error closing browser: {}", e))?;
        self.handler_task
            .await
            .map_err(|e| format!("Error awaiting handler: {}", e))?;

        if self.cleanup_user_data_dir {
            if let Some(dir) = &self.user_data_dir {
                if let Err(e) = std::fs::remove_dir_all(dir) {
                    tracing::debug!("Failed to clean up user-data-dir {}: {}", dir.display(), e);
                }
            }
        }

        Ok(())
    }
}

fn build_config(visible: bool, user_data_dir: &PathBuf) -> CdpResult<BrowserConfig> {
    // no_sandbox keeps launches working in docker/CI environments.
    let mut builder = BrowserConfig::builder()
        .no_sandbox()
        .user_data_dir(user_data_dir);

    if visible {
        tracing::info!("Launching browser in visible mode");
        builder = builder.with_head();
    } else {
        tracing::info!("Launching browser in headless mode");
    }

    if let Ok(chrome_bin) = std::env::var("CHROME_BIN") {
        tracing::info!("Using custom Chrome binary: {}", chrome_bin);
        builder = builder.chrome_executable(chrome_bin);
    }

    builder
        .build()
        .map_err(|e| format!("Failed to build browser config: {}", e).into())
}

fn resolve_user_data_dir() -> CdpResult<(PathBuf, bool)> {
    if let Ok(dir) = std::env::var("PAGECHECK_USER_DATA_DIR") {
        let path = PathBuf::from(dir);
        std::fs::create_dir_all(&path)?;
        tracing::info!("Using pinned user data dir: {}", path.display());
        return Ok((path, false));
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| format!("System clock error: {}", e))?
        .as_nanos();
    let unique = format!("pagecheck-profile-{}-{}", std::process::id(), nanos);
    let path = std::env::temp_dir().join(unique);
    std::fs::create_dir_all(&path)?;
    tracing::info!("Using isolated user data dir: {}", path.display());
    Ok((path, true))
}

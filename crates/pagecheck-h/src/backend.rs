use crate::cdp::CdpClient;
use crate::js::{self, PropertyProbe};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use pagecheck_engine::backend::{Backend, BackendError, NavigationResult};
use std::time::Duration;
use tracing::info;

/// Guard for JavaScript evaluation; a dialog (alert/confirm/prompt)
/// can block the page's JS thread indefinitely.
const EVAL_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HeadlessBackend {
    client: Option<CdpClient>,
    visible: bool,
    /// Text rendering is off until a script turns it on; the
    /// transparent-text override is re-applied after each navigation.
    text_visible: bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            client: None,
            visible: false,
            text_visible: false,
        }
    }

    pub fn new_with_visibility(visible: bool) -> Self {
        Self {
            client: None,
            visible,
            text_visible: false,
        }
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    fn client_mut(&mut self) -> Result<&mut CdpClient, BackendError> {
        self.client.as_mut().ok_or(BackendError::NotReady)
    }

    async fn navigation_result(
        page: &chromiumoxide::Page,
    ) -> Result<NavigationResult, BackendError> {
        let title = page
            .get_title()
            .await
            .unwrap_or_default()
            .unwrap_or_default();
        let url = page
            .url()
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?
            .unwrap_or_default();
        Ok(NavigationResult {
            url,
            title,
            status: 200,
        })
    }

    async fn apply_text_override(
        page: &chromiumoxide::Page,
        visible: bool,
    ) -> Result<(), BackendError> {
        evaluate_guarded::<bool>(page, js::text_override_expr(visible), "text-override").await?;
        Ok(())
    }
}

/// Evaluate an expression with the dialog-blocking guard applied and
/// deserialize its value.
async fn evaluate_guarded<T: serde::de::DeserializeOwned>(
    page: &chromiumoxide::Page,
    expr: String,
    operation: &str,
) -> Result<T, BackendError> {
    match tokio::time::timeout(EVAL_TIMEOUT, page.evaluate(expr)).await {
        Ok(Ok(result)) => Ok(result.into_value()?),
        Ok(Err(e)) => Err(BackendError::ScriptError(e.to_string())),
        Err(_) => Err(BackendError::Timeout {
            operation: operation.to_string(),
        }),
    }
}

/// Invalid selectors surface from the page as evaluation exceptions;
/// everything else passes through untouched.
fn refine_selector_error(selector: &str, err: BackendError) -> BackendError {
    match err {
        BackendError::ScriptError(msg) if msg.contains("valid selector") => {
            BackendError::SelectorInvalid {
                selector: selector.to_string(),
            }
        }
        other => other,
    }
}

#[async_trait]
impl Backend for HeadlessBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        info!("Launching headless backend (Chromium)...");
        let client = CdpClient::launch(self.visible)
            .await
            .map_err(|e| BackendError::Other(e.to_string()))?;
        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        if let Some(client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|e| BackendError::Other(e.to_string()))?;
        }
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        let text_visible = self.text_visible;
        let client = self.client_mut()?;

        info!("Navigating to: {}", url);
        client
            .page
            .goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;

        // The fresh document starts without the override.
        if !text_visible {
            Self::apply_text_override(&client.page, false).await?;
        }

        Self::navigation_result(&client.page).await
    }

    async fn set_viewport(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        let client = self.client_mut()?;
        let params = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(width))
            .height(i64::from(height))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(BackendError::Other)?;
        client
            .page
            .execute(params)
            .await
            .map_err(|e| BackendError::Other(format!("Viewport override failed: {}", e)))?;
        Ok(())
    }

    async fn set_text_rendering(&mut self, enabled: bool) -> Result<(), BackendError> {
        self.text_visible = enabled;
        let client = self.client_mut()?;
        Self::apply_text_override(&client.page, enabled).await
    }

    async fn query_count(&mut self, selector: &str) -> Result<usize, BackendError> {
        let expr = js::count_expr(selector)?;
        let client = self.client_mut()?;
        let count: u64 = evaluate_guarded(&client.page, expr, "query-count")
            .await
            .map_err(|e| refine_selector_error(selector, e))?;
        Ok(count as usize)
    }

    async fn get_property(&mut self, selector: &str, name: &str) -> Result<String, BackendError> {
        let expr = js::property_expr(selector, name)?;
        let client = self.client_mut()?;
        let raw: String = evaluate_guarded(&client.page, expr, "get-property")
            .await
            .map_err(|e| refine_selector_error(selector, e))?;

        let probe: PropertyProbe = serde_json::from_str(&raw)?;
        if !probe.found {
            return Err(BackendError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        Ok(probe.value.unwrap_or_else(|| "undefined".to_string()))
    }
}

use async_trait::async_trait;
use pagecheck_engine::backend::{Backend, BackendError, NavigationResult};
use std::collections::HashMap;

/// Scripted in-memory session; records every call it receives.
#[derive(Debug, Default)]
pub struct MockBackend {
    pub calls: Vec<String>,
    pub counts: HashMap<String, usize>,
    pub properties: HashMap<(String, String), String>,
    pub fail_navigation: bool,
}

impl MockBackend {
    pub fn with_count(mut self, selector: &str, count: usize) -> Self {
        self.counts.insert(selector.to_string(), count);
        self
    }

    pub fn with_property(mut self, selector: &str, name: &str, value: &str) -> Self {
        self.properties
            .insert((selector.to_string(), name.to_string()), value.to_string());
        self
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        self.calls.push("launch".into());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        self.calls.push("close".into());
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        true
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        self.calls.push(format!("navigate {}", url));
        if self.fail_navigation {
            return Err(BackendError::Navigation(
                "net::ERR_CONNECTION_REFUSED".into(),
            ));
        }
        Ok(NavigationResult {
            url: url.to_string(),
            title: "Test Page".into(),
            status: 200,
        })
    }

    async fn set_viewport(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        self.calls.push(format!("set_viewport {}x{}", width, height));
        Ok(())
    }

    async fn set_text_rendering(&mut self, enabled: bool) -> Result<(), BackendError> {
        self.calls.push(format!("set_text_rendering {}", enabled));
        Ok(())
    }

    async fn query_count(&mut self, selector: &str) -> Result<usize, BackendError> {
        self.calls.push(format!("query_count {}", selector));
        Ok(self.counts.get(selector).copied().unwrap_or(0))
    }

    async fn get_property(&mut self, selector: &str, name: &str) -> Result<String, BackendError> {
        self.calls.push(format!("get_property {} {}", selector, name));
        Ok(self
            .properties
            .get(&(selector.to_string(), name.to_string()))
            .cloned()
            .unwrap_or_else(|| "undefined".to_string()))
    }
}

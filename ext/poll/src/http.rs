//! reqwest-backed sources.

use crate::source::{ConfigSource, FetchError, MenuSource};
use async_trait::async_trait;
use navgate::{MaintenanceConfig, UserMenuNode};

/// Fetches the maintenance config and the user menu over HTTP.
///
/// Authentication, cookies and retries belong to the supplied
/// [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    config_url: String,
    menu_url: String,
}

impl HttpSource {
    /// Source with a default [`reqwest::Client`].
    pub fn new(config_url: impl Into<String>, menu_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), config_url, menu_url)
    }

    /// Source sharing an existing client (auth headers, cookie store, pool).
    pub fn with_client(
        client: reqwest::Client,
        config_url: impl Into<String>,
        menu_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            config_url: config_url.into(),
            menu_url: menu_url.into(),
        }
    }

    async fn body(&self, request: reqwest::RequestBuilder) -> Result<String, FetchError> {
        let response = request
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        let response = response.error_for_status().map_err(|err| match err.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Transport(err.to_string()),
        })?;
        response
            .text()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))
    }
}

#[async_trait]
impl ConfigSource for HttpSource {
    async fn fetch_config(&self) -> Result<MaintenanceConfig, FetchError> {
        let body = self.body(self.client.get(&self.config_url)).await?;
        Ok(MaintenanceConfig::from_json(&body)?)
    }
}

#[async_trait]
impl MenuSource for HttpSource {
    async fn fetch_menu(&self, only_usable: bool) -> Result<Vec<UserMenuNode>, FetchError> {
        let request = self
            .client
            .get(&self.menu_url)
            .query(&[("onlyUsable", only_usable)]);
        let body = self.body(request).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

use crate::core::config::BrowserConfig;
use crate::core::BrowserTrait;
use crate::errors::{ExtractError, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Chrome browser implementation
pub struct ChromeBrowser {
    browser: Option<Browser>,
    navigation_timeout: Duration,
}

impl ChromeBrowser {
    pub fn new() -> Self {
        Self {
            browser: None,
            navigation_timeout: Duration::from_millis(
                BrowserConfig::default().navigation_timeout_ms,
            ),
        }
    }
}

impl Default for ChromeBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserTrait for ChromeBrowser {
    type TabHandle = Arc<Tab>;

    async fn launch(&mut self, config: &BrowserConfig) -> Result<()> {
        let window_size_arg = format!(
            "--window-size={},{}",
            config.viewport.width, config.viewport.height
        );

        let user_agent_arg = config
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));

        let mut args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new(&window_size_arg),
        ];

        if let Some(ref ua_arg) = user_agent_arg {
            args.push(OsStr::new(ua_arg));
        }

        for arg in &config.args {
            args.push(OsStr::new(arg));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .args(args)
            .build()
            .map_err(|e| ExtractError::LaunchFailed(e.to_string()))?;

        let browser =
            Browser::new(launch_options).map_err(|e| ExtractError::LaunchFailed(e.to_string()))?;

        info!(headless = config.headless, "browser launched");
        self.browser = Some(browser);
        self.navigation_timeout = Duration::from_millis(config.navigation_timeout_ms);
        Ok(())
    }

    async fn new_tab(&self) -> Result<Self::TabHandle> {
        let browser = self
            .browser
            .as_ref()
            .ok_or(ExtractError::BrowserNotLaunched)?;

        let tab = browser
            .new_tab()
            .map_err(|e| ExtractError::TabCreationFailed(e.to_string()))?;
        tab.set_default_timeout(self.navigation_timeout);

        Ok(tab)
    }

    async fn navigate(&self, tab: &Self::TabHandle, url: &str) -> Result<()> {
        tab.navigate_to(url)
            .map_err(|e| ExtractError::NavigationFailed(e.to_string()))?;

        tab.wait_until_navigated()
            .map_err(|e| ExtractError::NavigationFailed(e.to_string()))?;

        Ok(())
    }

    async fn execute_script(&self, tab: &Self::TabHandle, script: &str) -> Result<Value> {
        let result = tab
            .evaluate(script, false)
            .map_err(|e| ExtractError::JavaScriptFailed(e.to_string()))?;

        Ok(result.value.unwrap_or(Value::Null))
    }

    async fn get_url(&self, tab: &Self::TabHandle) -> Result<String> {
        Ok(tab.get_url())
    }

    async fn get_title(&self, tab: &Self::TabHandle) -> Result<String> {
        let result = self.execute_script(tab, "document.title").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    fn is_running(&self) -> bool {
        self.browser.is_some()
    }

    async fn close(&mut self) -> Result<()> {
        self.browser = None;
        Ok(())
    }
}

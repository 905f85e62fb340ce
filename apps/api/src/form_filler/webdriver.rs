//! `BrowserSession` over the W3C WebDriver protocol (chromedriver, geckodriver, Selenium).

use std::time::Duration;

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tokio::time::Instant;
use tracing::info;

use super::session::{BrowserSession, Selector};
use super::FormError;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Opens a Chrome session on the WebDriver server at `webdriver_url`.
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, FormError> {
        let mut args = vec!["--start-maximized", "--disable-notifications"];
        if headless {
            args.push("--headless=new");
        }

        let mut capabilities = serde_json::Map::new();
        capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        let client = ClientBuilder::native()
            .capabilities(capabilities)
            .connect(webdriver_url)
            .await?;
        info!("WebDriver session opened at {webdriver_url} (headless: {headless})");

        Ok(Self { client })
    }

    /// `Ok(None)` when nothing matches yet.
    async fn find_optional(&self, selector: &Selector) -> Result<Option<Element>, FormError> {
        match self.client.find(Locator::Css(&selector.css())).await {
            Ok(element) => Ok(Some(element)),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn find(&self, selector: &Selector) -> Result<Element, FormError> {
        Ok(self.client.find(Locator::Css(&selector.css())).await?)
    }
}

fn timeout_error(selector: &Selector, waited: Duration) -> FormError {
    FormError::Timeout {
        selector: selector.css(),
        waited,
    }
}

/// Stale element references become `FormError::Stale` so callers can skip them.
fn command_error(selector: &Selector, e: CmdError) -> FormError {
    if e.is_stale_element_reference() {
        FormError::Stale {
            selector: selector.css(),
        }
    } else {
        e.into()
    }
}

async fn is_interactable(element: &Element) -> Result<bool, CmdError> {
    Ok(element.is_displayed().await? && element.is_enabled().await?)
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<(), FormError> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn wait_present(
        &mut self,
        selector: &Selector,
        timeout: Duration,
    ) -> Result<(), FormError> {
        let css = selector.css();
        match self
            .client
            .wait()
            .at_most(timeout)
            .every(POLL_INTERVAL)
            .for_element(Locator::Css(&css))
            .await
        {
            Ok(_) => Ok(()),
            Err(CmdError::WaitTimeout) => Err(timeout_error(selector, timeout)),
            Err(e) => Err(e.into()),
        }
    }

    async fn wait_clickable(
        &mut self,
        selector: &Selector,
        timeout: Duration,
    ) -> Result<(), FormError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(element) = self.find_optional(selector).await? {
                match is_interactable(&element).await {
                    Ok(true) => return Ok(()),
                    Ok(false) => {}
                    // Re-rendered between find and check; poll again.
                    Err(e) if e.is_stale_element_reference() => {}
                    Err(e) => return Err(e.into()),
                }
            }
            if Instant::now() >= deadline {
                return Err(timeout_error(selector, timeout));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_gone(&mut self, selector: &Selector, timeout: Duration) -> Result<(), FormError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(element) = self.find_optional(selector).await? {
                match element.is_displayed().await {
                    Ok(true) => {}
                    Ok(false) => return Ok(()),
                    // Detached from the DOM after it was found.
                    Err(e) if e.is_stale_element_reference() => return Ok(()),
                    Err(e) => return Err(e.into()),
                }
            } else {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(timeout_error(selector, timeout));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn fill(&mut self, selector: &Selector, value: &str) -> Result<(), FormError> {
        let element = self.find(selector).await?;
        element
            .clear()
            .await
            .map_err(|e| command_error(selector, e))?;
        element
            .send_keys(value)
            .await
            .map_err(|e| command_error(selector, e))?;
        Ok(())
    }

    async fn click(&mut self, selector: &Selector) -> Result<(), FormError> {
        self.find(selector)
            .await?
            .click()
            .await
            .map_err(|e| command_error(selector, e))?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), FormError> {
        self.client.clone().close().await?;
        info!("WebDriver session closed");
        Ok(())
    }
}

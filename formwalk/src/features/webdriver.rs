use crate::configuration::Configuration;
use crate::error::{FormError, Result};
use crate::features::webdriver_args::build_browser_args;
use crate::features::webdriver_common::{WebDriverBrowser, WebDriverConfig};
use crate::navigator::{
    FormPage, Interaction, QuestionBlock, FORM_SELECTOR, NEXT_BUTTON_XPATH,
    QUESTION_BLOCK_SELECTOR,
};
use crate::utils::wait_until;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thirtyfour::common::capabilities::desiredcapabilities::Capabilities;
use thirtyfour::prelude::*;

/// Attempts made to reach the WebDriver server.
const CONNECT_RETRIES: usize = 10;

/// Click from script, bypassing overlays that swallow native events.
const SCRIPT_CLICK: &str = "arguments[0].click();";
/// Assign a value from script and notify the page's listeners.
const SCRIPT_ASSIGN: &str = r#"
const el = arguments[0];
el.focus();
el.value = arguments[1];
el.dispatchEvent(new Event('input', { bubbles: true }));
el.dispatchEvent(new Event('change', { bubbles: true }));
"#;
/// The document finished loading.
const SCRIPT_READY_STATE: &str = "return document.readyState";

/// WebDriver controller releasing the session when it goes away.
pub struct WebDriverController {
    /// The WebDriver instance, `None` once disposed.
    driver: Option<Arc<WebDriver>>,
    /// The server the session lives on.
    server_url: String,
}

impl WebDriverController {
    /// Create a new WebDriver controller.
    pub fn new(driver: WebDriver, server_url: impl Into<String>) -> Self {
        Self {
            driver: Some(Arc::new(driver)),
            server_url: server_url.into(),
        }
    }

    /// Get a reference to the WebDriver.
    pub fn driver(&self) -> Option<&Arc<WebDriver>> {
        self.driver.as_ref()
    }

    /// The server the session lives on.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Quit the browser session. Idempotent.
    pub async fn dispose(&mut self) {
        if let Some(driver) = self.driver.take() {
            match Arc::try_unwrap(driver) {
                Ok(driver) => close_driver(driver).await,
                Err(_) => {
                    log::warn!("WebDriver still shared on close, the session ends with its last handle.")
                }
            }
        }
    }
}

impl Drop for WebDriverController {
    fn drop(&mut self) {
        if self.driver.is_some() {
            log::warn!(
                "WebDriver session on {} dropped without close, releasing on drop.",
                self.server_url
            );
        }
    }
}

/// Launch a WebDriver session with the provided configuration.
pub async fn launch_driver(config: &Configuration) -> Result<WebDriverController> {
    let webdriver_config = &config.webdriver;
    let server_url = &webdriver_config.server_url;
    let caps = build_capabilities(webdriver_config)?;

    let mut attempts = 0;
    let driver = loop {
        match WebDriver::new(server_url, caps.clone()).await {
            Ok(d) => break d,
            Err(err) => {
                log::error!("WebDriver connection error: {:?}", err);
                attempts += 1;
                if attempts >= CONNECT_RETRIES {
                    log::error!("Exceeded maximum retry attempts for WebDriver connection");
                    return Err(FormError::SessionStart(err.to_string()));
                }
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    };

    if let Some(viewport) = webdriver_config.viewport {
        if let Err(e) = driver
            .set_window_rect(0, 0, viewport.width, viewport.height)
            .await
        {
            log::warn!("Failed to set viewport: {:?}", e);
        }
    }

    // every wait is an explicit poll, implicit waits would stall each empty lookup
    let timeouts = TimeoutConfiguration::new(
        Some(config.page_load_timeout),
        Some(config.page_load_timeout),
        Some(Duration::ZERO),
    );
    if let Err(e) = driver.update_timeouts(timeouts).await {
        log::warn!("Failed to set timeouts: {:?}", e);
    }

    Ok(WebDriverController::new(driver, server_url.clone()))
}

fn page_load_strategy(strategy: &Option<String>) -> Option<thirtyfour::PageLoadStrategy> {
    strategy.as_deref().map(|s| match s {
        "eager" => thirtyfour::PageLoadStrategy::Eager,
        "none" => thirtyfour::PageLoadStrategy::None,
        _ => thirtyfour::PageLoadStrategy::Normal,
    })
}

/// Build browser capabilities based on configuration.
fn build_capabilities(webdriver_config: &WebDriverConfig) -> Result<Capabilities> {
    let args = build_browser_args(webdriver_config);
    let strategy = page_load_strategy(&webdriver_config.page_load_strategy);

    let caps: Capabilities = match webdriver_config.browser {
        WebDriverBrowser::Chrome => {
            let mut caps = DesiredCapabilities::chrome();
            if webdriver_config.accept_insecure_certs {
                caps.accept_insecure_certs(true)?;
            }
            if let Some(strategy) = strategy {
                caps.set_page_load_strategy(strategy)?;
            }
            for arg in &args {
                caps.add_arg(arg)?;
            }
            caps.into()
        }
        WebDriverBrowser::Firefox => {
            let mut caps = DesiredCapabilities::firefox();
            if webdriver_config.accept_insecure_certs {
                caps.accept_insecure_certs(true)?;
            }
            if let Some(strategy) = strategy {
                caps.set_page_load_strategy(strategy)?;
            }
            for arg in &args {
                caps.add_arg(arg)?;
            }
            caps.into()
        }
    };

    log::debug!("Browser args: {}", args.join(" "));

    Ok(caps)
}

/// Close the WebDriver session (consumes the driver).
pub async fn close_driver(driver: WebDriver) {
    if let Err(e) = driver.quit().await {
        log::warn!("Failed to close WebDriver session: {:?}", e);
    }
}

/// Wait until the element accepts native input.
async fn wait_clickable(element: &WebElement, timeout: Duration, interval: Duration) -> Result<()> {
    let el = element;
    let clickable = wait_until(timeout, interval, move || async move {
        matches!(el.is_clickable().await, Ok(true))
    })
    .await;

    if clickable {
        Ok(())
    } else {
        // surface staleness rather than masking it as an interaction failure
        if matches!(element.is_present().await, Ok(false)) {
            return Err(FormError::StaleElement("control detached while waiting".into()));
        }
        Err(FormError::InteractionFailure(format!(
            "not clickable within {:?}",
            timeout
        )))
    }
}

/// Click an element through the requested path.
async fn click_element(
    driver: &WebDriver,
    element: &WebElement,
    mode: Interaction,
    timeout: Duration,
    interval: Duration,
) -> Result<()> {
    match mode {
        Interaction::Native => {
            wait_clickable(element, timeout, interval).await?;
            element.click().await?;
        }
        Interaction::Script => {
            driver
                .execute(SCRIPT_CLICK, vec![element.to_json()?])
                .await
                .map_err(script_failure)?;
        }
    }
    Ok(())
}

/// Script failures mean the fallback path failed too.
fn script_failure(err: WebDriverError) -> FormError {
    match FormError::from(err) {
        FormError::StaleElement(reason) => FormError::StaleElement(reason),
        other => FormError::InteractionFailure(other.to_string()),
    }
}

/// The form page shown by a WebDriver session.
pub struct WebDriverPage {
    driver: Arc<WebDriver>,
    wait_timeout: Duration,
    poll_interval: Duration,
}

impl WebDriverPage {
    /// Navigate to `url` and poll until a form is present and the document is complete.
    pub async fn load(driver: Arc<WebDriver>, url: &str, config: &Configuration) -> Result<Self> {
        let timeout = config.page_load_timeout;
        let deadline = tokio::time::Instant::now() + timeout;

        match tokio::time::timeout_at(deadline, driver.goto(url)).await {
            Ok(Ok(())) => (),
            Ok(Err(err)) => {
                return Err(match FormError::from(err) {
                    FormError::NavigationTimeout(_) => FormError::LoadTimeout(timeout),
                    other => other,
                })
            }
            Err(_) => return Err(FormError::LoadTimeout(timeout)),
        }

        // the ready poll only gets what navigation left of the budget
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        let d = driver.as_ref();
        let ready = wait_until(remaining, config.poll_interval, move || async move {
            let has_form = d
                .find_all(By::Css(FORM_SELECTOR))
                .await
                .map(|forms| !forms.is_empty())
                .unwrap_or(false);

            has_form
                && matches!(
                    d.execute(SCRIPT_READY_STATE, Vec::<serde_json::Value>::new()).await,
                    Ok(ret) if ret.json().as_str() == Some("complete")
                )
        })
        .await;

        if !ready {
            return Err(FormError::LoadTimeout(timeout));
        }

        log::info!("Form page loaded successfully.");

        Ok(Self {
            driver,
            wait_timeout: config.wait_timeout,
            poll_interval: config.poll_interval,
        })
    }

    async fn has_blocks(&self) -> bool {
        self.driver
            .find_all(By::Css(QUESTION_BLOCK_SELECTOR))
            .await
            .map(|blocks| !blocks.is_empty())
            .unwrap_or(false)
    }

    async fn nth(&self, selector: &str, index: usize) -> Result<WebElement> {
        self.driver
            .find_all(By::Css(selector))
            .await?
            .into_iter()
            .nth(index)
            .ok_or_else(|| FormError::ElementMissing(format!("{selector} #{index}")))
    }
}

#[async_trait]
impl FormPage for WebDriverPage {
    type Block = WebDriverBlock;

    async fn question_blocks(&self) -> Result<Vec<WebDriverBlock>> {
        let page = self;
        wait_until(self.wait_timeout, self.poll_interval, move || async move {
            page.has_blocks().await
        })
        .await;

        let elements = self.driver.find_all(By::Css(QUESTION_BLOCK_SELECTOR)).await?;

        Ok(elements
            .into_iter()
            .map(|element| WebDriverBlock {
                element,
                driver: self.driver.clone(),
                wait_timeout: self.wait_timeout,
                poll_interval: self.poll_interval,
            })
            .collect())
    }

    async fn labels(&self, selector: &str) -> Result<Vec<String>> {
        let mut labels = Vec::new();
        for element in self.driver.find_all(By::Css(selector)).await? {
            labels.push(element.text().await?);
        }
        Ok(labels)
    }

    async fn click(&self, selector: &str, index: usize, mode: Interaction) -> Result<()> {
        let element = self.nth(selector, index).await?;
        click_element(
            &self.driver,
            &element,
            mode,
            self.wait_timeout,
            self.poll_interval,
        )
        .await
    }

    async fn next_page(&self) -> Result<bool> {
        let next = match self
            .driver
            .query(By::XPath(NEXT_BUTTON_XPATH))
            .wait(self.wait_timeout, self.poll_interval)
            .first()
            .await
        {
            Ok(next) => next,
            Err(_) => return Ok(false),
        };

        let clicked = match click_element(
            &self.driver,
            &next,
            Interaction::Native,
            self.wait_timeout,
            self.poll_interval,
        )
        .await
        {
            Err(err) if err.is_interaction() => {
                click_element(
                    &self.driver,
                    &next,
                    Interaction::Script,
                    self.wait_timeout,
                    self.poll_interval,
                )
                .await
            }
            other => other,
        };

        if let Err(err) = clicked {
            return Err(FormError::NavigationTimeout(format!(
                "next control could not be clicked: {err}"
            )));
        }

        let old = &next;
        let detached = wait_until(self.wait_timeout, self.poll_interval, move || async move {
            matches!(old.is_present().await, Ok(false))
        })
        .await;

        if !detached {
            return Err(FormError::NavigationTimeout(
                "previous page did not detach".into(),
            ));
        }

        let page = self;
        let arrived = wait_until(self.wait_timeout, self.poll_interval, move || async move {
            page.has_blocks().await
        })
        .await;

        if !arrived {
            return Err(FormError::NavigationTimeout(
                "no question block on the new page".into(),
            ));
        }

        Ok(true)
    }
}

/// One question container, valid until the page re-renders or navigates.
pub struct WebDriverBlock {
    element: WebElement,
    driver: Arc<WebDriver>,
    wait_timeout: Duration,
    poll_interval: Duration,
}

impl WebDriverBlock {
    async fn nth(&self, selector: &str, index: usize) -> Result<WebElement> {
        self.element
            .find_all(By::Css(selector))
            .await?
            .into_iter()
            .nth(index)
            .ok_or_else(|| FormError::ElementMissing(format!("{selector} #{index}")))
    }
}

#[async_trait]
impl QuestionBlock for WebDriverBlock {
    async fn text(&self) -> Result<String> {
        Ok(self.element.text().await?)
    }

    async fn child_text(&self, selector: &str) -> Result<Option<String>> {
        match self.element.find_all(By::Css(selector)).await?.first() {
            Some(child) => Ok(Some(child.text().await?)),
            None => Ok(None),
        }
    }

    async fn contains(&self, selector: &str) -> Result<bool> {
        Ok(!self.element.find_all(By::Css(selector)).await?.is_empty())
    }

    async fn labels(&self, selector: &str) -> Result<Vec<String>> {
        let mut labels = Vec::new();
        for control in self.element.find_all(By::Css(selector)).await? {
            labels.push(control.text().await?);
        }
        Ok(labels)
    }

    async fn click(&self, selector: &str, index: usize, mode: Interaction) -> Result<()> {
        let control = self.nth(selector, index).await?;
        click_element(
            &self.driver,
            &control,
            mode,
            self.wait_timeout,
            self.poll_interval,
        )
        .await
    }

    async fn enter_text(&self, selector: &str, value: &str, mode: Interaction) -> Result<()> {
        let control = self.nth(selector, 0).await?;

        match mode {
            Interaction::Native => {
                wait_clickable(&control, self.wait_timeout, self.poll_interval).await?;
                control.send_keys(value).await?;
            }
            Interaction::Script => {
                self.driver
                    .execute(
                        SCRIPT_ASSIGN,
                        vec![control.to_json()?, serde_json::Value::from(value)],
                    )
                    .await
                    .map_err(script_failure)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_load_strategy() {
        assert!(page_load_strategy(&None).is_none());
        assert!(matches!(
            page_load_strategy(&Some("eager".into())),
            Some(thirtyfour::PageLoadStrategy::Eager)
        ));
        assert!(matches!(
            page_load_strategy(&Some("anything".into())),
            Some(thirtyfour::PageLoadStrategy::Normal)
        ));
    }

    #[test]
    fn test_build_capabilities() {
        let config = WebDriverConfig::new();
        assert!(build_capabilities(&config).is_ok());
        let firefox = WebDriverConfig::new().with_browser(WebDriverBrowser::Firefox);
        assert!(build_capabilities(&firefox).is_ok());
    }
}

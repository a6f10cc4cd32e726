/// The supported WebDriver browser types.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    strum::EnumString,
    strum::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum WebDriverBrowser {
    #[default]
    #[serde(rename = "chrome")]
    #[strum(serialize = "chrome")]
    /// Google Chrome browser.
    Chrome,
    #[serde(rename = "firefox")]
    #[strum(serialize = "firefox")]
    /// Mozilla Firefox browser.
    Firefox,
}

/// The browser viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in css pixels.
    pub width: u32,
    /// Height in css pixels.
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl std::str::FromStr for Viewport {
    type Err = String;

    /// Parse `WIDTHxHEIGHT`, e.g. `1280x800`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("viewport `{s}` is not WIDTHxHEIGHT"))?;
        let width = w.trim().parse().map_err(|_| format!("bad width `{w}`"))?;
        let height = h.trim().parse().map_err(|_| format!("bad height `{h}`"))?;
        Ok(Viewport { width, height })
    }
}

/// Configuration for WebDriver connections.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WebDriverConfig {
    /// The WebDriver server URL (e.g., "http://localhost:4444").
    pub server_url: String,
    /// The browser to use for WebDriver sessions.
    pub browser: WebDriverBrowser,
    /// Run the browser in headless mode.
    pub headless: bool,
    /// Turn off the browser sandbox, needed when running inside containers.
    pub sandbox_disabled: bool,
    /// Custom browser arguments.
    pub browser_args: Option<Vec<String>>,
    /// Proxy server URL.
    pub proxy: Option<String>,
    /// User agent string to use.
    pub user_agent: Option<String>,
    /// Browser window size.
    pub viewport: Option<Viewport>,
    /// Accept insecure certificates.
    pub accept_insecure_certs: bool,
    /// Page load strategy (normal, eager, none).
    pub page_load_strategy: Option<String>,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:4444".to_string(),
            browser: WebDriverBrowser::Chrome,
            headless: true,
            sandbox_disabled: true,
            browser_args: None,
            proxy: None,
            user_agent: None,
            viewport: Some(Viewport::default()),
            accept_insecure_certs: false,
            page_load_strategy: Some("normal".to_string()),
        }
    }
}

impl WebDriverConfig {
    /// Create a new WebDriverConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the WebDriver server URL.
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into();
        self
    }

    /// Set the browser type.
    pub fn with_browser(mut self, browser: WebDriverBrowser) -> Self {
        self.browser = browser;
        self
    }

    /// Set whether to run in headless mode.
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set whether the browser sandbox is turned off.
    pub fn with_sandbox_disabled(mut self, disabled: bool) -> Self {
        self.sandbox_disabled = disabled;
        self
    }

    /// Set custom browser arguments.
    pub fn with_browser_args(mut self, args: Vec<String>) -> Self {
        self.browser_args = Some(args);
        self
    }

    /// Set the proxy server URL.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the viewport dimensions.
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Some(Viewport { width, height });
        self
    }

    /// Set whether to accept insecure certificates.
    pub fn with_accept_insecure_certs(mut self, accept: bool) -> Self {
        self.accept_insecure_certs = accept;
        self
    }

    /// Set the page load strategy.
    pub fn with_page_load_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.page_load_strategy = Some(strategy.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_viewport_parse() {
        assert_eq!(
            Viewport::from_str("1280x800").unwrap(),
            Viewport {
                width: 1280,
                height: 800
            }
        );
        assert!(Viewport::from_str("1280").is_err());
        assert!(Viewport::from_str("wide x 800").is_err());
    }

    #[test]
    fn test_browser_parse() {
        assert_eq!(
            WebDriverBrowser::from_str("Firefox").unwrap(),
            WebDriverBrowser::Firefox
        );
        assert_eq!(WebDriverBrowser::Chrome.to_string(), "chrome");
    }

    #[test]
    fn test_config_builder() {
        let config = WebDriverConfig::new()
            .with_server_url("http://localhost:9515")
            .with_headless(false)
            .with_viewport(800, 600);
        assert_eq!(config.server_url, "http://localhost:9515");
        assert!(!config.headless);
        assert!(config.sandbox_disabled);
        assert_eq!(config.viewport.map(|v| v.width), Some(800));
    }
}

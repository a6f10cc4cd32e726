use crate::features::webdriver_common::WebDriverConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Structure to configure `FormExtractor`.
/// ```rust
/// use formwalk::configuration::Configuration;
/// use std::time::Duration;
///
/// let mut configuration = Configuration::new();
/// configuration
///     .with_page_load_timeout(Duration::from_secs(45))
///     .with_block_attempts(3);
/// configuration.webdriver.headless = false;
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Browser session settings.
    pub webdriver: WebDriverConfig,
    /// Budget for the first page to reach the ready condition.
    pub page_load_timeout: Duration,
    /// Budget for every other wait: next control, staleness, block presence, clickability.
    pub wait_timeout: Duration,
    /// Initial spacing between polls of a wait condition.
    pub poll_interval: Duration,
    /// Attempts per block when the block goes stale.
    pub block_attempts: usize,
    /// Upper bound of checkboxes ticked per question.
    pub checkbox_picks: usize,
    /// Where the extracted questions are persisted.
    pub output_path: Option<PathBuf>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            webdriver: WebDriverConfig::default(),
            page_load_timeout: Duration::from_secs(30),
            wait_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(100),
            block_attempts: 3,
            checkbox_picks: 2,
            output_path: None,
        }
    }
}

impl Configuration {
    /// Represents configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Set the browser session settings.
    pub fn with_webdriver(&mut self, webdriver: WebDriverConfig) -> &mut Self {
        self.webdriver = webdriver;
        self
    }

    /// Budget for the first page load.
    pub fn with_page_load_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.page_load_timeout = timeout;
        self
    }

    /// Budget for in-page waits.
    pub fn with_wait_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.wait_timeout = timeout;
        self
    }

    /// Initial spacing between polls.
    pub fn with_poll_interval(&mut self, interval: Duration) -> &mut Self {
        self.poll_interval = interval;
        self
    }

    /// Attempts per block when it goes stale. At least one attempt is always made.
    pub fn with_block_attempts(&mut self, attempts: usize) -> &mut Self {
        self.block_attempts = attempts.max(1);
        self
    }

    /// Maximum checkboxes ticked per question.
    pub fn with_checkbox_picks(&mut self, picks: usize) -> &mut Self {
        self.checkbox_picks = picks;
        self
    }

    /// Persist the result at this path.
    pub fn with_output_path<P: Into<PathBuf>>(&mut self, path: Option<P>) -> &mut Self {
        self.output_path = path.map(Into::into);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_defaults() {
        let config = Configuration::default();
        assert_eq!(config.block_attempts, 3);
        assert_eq!(config.checkbox_picks, 2);
        assert_eq!(config.page_load_timeout, Duration::from_secs(30));
        assert!(config.webdriver.headless);
        assert!(config.output_path.is_none());
    }

    #[test]
    fn test_block_attempts_floor() {
        let mut config = Configuration::new();
        config.with_block_attempts(0);
        assert_eq!(config.block_attempts, 1);
    }

    #[test]
    fn test_configuration_partial_json() {
        let json = r#"{"block_attempts": 5, "webdriver": {"headless": false}}"#;
        let config: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(config.block_attempts, 5);
        assert!(!config.webdriver.headless);
        assert_eq!(config.webdriver.server_url, "http://localhost:4444");
        assert_eq!(config.wait_timeout, Duration::from_secs(10));
    }
}

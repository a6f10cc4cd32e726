use crate::configuration::Configuration;
use crate::error::{FormError, Result};
use crate::features::webdriver::{launch_driver, WebDriverController};
use crate::utils::log;
use std::future::Future;
use std::sync::Arc;
use thirtyfour::WebDriver;

/// One exclusively owned browser session.
///
/// Call [`Session::close`] when done; a session dropped without closing still
/// releases its browser through the driver's own drop.
pub struct Session {
    controller: WebDriverController,
}

impl Session {
    /// Start a browser session.
    pub async fn open(config: &Configuration) -> Result<Self> {
        let controller = launch_driver(config).await?;
        log("Opened browser session", controller.server_url());
        Ok(Self { controller })
    }

    /// A handle to drive the browser with. Handles must be dropped before
    /// [`Session::close`] for the session to be quit explicitly.
    pub fn driver(&self) -> Result<Arc<WebDriver>> {
        self.controller
            .driver()
            .cloned()
            .ok_or_else(|| FormError::SessionStart("session already closed".into()))
    }

    /// Quit the browser.
    pub async fn close(mut self) {
        self.controller.dispose().await;
        log("Closed browser session", self.controller.server_url());
    }
}

/// Run `task` with a fresh session and close the session afterwards, whether
/// the task succeeded or not.
pub async fn with_session<F, Fut, T>(config: &Configuration, task: F) -> Result<T>
where
    F: FnOnce(Arc<WebDriver>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let session = Session::open(config).await?;

    let outcome = match session.driver() {
        Ok(driver) => task(driver).await,
        Err(err) => Err(err),
    };

    session.close().await;

    outcome
}

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type used across the crate.
pub type Result<T, E = FormError> = std::result::Result<T, E>;

/// Every failure the engine can surface.
///
/// Only [`FormError::LoadTimeout`], [`FormError::SessionStart`] and
/// [`FormError::InvalidUrl`] abort a run. The remaining variants are handled
/// where they occur: stale blocks are retried, navigation timeouts end the
/// traversal and interaction failures fall back to script assignment.
#[derive(Debug, Error)]
pub enum FormError {
    /// The first page never reached the ready condition.
    #[error("form page was not ready within {0:?}")]
    LoadTimeout(Duration),
    /// A page transition did not complete within its budget.
    #[error("navigation did not complete: {0}")]
    NavigationTimeout(String),
    /// The element handle detached from the document.
    #[error("element reference is stale: {0}")]
    StaleElement(String),
    /// The control could not be driven through the requested path.
    #[error("control is not interactable: {0}")]
    InteractionFailure(String),
    /// A selector matched nothing where a match was required.
    #[error("no element matches `{0}`")]
    ElementMissing(String),
    /// The browser session could not be started.
    #[error("browser session could not be started: {0}")]
    SessionStart(String),
    /// Any other failure reported by the browser driver.
    #[error("webdriver: {0}")]
    Driver(String),
    /// The form url could not be parsed.
    #[error("{0}")]
    InvalidUrl(#[from] url::ParseError),
    /// A saved artifact does not exist.
    #[error("no saved questions at {0:?}")]
    ArtifactMissing(PathBuf),
    /// Filesystem failure.
    #[error("{0}")]
    Io(#[from] io::Error),
    /// JSON encoding or decoding failure.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl FormError {
    /// The element went stale and the whole block should be attempted again.
    pub fn is_stale(&self) -> bool {
        matches!(self, FormError::StaleElement(_))
    }

    /// The native interaction path failed and the script path may still work.
    pub fn is_interaction(&self) -> bool {
        matches!(
            self,
            FormError::InteractionFailure(_) | FormError::ElementMissing(_)
        )
    }
}

#[cfg(feature = "webdriver")]
impl From<thirtyfour::error::WebDriverError> for FormError {
    fn from(err: thirtyfour::error::WebDriverError) -> Self {
        use thirtyfour::error::WebDriverErrorInner;

        match &*err {
            WebDriverErrorInner::StaleElementReference(..) => {
                FormError::StaleElement(err.to_string())
            }
            WebDriverErrorInner::ElementNotInteractable(..)
            | WebDriverErrorInner::ElementClickIntercepted(..) => {
                FormError::InteractionFailure(err.to_string())
            }
            WebDriverErrorInner::NoSuchElement(..) => FormError::ElementMissing(err.to_string()),
            WebDriverErrorInner::Timeout(..) | WebDriverErrorInner::WebDriverTimeout(..) => {
                FormError::NavigationTimeout(err.to_string())
            }
            _ => FormError::Driver(err.to_string()),
        }
    }
}

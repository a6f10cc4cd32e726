//! Page-to-page movement and the seams every browser backend implements.
//!
//! A [`QuestionBlock`] is only valid for one classify and fill attempt: it is
//! looked up again by the pipeline whenever it goes stale and never kept
//! across a page transition. Controls inside a block are addressed by
//! selector and position rather than by handle for the same reason.

use crate::error::{FormError, Result};
use async_trait::async_trait;

/// Containers of one question on the page.
pub const QUESTION_BLOCK_SELECTOR: &str = "div[role='listitem']";
/// The "Next" control moving to the following page.
pub const NEXT_BUTTON_XPATH: &str = "//span[text()='Next']/ancestor::div[@role='button']";
/// The element whose presence marks a loaded form.
pub const FORM_SELECTOR: &str = "form";

/// How a control is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Interaction {
    /// Focus and synthetic keystrokes or clicks through the driver.
    Native,
    /// Direct assignment or `click()` from injected script.
    Script,
}

/// One question container on the current page.
#[async_trait]
pub trait QuestionBlock: Send + Sync {
    /// The full visible text of the block.
    async fn text(&self) -> Result<String>;

    /// Text of the first descendant matching `selector`, if any.
    async fn child_text(&self, selector: &str) -> Result<Option<String>>;

    /// Whether any descendant matches `selector`.
    async fn contains(&self, selector: &str) -> Result<bool>;

    /// Visible labels of every descendant matching `selector`, in document order.
    async fn labels(&self, selector: &str) -> Result<Vec<String>>;

    /// Click the `index`th descendant matching `selector`.
    async fn click(&self, selector: &str, index: usize, mode: Interaction) -> Result<()>;

    /// Enter `value` into the first descendant matching `selector`.
    async fn enter_text(&self, selector: &str, value: &str, mode: Interaction) -> Result<()>;
}

/// The page currently shown by the browser session.
#[async_trait]
pub trait FormPage: Send + Sync {
    /// The block type handed out for this page.
    type Block: QuestionBlock;

    /// All question containers attached to the page, in document order.
    async fn question_blocks(&self) -> Result<Vec<Self::Block>>;

    /// Visible labels of every element matching `selector` anywhere on the page.
    async fn labels(&self, selector: &str) -> Result<Vec<String>>;

    /// Click the `index`th element matching `selector` anywhere on the page.
    async fn click(&self, selector: &str, index: usize, mode: Interaction) -> Result<()>;

    /// Click "Next" and wait for the following page.
    ///
    /// `Ok(false)` when the page has no "Next" control. Otherwise blocks until
    /// the old control has detached and a question block is present on the
    /// new page, failing with [`FormError::NavigationTimeout`] past the budget.
    async fn next_page(&self) -> Result<bool>;
}

/// Move to the following page.
///
/// Returns `false` at the end of the form. A navigation that times out or
/// fails in any other way is treated as the end of the form too, since some
/// forms render a terminal "Next" that never leads anywhere.
pub async fn advance_page<P: FormPage>(page: &P) -> bool {
    match page.next_page().await {
        Ok(true) => true,
        Ok(false) => {
            log::info!("No more pages found.");
            false
        }
        Err(FormError::NavigationTimeout(reason)) => {
            log::info!("No more pages found: {reason}");
            false
        }
        Err(err) => {
            log::warn!("Navigation failed, treating as last page: {err}");
            false
        }
    }
}

/// Navigate the session to `url` and wait until the form is ready.
///
/// Readiness is polled: a form element must be present and the document
/// complete. Fails with [`FormError::LoadTimeout`] past the page-load budget.
#[cfg(feature = "webdriver")]
pub async fn load(
    driver: std::sync::Arc<thirtyfour::WebDriver>,
    url: &str,
    config: &crate::configuration::Configuration,
) -> Result<crate::features::webdriver::WebDriverPage> {
    crate::features::webdriver::WebDriverPage::load(driver, url, config).await
}

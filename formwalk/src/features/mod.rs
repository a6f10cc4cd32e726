/// WebDriver session launch and the WebDriver-backed form page.
#[cfg(feature = "webdriver")]
pub mod webdriver;
/// Browser arguments for WebDriver sessions.
#[cfg(feature = "webdriver")]
pub mod webdriver_args;
/// Common modules for WebDriver
pub mod webdriver_common;

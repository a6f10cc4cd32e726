use super::webdriver_common::{WebDriverBrowser, WebDriverConfig};

/// Chrome arguments applied to every session.
pub(crate) static CHROME_WEBDRIVER_ARGS: &[&str] = &[
    "--disable-gpu",
    "--disable-extensions",
    "--disable-popup-blocking",
    "--disable-background-networking",
    "--disable-sync",
    "--disable-default-apps",
    "--mute-audio",
    "--no-first-run",
    "--disable-hang-monitor",
    "--disable-prompt-on-repost",
    "--disable-client-side-phishing-detection",
    "--disable-component-update",
    "--password-store=basic",
    "--use-mock-keychain",
];

/// Firefox arguments applied to every session.
pub(crate) static FIREFOX_WEBDRIVER_ARGS: &[&str] = &["-no-remote", "-new-instance"];

/// Get the default arguments for a browser type.
pub(crate) fn get_browser_args(browser: &WebDriverBrowser) -> &'static [&'static str] {
    match browser {
        WebDriverBrowser::Chrome => CHROME_WEBDRIVER_ARGS,
        WebDriverBrowser::Firefox => FIREFOX_WEBDRIVER_ARGS,
    }
}

/// The complete argument list for a session: defaults, custom args, then the
/// switches derived from the configuration.
pub(crate) fn build_browser_args(config: &WebDriverConfig) -> Vec<String> {
    let mut args: Vec<String> = get_browser_args(&config.browser)
        .iter()
        .map(|a| a.to_string())
        .collect();

    if let Some(ref custom_args) = config.browser_args {
        args.extend(custom_args.iter().cloned());
    }

    match config.browser {
        WebDriverBrowser::Chrome => {
            if config.headless && !args.iter().any(|a| a.contains("headless")) {
                args.push("--headless".to_string());
            }
            if config.sandbox_disabled {
                args.push("--no-sandbox".to_string());
                args.push("--disable-dev-shm-usage".to_string());
            }
            if let Some(ref ua) = config.user_agent {
                args.push(format!("--user-agent={}", ua));
            }
            if let Some(ref proxy) = config.proxy {
                args.push(format!("--proxy-server={}", proxy));
            }
            if let Some(viewport) = config.viewport {
                args.push(format!(
                    "--window-size={},{}",
                    viewport.width, viewport.height
                ));
            }
        }
        WebDriverBrowser::Firefox => {
            if config.headless && !args.iter().any(|a| a.contains("headless")) {
                args.push("-headless".to_string());
            }
            if let Some(viewport) = config.viewport {
                args.push(format!("--width={}", viewport.width));
                args.push(format!("--height={}", viewport.height));
            }
        }
    }

    args
}

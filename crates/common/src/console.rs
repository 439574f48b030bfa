//! Global entry point of a test: navigation, notifications and access to the
//! central fragments (header, footer, finder, dialogs).

use std::path::Path;

use thirtyfour::prelude::*;
use tracing::{debug, info};
use url::Url;

use crate::config::TimeoutConfig;
use crate::error::{TestsuiteError, TestsuiteResult};
use crate::fragment::{
    AddResourceDialogFragment, ConfirmationDialogFragment, DialogFragment, FinderFragment,
    FooterFragment, Fragment, FragmentRoot, HeaderFragment, TabsFragment,
    VerticalNavigationFragment,
};
use crate::ids::{self, css};
use crate::place::{PlaceRequest, TokenFormatter};
use crate::wait::Wait;

/// Browser session, console URL and wait configuration of a test.
///
/// Cloning is cheap; clones share the browser session.
#[derive(Clone)]
pub struct Console {
    driver: WebDriver,
    base_url: Url,
    timeouts: TimeoutConfig,
    formatter: TokenFormatter,
}

impl Console {
    pub fn new(driver: WebDriver, console_url: &str, timeouts: TimeoutConfig) -> TestsuiteResult<Self> {
        let base_url = parse_console_url(console_url)?;
        Ok(Self {
            driver,
            base_url,
            timeouts,
            formatter: TokenFormatter,
        })
    }

    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    pub fn timeouts(&self) -> &TimeoutConfig {
        &self.timeouts
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ------------------------------------------------------ navigation

    /// Waits until the console is loaded, that is until the root container is
    /// present
    pub async fn wait_until_loaded(&self) -> TestsuiteResult<()> {
        self.wait_until_loaded_with(ids::ROOT_CONTAINER).await
    }

    pub async fn wait_until_loaded_with(&self, id: &str) -> TestsuiteResult<()> {
        Wait::page_load(&self.timeouts)
            .element_present(&self.driver, By::Id(id))
            .await?;
        Ok(())
    }

    pub fn absolute_url_for(&self, place: &PlaceRequest) -> TestsuiteResult<String> {
        self.absolute_url(&self.formatter.to_history_token(std::slice::from_ref(place)))
    }

    /// Resolves a URL fragment against the console URL. A missing `#` is
    /// added.
    pub fn absolute_url(&self, fragment: &str) -> TestsuiteResult<String> {
        resolve(&self.base_url, fragment)
    }

    /// Opens a place and waits until the console is loaded
    pub async fn navigate(&self, place: &PlaceRequest) -> TestsuiteResult<()> {
        let url = self.absolute_url_for(place)?;
        info!("Navigate to {}", url);
        self.driver.goto(url.as_str()).await?;
        self.wait_until_loaded().await
    }

    /// The browser must be at `place`
    pub async fn assert_place(&self, place: &PlaceRequest) -> TestsuiteResult<()> {
        let expected = self.formatter.to_history_token(std::slice::from_ref(place));
        let current = self.driver.current_url().await?;
        expect_place(&expected, &current)
    }

    // ------------------------------------------------------ notifications

    /// Verifies that a success notification is visible
    pub async fn success(&self) -> TestsuiteResult<()> {
        self.notification(css::ALERT_SUCCESS).await
    }

    /// Verifies that an error notification is visible
    pub async fn error(&self) -> TestsuiteResult<()> {
        self.notification(css::ALERT_DANGER).await
    }

    async fn notification(&self, alert: &str) -> TestsuiteResult<()> {
        let selector = format!(".{} .{}", css::TOAST_NOTIFICATIONS_LIST_PF, alert);
        debug!("wait for notification {}", selector);
        // the notification shows up once the management operation returned
        Wait::model(&self.timeouts)
            .until(&format!("notification '{}'", selector), || {
                let selector = selector.clone();
                async move {
                    for element in self.driver.find_all(By::Css(selector)).await? {
                        if element.is_displayed().await? {
                            return Ok::<_, TestsuiteError>(true);
                        }
                    }
                    Ok(false)
                }
            })
            .await
    }

    // ------------------------------------------------------ fragment access

    /// Navigates to the place, creates and returns the finder
    pub async fn finder(&self, place: &PlaceRequest) -> TestsuiteResult<FinderFragment> {
        self.navigate(place).await?;
        let mut finder: FinderFragment = self.fragment(By::Id(ids::FINDER)).await?;
        finder.init_place(place.clone());
        Ok(finder)
    }

    pub async fn header(&self) -> TestsuiteResult<HeaderFragment> {
        self.fragment(By::Css(format!("nav.{}", css::NAVBAR))).await
    }

    pub async fn footer(&self) -> TestsuiteResult<FooterFragment> {
        self.fragment(By::Css("footer.footer")).await
    }

    pub async fn vertical_navigation(&self) -> TestsuiteResult<VerticalNavigationFragment> {
        self.fragment(By::ClassName(css::NAV_PF_VERTICAL)).await
    }

    /// Tab container with the given id
    pub async fn tabs(&self, id: &str) -> TestsuiteResult<TabsFragment> {
        self.fragment(By::Id(id)).await
    }

    /// The currently opened dialog
    pub async fn dialog(&self) -> TestsuiteResult<DialogFragment> {
        self.modal().await
    }

    /// The currently opened add resource dialog
    pub async fn add_resource_dialog(&self) -> TestsuiteResult<AddResourceDialogFragment> {
        self.modal().await
    }

    /// The currently opened confirmation dialog
    pub async fn confirmation_dialog(&self) -> TestsuiteResult<ConfirmationDialogFragment> {
        self.modal().await
    }

    async fn modal<T: Fragment>(&self) -> TestsuiteResult<T> {
        let element = Wait::gui(&self.timeouts)
            .element_present(&self.driver, By::Id(ids::HAL_MODAL))
            .await?;
        Wait::gui(&self.timeouts).element_visible(&element).await?;
        Ok(self.create_fragment(element))
    }

    /// Fragment rooted at the first element matching `by`
    pub async fn fragment<T: Fragment>(&self, by: By) -> TestsuiteResult<T> {
        let element = Wait::gui(&self.timeouts)
            .element_present(&self.driver, by)
            .await?;
        Ok(self.create_fragment(element))
    }

    pub fn create_fragment<T: Fragment>(&self, element: WebElement) -> T {
        T::create(FragmentRoot::new(self.driver.clone(), element, self.timeouts))
    }

    // ------------------------------------------------------ misc

    /// Writes a PNG of the current viewport
    pub async fn screenshot(&self, path: &Path) -> TestsuiteResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let png = self.driver.screenshot_as_png().await?;
        tokio::fs::write(path, png).await?;
        debug!("screenshot written to {}", path.display());
        Ok(())
    }
}

fn parse_console_url(console_url: &str) -> TestsuiteResult<Url> {
    Url::parse(console_url)
        .map_err(|e| TestsuiteError::Location(format!("invalid console URL {}: {}", console_url, e)))
}

/// Resolves a URL fragment against `base`. A missing `#` is added.
fn resolve(base: &Url, fragment: &str) -> TestsuiteResult<String> {
    let hash_fragment = if fragment.starts_with('#') {
        fragment.to_string()
    } else {
        format!("#{}", fragment)
    };
    base.join(&hash_fragment)
        .map(|url| url.to_string())
        .map_err(|e| TestsuiteError::Location(format!("URL to construct is malformed: {}", e)))
}

/// The history token of `url`, everything after `#`
fn place_of(url: &Url) -> &str {
    url.fragment().unwrap_or_default()
}

fn expect_place(expected: &str, url: &Url) -> TestsuiteResult<()> {
    let actual = place_of(url);
    if expected == actual {
        Ok(())
    } else {
        Err(TestsuiteError::assertion(format!(
            "expected place '{}', but was '{}'",
            expected, actual
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONSOLE: &str = "http://localhost:9990/console/index.html";

    fn base(url: &str) -> Url {
        parse_console_url(url).unwrap()
    }

    #[test]
    fn test_fragment_replaces_existing_fragment() {
        assert_eq!(
            resolve(&base("http://localhost:9990/console/index.html#home"), "runtime").unwrap(),
            "http://localhost:9990/console/index.html#runtime"
        );
    }

    #[test]
    fn test_missing_hash_is_added() {
        assert_eq!(
            resolve(&base(CONSOLE), "configuration;path=subsystems").unwrap(),
            "http://localhost:9990/console/index.html#configuration;path=subsystems"
        );
    }

    #[test]
    fn test_hash_is_not_doubled() {
        assert_eq!(
            resolve(&base(CONSOLE), "#configuration;path=subsystems").unwrap(),
            "http://localhost:9990/console/index.html#configuration;path=subsystems"
        );
    }

    #[test]
    fn test_history_token_in_url() {
        let place = PlaceRequest::new("scattered-cache")
            .with("cache-container", "cc")
            .with("name", "sc");
        let token = TokenFormatter.to_history_token(&[place]);
        assert_eq!(
            resolve(&base("http://localhost:9990/console/"), &token).unwrap(),
            "http://localhost:9990/console/#scattered-cache;cache-container=cc;name=sc"
        );
    }

    #[test]
    fn test_malformed_console_url() {
        match parse_console_url("not a url") {
            Err(TestsuiteError::Location(msg)) => assert!(msg.contains("invalid console URL")),
            other => panic!("unexpected result: {:?}", other.map(|u| u.to_string())),
        }
        assert!(matches!(parse_console_url("/console/index.html"), Err(TestsuiteError::Location(_))));
    }

    #[test]
    fn test_place_of() {
        let url = base("http://localhost:9990/console/index.html#batch-jberet-configuration");
        assert_eq!(place_of(&url), "batch-jberet-configuration");
        assert_eq!(place_of(&base(CONSOLE)), "");
    }

    #[test]
    fn test_expect_place_compares_whole_token() {
        let url = base("http://localhost:9990/console/index.html#scattered-cache;cache-container=cc;name=sc");
        expect_place("scattered-cache;cache-container=cc;name=sc", &url).unwrap();

        match expect_place("scattered-cache;cache-container=cc", &url) {
            Err(TestsuiteError::AssertionFailed(msg)) => {
                assert!(msg.contains("expected place 'scattered-cache;cache-container=cc'"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

//! Page fragments
//!
//! A fragment wraps the root element of a DOM subtree (a form, a table, a
//! dialog) and scopes every lookup to that root. Fragments are created by
//! [`Console`](crate::console::Console) or by page objects through
//! [`Fragment::create`].

pub mod dialog;
pub mod finder;
pub mod footer;
pub mod form;
pub mod header;
pub mod navigation;
pub mod table;
pub mod tabs;

use thirtyfour::prelude::*;

use crate::config::TimeoutConfig;
use crate::error::TestsuiteResult;
use crate::wait::Wait;

pub use dialog::{AddResourceDialogFragment, ConfirmationDialogFragment, DialogFragment};
pub use finder::{ColumnFragment, FinderFragment};
pub use footer::FooterFragment;
pub use form::FormFragment;
pub use header::HeaderFragment;
pub use navigation::VerticalNavigationFragment;
pub use table::TableFragment;
pub use tabs::TabsFragment;

/// Root element of a fragment plus what it needs to wait and search
#[derive(Clone)]
pub struct FragmentRoot {
    pub driver: WebDriver,
    pub element: WebElement,
    pub timeouts: TimeoutConfig,
}

impl FragmentRoot {
    pub fn new(driver: WebDriver, element: WebElement, timeouts: TimeoutConfig) -> Self {
        Self {
            driver,
            element,
            timeouts,
        }
    }

    /// First element below the root matching `by`
    pub async fn find(&self, by: By) -> TestsuiteResult<WebElement> {
        Ok(self.element.find(by).await?)
    }

    pub async fn find_all(&self, by: By) -> TestsuiteResult<Vec<WebElement>> {
        Ok(self.element.find_all(by).await?)
    }

    /// Waits (gui timeout) until an element below the root matches `by`
    pub async fn wait_for(&self, by: By) -> TestsuiteResult<WebElement> {
        let description = format!("element {:?} below fragment root", by);
        Wait::gui(&self.timeouts)
            .until_some(&description, || {
                let by = by.clone();
                async move {
                    Ok::<_, crate::error::TestsuiteError>(
                        self.element.find_all(by).await?.into_iter().next(),
                    )
                }
            })
            .await
    }

    /// The `id` attribute of the root
    pub async fn id(&self) -> TestsuiteResult<String> {
        Ok(self.element.attr("id").await?.unwrap_or_default())
    }

    pub fn gui(&self) -> Wait {
        Wait::gui(&self.timeouts)
    }

    pub fn ajax(&self) -> Wait {
        Wait::ajax(&self.timeouts)
    }

    pub fn model(&self) -> Wait {
        Wait::model(&self.timeouts)
    }

    /// A fragment rooted at another element with the same driver and timeouts
    pub fn child<T: Fragment>(&self, element: WebElement) -> T {
        T::create(FragmentRoot::new(self.driver.clone(), element, self.timeouts))
    }
}

/// A page-object wrapper around a DOM subtree
pub trait Fragment: Sized {
    fn create(root: FragmentRoot) -> Self;

    fn root(&self) -> &FragmentRoot;
}

/// Quotes `text` as an XPath string literal. Text containing both quote
/// kinds becomes a `concat()` expression.
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        format!("'{}'", text)
    } else if !text.contains('"') {
        format!("\"{}\"", text)
    } else {
        let parts: Vec<String> = text.split('\'').map(|part| format!("'{}'", part)).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

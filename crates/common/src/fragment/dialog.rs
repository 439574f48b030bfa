//! Modal dialogs

use thirtyfour::prelude::*;
use tracing::debug;

use crate::error::TestsuiteResult;
use crate::fragment::{Fragment, FormFragment, FragmentRoot};
use crate::ids::{self, css};

/// The modal dialog rooted at `#hal-modal`
#[derive(Clone)]
pub struct DialogFragment {
    root: FragmentRoot,
}

impl Fragment for DialogFragment {
    fn create(root: FragmentRoot) -> Self {
        Self { root }
    }

    fn root(&self) -> &FragmentRoot {
        &self.root
    }
}

impl DialogFragment {
    pub async fn primary_button(&self) -> TestsuiteResult<WebElement> {
        self.root
            .wait_for(By::Css(format!(".modal-footer .{}", css::BTN_PRIMARY)))
            .await
    }

    /// The dialog form; falls back to the first form of the body
    pub async fn form(&self) -> TestsuiteResult<FormFragment> {
        let element = match self.root.find_all(By::Id(ids::HAL_MODAL_FORM)).await?.into_iter().next() {
            Some(element) => element,
            None => self.root.wait_for(By::Css(".modal-body form")).await?,
        };
        Ok(self.root.child(element))
    }

    pub async fn close(&self) -> TestsuiteResult<()> {
        self.root
            .wait_for(By::Css(".modal-header button.close"))
            .await?
            .click()
            .await?;
        self.wait_until_closed().await
    }

    pub async fn wait_until_closed(&self) -> TestsuiteResult<()> {
        self.root.model().element_hidden(&self.root.element).await
    }

    pub async fn title(&self) -> TestsuiteResult<String> {
        let title = self.root.find(By::ClassName("modal-title")).await?;
        Ok(title.text().await?.trim().to_string())
    }
}

/// Dialog for adding a resource
#[derive(Clone)]
pub struct AddResourceDialogFragment {
    dialog: DialogFragment,
}

impl Fragment for AddResourceDialogFragment {
    fn create(root: FragmentRoot) -> Self {
        Self {
            dialog: DialogFragment::create(root),
        }
    }

    fn root(&self) -> &FragmentRoot {
        self.dialog.root()
    }
}

impl AddResourceDialogFragment {
    pub async fn form(&self) -> TestsuiteResult<FormFragment> {
        self.dialog.form().await
    }

    /// Clicks add and waits until the dialog is gone
    pub async fn add(&self) -> TestsuiteResult<()> {
        debug!("add resource");
        self.dialog.primary_button().await?.click().await?;
        self.dialog.wait_until_closed().await
    }

    pub fn dialog(&self) -> &DialogFragment {
        &self.dialog
    }
}

/// Yes/no confirmation dialog
#[derive(Clone)]
pub struct ConfirmationDialogFragment {
    dialog: DialogFragment,
}

impl Fragment for ConfirmationDialogFragment {
    fn create(root: FragmentRoot) -> Self {
        Self {
            dialog: DialogFragment::create(root),
        }
    }

    fn root(&self) -> &FragmentRoot {
        self.dialog.root()
    }
}

impl ConfirmationDialogFragment {
    pub async fn confirm(&self) -> TestsuiteResult<()> {
        debug!("confirm");
        self.dialog.primary_button().await?.click().await?;
        self.dialog.wait_until_closed().await
    }

    pub fn dialog(&self) -> &DialogFragment {
        &self.dialog
    }
}

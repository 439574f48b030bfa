//! Data tables with a toolbar of buttons

use thirtyfour::prelude::*;
use tracing::debug;

use crate::error::{TestsuiteError, TestsuiteResult};
use crate::fragment::{xpath_literal, Fragment, FormFragment, FragmentRoot};
use crate::ids::css;

pub const ADD: &str = "Add";
pub const REMOVE: &str = "Remove";

const FILTER_INPUT: &str = ".dataTables_filter input";

/// A table rooted at its data table wrapper. An optional bound form shows
/// the selected row.
#[derive(Clone)]
pub struct TableFragment {
    root: FragmentRoot,
    form: Option<FormFragment>,
}

impl Fragment for TableFragment {
    fn create(root: FragmentRoot) -> Self {
        Self { root, form: None }
    }

    fn root(&self) -> &FragmentRoot {
        &self.root
    }
}

impl TableFragment {
    /// After each selection, wait until `form` shows the selected row
    pub fn bind(&mut self, form: FormFragment) {
        self.form = Some(form);
    }

    pub fn form(&self) -> Option<&FormFragment> {
        self.form.as_ref()
    }

    /// Clicks the toolbar button labelled `text`
    pub async fn button(&self, text: &str) -> TestsuiteResult<()> {
        debug!("table button '{}'", text);
        let label = text.to_string();
        let button = self
            .root
            .gui()
            .until_some(&format!("table button '{}'", text), || {
                let label = label.clone();
                async move {
                    let buttons = self
                        .root
                        .find_all(By::Css(format!(".{} button", css::DATA_TABLE_BUTTONS)))
                        .await?;
                    for button in buttons {
                        if button.text().await?.trim() == label {
                            return Ok::<_, TestsuiteError>(Some(button));
                        }
                    }
                    Ok(None)
                }
            })
            .await?;
        button.click().await?;
        Ok(())
    }

    /// Opens the add dialog
    pub async fn add(&self) -> TestsuiteResult<()> {
        self.button(ADD).await
    }

    /// Selects the row with a cell reading `name`
    pub async fn select(&self, name: &str) -> TestsuiteResult<()> {
        debug!("select row '{}'", name);
        let cell = self.root.wait_for(cell(name)).await?;
        cell.click().await?;

        let row = cell.find(By::XPath("./ancestor::tr[1]")).await?;
        self.root.gui().element_has_class(&row, css::SELECTED).await?;

        if let Some(form) = &self.form {
            form.root().gui().element_visible(&form.root().element).await?;
        }
        Ok(())
    }

    /// Selects the row and clicks remove; the confirmation dialog follows
    pub async fn remove(&self, name: &str) -> TestsuiteResult<()> {
        self.select(name).await?;
        self.button(REMOVE).await
    }

    pub async fn filter(&self, text: &str) -> TestsuiteResult<()> {
        let input = self.root.find(By::Css(FILTER_INPUT)).await?;
        input.clear().await?;
        input.send_keys(text).await?;
        Ok(())
    }

    pub async fn contains(&self, name: &str) -> TestsuiteResult<bool> {
        Ok(!self.root.find_all(cell(name)).await?.is_empty())
    }

    /// Waits until a row reads `name`, e.g. after adding a resource
    pub async fn wait_for_row(&self, name: &str) -> TestsuiteResult<()> {
        self.root
            .model()
            .until(&format!("row '{}'", name), || async move { self.contains(name).await })
            .await
    }

    /// Waits until no row reads `name` any more
    pub async fn wait_until_removed(&self, name: &str) -> TestsuiteResult<()> {
        self.root
            .model()
            .until(&format!("row '{}' to disappear", name), || async move {
                Ok::<_, TestsuiteError>(!self.contains(name).await?)
            })
            .await
    }
}

fn cell(name: &str) -> By {
    By::XPath(format!(".//tbody//td[normalize-space(.)={}]", xpath_literal(name)))
}

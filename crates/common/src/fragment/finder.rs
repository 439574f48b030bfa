//! The finder: columns of items, drilled down from left to right

use thirtyfour::prelude::*;
use tracing::debug;

use crate::console::Console;
use crate::error::{TestsuiteError, TestsuiteResult};
use crate::fragment::{Fragment, FragmentRoot};
use crate::ids::{self, css};
use crate::place::PlaceRequest;
use crate::wait::has_class;

const PREVIEW: &str = "hal-finder-preview";

#[derive(Clone)]
pub struct FinderFragment {
    root: FragmentRoot,
    place: Option<PlaceRequest>,
}

impl Fragment for FinderFragment {
    fn create(root: FragmentRoot) -> Self {
        Self { root, place: None }
    }

    fn root(&self) -> &FragmentRoot {
        &self.root
    }
}

impl FinderFragment {
    /// Remembers the place the finder was opened for
    pub fn init_place(&mut self, place: PlaceRequest) {
        self.place = Some(place);
    }

    pub fn place(&self) -> Option<&PlaceRequest> {
        self.place.as_ref()
    }

    /// The browser must still be at the place the finder was opened for
    pub async fn assert_place(&self, console: &Console) -> TestsuiteResult<()> {
        match &self.place {
            Some(place) => console.assert_place(place).await,
            None => Err(TestsuiteError::assertion("finder was not opened for a place")),
        }
    }

    /// The column with the given id
    pub async fn column(&self, id: &str) -> TestsuiteResult<ColumnFragment> {
        let element = self.root.wait_for(By::Id(id)).await?;
        self.root.gui().element_visible(&element).await?;
        Ok(self.root.child(element))
    }

    /// Text of the preview pane
    pub async fn preview(&self) -> TestsuiteResult<String> {
        let preview = self.root.wait_for(By::Id(PREVIEW)).await?;
        Ok(preview.text().await?)
    }
}

/// A single finder column
#[derive(Clone)]
pub struct ColumnFragment {
    root: FragmentRoot,
}

impl Fragment for ColumnFragment {
    fn create(root: FragmentRoot) -> Self {
        Self { root }
    }

    fn root(&self) -> &FragmentRoot {
        &self.root
    }
}

impl ColumnFragment {
    /// Clicks the add button in the column header
    pub async fn add(&self) -> TestsuiteResult<()> {
        let column_id = self.root.id().await?;
        let id = ids::build(&column_id, &[ids::ADD])?;
        debug!("finder column add #{}", id);
        self.root.wait_for(By::Id(id)).await?.click().await?;
        Ok(())
    }

    /// Selects an item and waits until it is active
    pub async fn select_item(&self, item_id: &str) -> TestsuiteResult<()> {
        debug!("finder select #{}", item_id);
        let item = self.root.wait_for(By::Id(item_id)).await?;
        item.click().await?;
        self.root.gui().element_has_class(&item, css::ACTIVE).await
    }

    /// Selects an item and runs one of its actions
    pub async fn item_action(&self, item_id: &str, action: &str) -> TestsuiteResult<()> {
        self.select_item(item_id).await?;
        let item = self.root.find(By::Id(item_id)).await?;

        let direct = item
            .find_all(By::Css(format!("[data-operation='{}']", action)))
            .await?;
        if let Some(link) = direct.into_iter().next() {
            if link.is_displayed().await? {
                link.click().await?;
                return Ok(());
            }
        }

        item.find(By::ClassName("dropdown-toggle")).await?.click().await?;
        let link = self
            .root
            .wait_for(By::Css(format!("#{} [data-operation='{}']", item_id, action)))
            .await?;
        link.click().await?;
        Ok(())
    }

    pub async fn contains(&self, item_id: &str) -> TestsuiteResult<bool> {
        Ok(!self.root.find_all(By::Id(item_id)).await?.is_empty())
    }

    /// Waits until an item shows up, e.g. after adding a resource
    pub async fn wait_for_item(&self, item_id: &str) -> TestsuiteResult<()> {
        self.root
            .model()
            .until(&format!("finder item #{}", item_id), || async move {
                self.contains(item_id).await
            })
            .await
    }

    pub async fn wait_until_removed(&self, item_id: &str) -> TestsuiteResult<()> {
        self.root
            .model()
            .until(&format!("finder item #{} to disappear", item_id), || async move {
                Ok::<_, TestsuiteError>(!self.contains(item_id).await?)
            })
            .await
    }

    pub async fn is_selected(&self, item_id: &str) -> TestsuiteResult<bool> {
        let item = self.root.find(By::Id(item_id)).await?;
        has_class(&item, css::ACTIVE).await
    }
}

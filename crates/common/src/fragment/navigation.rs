//! Vertical navigation on the left of application views

use thirtyfour::prelude::*;
use tracing::debug;

use crate::error::TestsuiteResult;
use crate::fragment::{Fragment, FragmentRoot};
use crate::ids::css;

#[derive(Clone)]
pub struct VerticalNavigationFragment {
    root: FragmentRoot,
}

impl Fragment for VerticalNavigationFragment {
    fn create(root: FragmentRoot) -> Self {
        Self { root }
    }

    fn root(&self) -> &FragmentRoot {
        &self.root
    }
}

impl VerticalNavigationFragment {
    /// Clicks a top-level item and waits until it is active
    pub async fn select_primary(&self, id: &str) -> TestsuiteResult<()> {
        debug!("vertical navigation #{}", id);
        self.select(id).await
    }

    /// Clicks a primary item, then one of its children
    pub async fn select_secondary(&self, primary: &str, secondary: &str) -> TestsuiteResult<()> {
        debug!("vertical navigation #{} > #{}", primary, secondary);
        self.select(primary).await?;
        self.select(secondary).await
    }

    async fn select(&self, id: &str) -> TestsuiteResult<()> {
        let item = self.root.wait_for(By::Id(id)).await?;
        item.find(By::Tag("a")).await?.click().await?;
        self.root.gui().element_has_class(&item, css::ACTIVE).await
    }
}

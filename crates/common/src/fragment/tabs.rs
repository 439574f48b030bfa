//! Tab containers

use thirtyfour::prelude::*;

use crate::error::TestsuiteResult;
use crate::fragment::{Fragment, FragmentRoot};

#[derive(Clone)]
pub struct TabsFragment {
    root: FragmentRoot,
}

impl Fragment for TabsFragment {
    fn create(root: FragmentRoot) -> Self {
        Self { root }
    }

    fn root(&self) -> &FragmentRoot {
        &self.root
    }
}

impl TabsFragment {
    /// Activates the tab whose pane has id `tab_id` and waits until the pane
    /// is visible
    pub async fn select(&self, tab_id: &str) -> TestsuiteResult<()> {
        let link = self
            .root
            .wait_for(By::Css(format!("ul.nav-tabs a[href='#{}']", tab_id)))
            .await?;
        link.click().await?;

        let pane = self.root.wait_for(By::Id(tab_id)).await?;
        self.root.gui().element_visible(&pane).await
    }
}

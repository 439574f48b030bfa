//! Top navigation bar

use thirtyfour::prelude::*;

use crate::error::TestsuiteResult;
use crate::fragment::{Fragment, FragmentRoot};
use crate::ids::css;

#[derive(Clone)]
pub struct HeaderFragment {
    root: FragmentRoot,
}

impl Fragment for HeaderFragment {
    fn create(root: FragmentRoot) -> Self {
        Self { root }
    }

    fn root(&self) -> &FragmentRoot {
        &self.root
    }
}

impl HeaderFragment {
    /// Clicks a top level category such as `tlc-configuration`
    pub async fn top_level_tab(&self, id: &str) -> TestsuiteResult<()> {
        let tab = self.root.wait_for(By::Id(id)).await?;
        tab.click().await?;
        Ok(())
    }

    /// Breadcrumb text of the current application view
    pub async fn breadcrumb(&self) -> TestsuiteResult<String> {
        let breadcrumb = self.root.wait_for(By::ClassName(css::BREADCRUMB)).await?;
        Ok(breadcrumb.text().await?.trim().to_string())
    }
}

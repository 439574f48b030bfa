use thirtyfour::prelude::*;

use crate::error::TestsuiteResult;
use crate::fragment::{Fragment, FragmentRoot};

const VERSION: &str = "footer-version";
const SETTINGS: &str = "settings";

#[derive(Clone)]
pub struct FooterFragment {
    root: FragmentRoot,
}

impl Fragment for FooterFragment {
    fn create(root: FragmentRoot) -> Self {
        Self { root }
    }

    fn root(&self) -> &FragmentRoot {
        &self.root
    }
}

impl FooterFragment {
    pub async fn version(&self) -> TestsuiteResult<String> {
        let version = self.root.wait_for(By::Id(VERSION)).await?;
        Ok(version.text().await?.trim().to_string())
    }

    /// Opens the settings dialog
    pub async fn settings(&self) -> TestsuiteResult<()> {
        self.root.wait_for(By::Id(SETTINGS)).await?.click().await?;
        Ok(())
    }
}

use async_trait::async_trait;
use hal_testsuite::fragment::{FormFragment, TabsFragment};
use hal_testsuite::{Console, Page, TestsuiteError, TestsuiteResult, Wait};
use thirtyfour::prelude::By;
use tracing::debug;

pub const FILE_STORE_TAB_CONTAINER: &str = "scattered-cache-file-store-tab-container";
pub const FILE_STORE_WRITE_BEHAVIOUR_TAB: &str = "scattered-cache-file-store-write-tab";
const FILE_STORE_WRITE_BEHIND_FORM: &str = "scattered-cache-file-store-behind-form";
const SWITCH_BEHAVIOUR: &str = "[data-operation='switch-behaviour']";

/// `scattered-cache;cache-container=<cc>;name=<cache>`
pub struct ScatteredCachePage {
    console: Console,
}

#[async_trait]
impl Page for ScatteredCachePage {
    const PLACE: &'static str = "scattered-cache";

    async fn create(console: &Console) -> TestsuiteResult<Self> {
        Ok(Self {
            console: console.clone(),
        })
    }
}

impl ScatteredCachePage {
    pub async fn open(console: &Console, cache_container: &str, name: &str) -> TestsuiteResult<Self> {
        Self::navigate(console, &[("cache-container", cache_container), ("name", name)]).await
    }

    pub async fn file_store_tab(&self) -> TestsuiteResult<TabsFragment> {
        self.console.tabs(FILE_STORE_TAB_CONTAINER).await
    }

    pub async fn file_store_write_behind_form(&self) -> TestsuiteResult<FormFragment> {
        self.console.fragment(By::Id(FILE_STORE_WRITE_BEHIND_FORM)).await
    }

    /// Switches between write-behind and write-through on the write
    /// behaviour tab
    pub async fn switch_behaviour(&self) -> TestsuiteResult<()> {
        debug!("switch write behaviour");
        let selector = format!("#{} {}", FILE_STORE_WRITE_BEHAVIOUR_TAB, SWITCH_BEHAVIOUR);
        let driver = self.console.driver();
        let link = Wait::gui(self.console.timeouts())
            .until_some(&format!("visible {}", selector), || {
                let selector = selector.clone();
                async move {
                    for element in driver.find_all(By::Css(selector)).await? {
                        if element.is_displayed().await? {
                            return Ok::<_, TestsuiteError>(Some(element));
                        }
                    }
                    Ok(None)
                }
            })
            .await?;
        link.click().await?;
        self.console.success().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal_testsuite::ids;

    #[test]
    fn test_place() {
        let place = ScatteredCachePage::place(&[("cache-container", "cc"), ("name", "sc")]);
        assert_eq!(place.to_string(), "scattered-cache;cache-container=cc;name=sc");
    }

    #[test]
    fn test_write_behaviour_tab_id() {
        assert_eq!(
            ids::build("scattered-cache", &["file-store", "write", ids::TAB]).unwrap(),
            FILE_STORE_WRITE_BEHAVIOUR_TAB
        );
    }
}

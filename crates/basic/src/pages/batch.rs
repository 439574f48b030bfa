use async_trait::async_trait;
use hal_testsuite::fragment::{FormFragment, TableFragment};
use hal_testsuite::{ids, Console, Page, TestsuiteResult};
use thirtyfour::prelude::By;

const THREAD_POOL: &str = "batch-thread-pool";

/// `batch-jberet-configuration`
pub struct BatchPage {
    console: Console,
}

#[async_trait]
impl Page for BatchPage {
    const PLACE: &'static str = "batch-jberet-configuration";

    async fn create(console: &Console) -> TestsuiteResult<Self> {
        Ok(Self {
            console: console.clone(),
        })
    }
}

impl BatchPage {
    pub async fn thread_pool_form(&self) -> TestsuiteResult<FormFragment> {
        let id = ids::build(THREAD_POOL, &[ids::FORM])?;
        self.console.fragment(By::Id(id)).await
    }

    /// The data table wrapper, which also holds the toolbar buttons
    pub async fn thread_pool_table(&self) -> TestsuiteResult<TableFragment> {
        let id = format!("{}_wrapper", ids::build(THREAD_POOL, &[ids::TABLE])?);
        self.console.fragment(By::Id(id)).await
    }
}

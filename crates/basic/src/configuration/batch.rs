//! Batch thread pools: table plus form on the batch configuration page

use futures::FutureExt;
use hal_testsuite::fragment::{FormFragment, TableFragment};
use hal_testsuite::{ensure_eq, random, Operations, Page, TestCase, TestClass, TestContext, TestsuiteResult, Value, Values};

use crate::fixtures::batch::*;
use crate::fixtures::NAME;
use crate::pages::BatchPage;

const NAVIGATION_ITEM: &str = "batch-thread-pool-item";

pub fn thread_pool_test() -> TestClass {
    TestClass::new("ThreadPoolTest")
        .tagged("batch")
        .before_all(|ops| before_all(ops).boxed())
        .after_all(|ops| after_all(ops).boxed())
        .case(TestCase::new("create", |ctx| create(ctx).boxed()))
        .case(TestCase::new("create_no_max_threads", |ctx| create_no_max_threads(ctx).boxed()))
        .case(TestCase::new("create_invalid_max_threads", |ctx| create_invalid_max_threads(ctx).boxed()))
        .case(TestCase::new("read", |ctx| read(ctx).boxed()))
        .case(TestCase::new("update", |ctx| update(ctx).boxed()))
        .case(TestCase::new("update_no_max_threads", |ctx| update_no_max_threads(ctx).boxed()))
        .case(TestCase::new("reset", |ctx| reset(ctx).boxed()))
        .case(TestCase::new("update_invalid_max_threads", |ctx| update_invalid_max_threads(ctx).boxed()))
        .case(TestCase::new("delete", |ctx| delete(ctx).boxed()))
}

async fn before_all(operations: Operations) -> TestsuiteResult<()> {
    for name in [&*THREAD_POOL_READ, &*THREAD_POOL_UPDATE, &*THREAD_POOL_DELETE] {
        operations
            .add_with(&thread_pool_address(name), Values::of(MAX_THREADS, MAX_THREADS_VALUE))
            .await?;
    }
    Ok(())
}

async fn after_all(operations: Operations) -> TestsuiteResult<()> {
    for name in [
        &*THREAD_POOL_CREATE,
        &*THREAD_POOL_READ,
        &*THREAD_POOL_UPDATE,
        &*THREAD_POOL_DELETE,
    ] {
        operations.remove_if_exists(&thread_pool_address(name)).await?;
    }
    Ok(())
}

/// Opens the page and binds the thread pool form to the table
async fn setup(ctx: &TestContext) -> TestsuiteResult<(TableFragment, FormFragment)> {
    let page = BatchPage::navigate(&ctx.console, &[]).await?;
    ctx.console
        .vertical_navigation()
        .await?
        .select_primary(NAVIGATION_ITEM)
        .await?;

    let form = page.thread_pool_form().await?;
    let mut table = page.thread_pool_table().await?;
    table.bind(form.clone());
    Ok((table, form))
}

async fn create(ctx: TestContext) -> TestsuiteResult<()> {
    let (table, _) = setup(&ctx).await?;
    ctx.crud
        .create_with(
            &thread_pool_address(&THREAD_POOL_CREATE),
            &table,
            &[
                (NAME, Value::from(&*THREAD_POOL_CREATE)),
                (MAX_THREADS, Value::from(MAX_THREADS_VALUE)),
            ],
        )
        .await
}

async fn create_no_max_threads(ctx: TestContext) -> TestsuiteResult<()> {
    let (table, _) = setup(&ctx).await?;
    ctx.crud
        .create_with_error(&table, &THREAD_POOL_CREATE, MAX_THREADS)
        .await
}

async fn create_invalid_max_threads(ctx: TestContext) -> TestsuiteResult<()> {
    let (table, _) = setup(&ctx).await?;
    ctx.crud
        .create_with_error_fields(
            &table,
            &[
                (NAME, Value::from(&*THREAD_POOL_CREATE)),
                (MAX_THREADS, Value::from(-1)),
            ],
            MAX_THREADS,
        )
        .await
}

async fn read(ctx: TestContext) -> TestsuiteResult<()> {
    let (table, form) = setup(&ctx).await?;
    table.select(&THREAD_POOL_READ).await?;
    ensure_eq(NAME, THREAD_POOL_READ.as_str(), form.value(NAME).await?.as_str())?;
    ensure_eq(MAX_THREADS, MAX_THREADS_VALUE, form.int_value(MAX_THREADS).await?)
}

async fn update(ctx: TestContext) -> TestsuiteResult<()> {
    let max_threads = random::number();
    let (table, form) = setup(&ctx).await?;
    table.select(&THREAD_POOL_UPDATE).await?;
    ctx.crud
        .update(&thread_pool_address(&THREAD_POOL_UPDATE), &form, MAX_THREADS, max_threads)
        .await
}

async fn update_no_max_threads(ctx: TestContext) -> TestsuiteResult<()> {
    let (table, form) = setup(&ctx).await?;
    table.select(&THREAD_POOL_UPDATE).await?;
    ctx.crud
        .update_with_error_fields(&form, &[(MAX_THREADS, Value::Undefined)], MAX_THREADS)
        .await
}

async fn reset(ctx: TestContext) -> TestsuiteResult<()> {
    let (table, form) = setup(&ctx).await?;
    table.select(&THREAD_POOL_UPDATE).await?;
    ctx.crud
        .reset(&thread_pool_address(&THREAD_POOL_UPDATE), &form)
        .await
}

async fn update_invalid_max_threads(ctx: TestContext) -> TestsuiteResult<()> {
    let (table, form) = setup(&ctx).await?;
    table.select(&THREAD_POOL_UPDATE).await?;
    ctx.crud.update_with_error(&form, MAX_THREADS, -1).await
}

async fn delete(ctx: TestContext) -> TestsuiteResult<()> {
    let (table, _) = setup(&ctx).await?;
    ctx.crud
        .delete(&thread_pool_address(&THREAD_POOL_DELETE), &table, &THREAD_POOL_DELETE)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cases_in_declaration_order() {
        let class = thread_pool_test();
        let names: Vec<&str> = class.cases.iter().map(|case| case.name).collect();
        assert_eq!(
            names,
            [
                "create",
                "create_no_max_threads",
                "create_invalid_max_threads",
                "read",
                "update",
                "update_no_max_threads",
                "reset",
                "update_invalid_max_threads",
                "delete",
            ]
        );
        assert!(class.before_all.is_some());
        assert!(class.after_all.is_some());
    }
}

//! Write behaviour of the file store of a scattered cache

use futures::FutureExt;
use hal_testsuite::{random, Operations, TestCase, TestClass, TestContext, TestsuiteResult, Values};
use once_cell::sync::Lazy;

use crate::fixtures::infinispan::*;
use crate::pages::scattered_cache::{ScatteredCachePage, FILE_STORE_WRITE_BEHAVIOUR_TAB};

const NAVIGATION_ITEM: &str = "scattered-cache-store-item";
const ALLOW_RESOURCE_SERVICE_RESTART: &str = "allow-resource-service-restart";

static CONTAINER: Lazy<String> = Lazy::new(|| format!("cache-container-{}", random::name()));
static WRITE_BEHIND_EDIT: Lazy<String> =
    Lazy::new(|| format!("scattered-cache-with-write-behind-to-be-edited-{}", random::name()));
static WRITE_THROUGH: Lazy<String> = Lazy::new(|| format!("scattered-cache-write-through-{}", random::name()));
static WRITE_BEHIND: Lazy<String> = Lazy::new(|| format!("scattered-cache-write-behind-{}", random::name()));

pub fn write_behaviour_test() -> TestClass {
    TestClass::new("WriteBehaviourTest")
        .tagged("infinispan")
        .before_all(|ops| before_all(ops).boxed())
        .after_all(|ops| after_all(ops).boxed())
        .case(TestCase::new("switch_to_write_behind", |ctx| switch_to_write_behind(ctx).boxed()))
        .case(TestCase::new("switch_to_write_through", |ctx| switch_to_write_through(ctx).boxed()))
        .case(TestCase::new("edit_modification_queue_size", |ctx| {
            edit_modification_queue_size(ctx).boxed()
        }))
        .case(TestCase::new("edit_thread_pool_size", |ctx| edit_thread_pool_size(ctx).boxed()))
}

async fn before_all(operations: Operations) -> TestsuiteResult<()> {
    operations.add(&cache_container_address(&CONTAINER)).await?;
    operations
        .add(&cache_container_address(&CONTAINER).and(TRANSPORT, JGROUPS))
        .await?;
    for cache in [&*WRITE_BEHIND, &*WRITE_BEHIND_EDIT, &*WRITE_THROUGH] {
        operations.add(&scattered_cache_address(&CONTAINER, cache)).await?;
    }

    let restart = operations.headers(Values::of(ALLOW_RESOURCE_SERVICE_RESTART, true));
    for cache in [&*WRITE_BEHIND, &*WRITE_THROUGH, &*WRITE_BEHIND_EDIT] {
        restart.add(&file_store_address(&CONTAINER, cache)).await?;
    }
    for cache in [&*WRITE_BEHIND, &*WRITE_BEHIND_EDIT] {
        operations
            .add(&file_store_address(&CONTAINER, cache).and(WRITE, BEHIND))
            .await?;
    }
    Ok(())
}

async fn after_all(operations: Operations) -> TestsuiteResult<()> {
    operations
        .remove_if_exists(&cache_container_address(&CONTAINER))
        .await?;
    Ok(())
}

async fn open(ctx: &TestContext, cache: &str) -> TestsuiteResult<ScatteredCachePage> {
    let page = ScatteredCachePage::open(&ctx.console, &CONTAINER, cache).await?;
    ctx.console
        .vertical_navigation()
        .await?
        .select_primary(NAVIGATION_ITEM)
        .await?;
    Ok(page)
}

async fn switch_to_write_behind(ctx: TestContext) -> TestsuiteResult<()> {
    let page = open(&ctx, &WRITE_THROUGH).await?;
    page.file_store_tab()
        .await?
        .select(FILE_STORE_WRITE_BEHAVIOUR_TAB)
        .await?;
    page.switch_behaviour().await?;
    ctx.crud
        .verifier(&file_store_address(&CONTAINER, &WRITE_THROUGH).and(WRITE, BEHIND))
        .verify_exists()
        .await
}

async fn switch_to_write_through(ctx: TestContext) -> TestsuiteResult<()> {
    let page = open(&ctx, &WRITE_BEHIND).await?;
    page.file_store_tab()
        .await?
        .select(FILE_STORE_WRITE_BEHAVIOUR_TAB)
        .await?;
    page.switch_behaviour().await?;
    ctx.crud
        .verifier(&file_store_address(&CONTAINER, &WRITE_BEHIND).and(WRITE, THROUGH))
        .verify_exists()
        .await
}

async fn edit_modification_queue_size(ctx: TestContext) -> TestsuiteResult<()> {
    edit_write_behind(ctx, MODIFICATION_QUEUE_SIZE).await
}

async fn edit_thread_pool_size(ctx: TestContext) -> TestsuiteResult<()> {
    edit_write_behind(ctx, THREAD_POOL_SIZE).await
}

async fn edit_write_behind(ctx: TestContext, attribute: &str) -> TestsuiteResult<()> {
    let page = open(&ctx, &WRITE_BEHIND_EDIT).await?;
    page.file_store_tab()
        .await?
        .select(FILE_STORE_WRITE_BEHAVIOUR_TAB)
        .await?;
    let form = page.file_store_write_behind_form().await?;
    ctx.crud
        .update(
            &file_store_address(&CONTAINER, &WRITE_BEHIND_EDIT).and(WRITE, BEHIND),
            &form,
            attribute,
            random::number(),
        )
        .await
}

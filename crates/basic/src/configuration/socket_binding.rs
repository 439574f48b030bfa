//! Socket binding groups managed through the finder

use futures::FutureExt;
use hal_testsuite::fragment::{ColumnFragment, FinderFragment, FormFragment};
use hal_testsuite::{ensure_eq, Operations, TestCase, TestClass, TestContext, TestsuiteError, TestsuiteResult, Value, Values};
use thirtyfour::prelude::By;

use crate::fixtures::socket_binding::*;
use crate::fixtures::NAME;

const FORM: &str = "socket-binding-group-configuration-form";

pub fn socket_binding_group_test() -> TestClass {
    TestClass::new("SocketBindingGroupTest")
        .tagged("socket-binding")
        .tagged("domain")
        .before_all(|ops| before_all(ops).boxed())
        .after_all(|ops| after_all(ops).boxed())
        .case(TestCase::new("create", |ctx| create(ctx).boxed()))
        .case(TestCase::new("read", |ctx| read(ctx).boxed()))
        .case(TestCase::new("update", |ctx| update(ctx).boxed()))
        .case(TestCase::new("delete", |ctx| delete(ctx).boxed()))
}

async fn before_all(operations: Operations) -> TestsuiteResult<()> {
    for name in [&*READ, &*UPDATE, &*DELETE] {
        operations
            .add_with(
                &socket_binding_group_address(name),
                Values::of(DEFAULT_INTERFACE, PUBLIC),
            )
            .await?;
    }
    Ok(())
}

async fn after_all(operations: Operations) -> TestsuiteResult<()> {
    for name in [&*CREATE, &*READ, &*UPDATE, &*DELETE] {
        operations
            .remove_if_exists(&socket_binding_group_address(name))
            .await?;
    }
    Ok(())
}

async fn open(ctx: &TestContext) -> TestsuiteResult<(FinderFragment, ColumnFragment)> {
    let finder = ctx.console.finder(&socket_bindings_place()).await?;
    finder.assert_place(&ctx.console).await?;
    let column = finder.column(SOCKET_BINDING_GROUP).await?;
    Ok((finder, column))
}

async fn create(ctx: TestContext) -> TestsuiteResult<()> {
    let (_, column) = open(&ctx).await?;
    column.add().await?;

    let dialog = ctx.console.add_resource_dialog().await?;
    dialog
        .form()
        .await?
        .fill(&[
            (NAME, Value::from(&*CREATE)),
            (DEFAULT_INTERFACE, Value::from(PUBLIC)),
        ])
        .await?;
    dialog.add().await?;
    ctx.console.success().await?;

    column.wait_for_item(&item_id(&CREATE)?).await?;
    ctx.crud
        .verifier(&socket_binding_group_address(&CREATE))
        .verify_exists()
        .await
}

async fn read(ctx: TestContext) -> TestsuiteResult<()> {
    let (finder, column) = open(&ctx).await?;
    column.select_item(&item_id(&READ)?).await?;

    let preview = finder.preview().await?;
    if preview.contains(READ.as_str()) {
        Ok(())
    } else {
        Err(TestsuiteError::assertion(format!(
            "preview does not mention {}: {:?}",
            *READ, preview
        )))
    }
}

async fn update(ctx: TestContext) -> TestsuiteResult<()> {
    let (_, column) = open(&ctx).await?;
    column.item_action(&item_id(&UPDATE)?, "view").await?;
    ctx.console.wait_until_loaded().await?;

    let form: FormFragment = ctx.console.fragment(By::Id(FORM)).await?;
    ctx.crud
        .update(&socket_binding_group_address(&UPDATE), &form, DEFAULT_INTERFACE, PRIVATE)
        .await?;
    ensure_eq(DEFAULT_INTERFACE, PRIVATE, form.value(DEFAULT_INTERFACE).await?.as_str())
}

async fn delete(ctx: TestContext) -> TestsuiteResult<()> {
    let (_, column) = open(&ctx).await?;
    let item = item_id(&DELETE)?;
    column.item_action(&item, "remove").await?;
    ctx.console.confirmation_dialog().await?.confirm().await?;
    ctx.console.success().await?;

    column.wait_until_removed(&item).await?;
    ctx.crud
        .verifier(&socket_binding_group_address(&DELETE))
        .verify_does_not_exist()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_runs_in_domain_mode_only() {
        let class = socket_binding_group_test();
        assert!(class.tags.contains(&"domain"));
        assert_eq!(class.cases.len(), 4);
    }
}

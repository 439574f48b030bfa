//! Common create, update, reset and delete flows
//!
//! Every flow drives the console, waits for the notification and then checks
//! the management model with a [`ResourceVerifier`]. Form input is given as a
//! list of `(attribute, value)` fields which are applied in order.

use std::time::Duration;

use tracing::{debug, info};

use crate::address::Address;
use crate::console::Console;
use crate::error::TestsuiteResult;
use crate::fragment::{FormFragment, Fragment, TableFragment};
use crate::management::{Operations, ResourceVerifier, Value};

/// Attribute used for resource names in add dialogs
pub const NAME: &str = "name";

/// Form fields as `(attribute, value)` pairs
pub type Fields<'a> = &'a [(&'a str, Value)];

#[derive(Clone)]
pub struct CrudOperations {
    console: Console,
    operations: Operations,
    verifier_timeout: Duration,
}

impl CrudOperations {
    pub fn new(console: Console, operations: Operations) -> Self {
        let verifier_timeout = console.timeouts().verifier;
        Self {
            console,
            operations,
            verifier_timeout,
        }
    }

    pub fn with_verifier_timeout(mut self, timeout: Duration) -> Self {
        self.verifier_timeout = timeout;
        self
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn operations(&self) -> &Operations {
        &self.operations
    }

    pub fn verifier(&self, address: &Address) -> ResourceVerifier {
        ResourceVerifier::new(address.clone(), self.operations.clone(), self.verifier_timeout)
    }

    // ------------------------------------------------------ create

    /// Adds a resource which only needs a name
    pub async fn create(&self, address: &Address, table: &TableFragment, name: &str) -> TestsuiteResult<()> {
        self.create_with(address, table, &[(NAME, Value::from(name))]).await
    }

    /// Adds a resource using the add dialog of `table` and verifies it exists
    pub async fn create_with(&self, address: &Address, table: &TableFragment, fields: Fields<'_>) -> TestsuiteResult<()> {
        self.add_in_dialog(table, fields).await?;
        self.verifier(address).verify_exists().await
    }

    /// Like [`create_with`](Self::create_with), but runs `verify` against the
    /// verifier instead of checking for existence only
    pub async fn create_with_verify<F, Fut>(
        &self,
        address: &Address,
        table: &TableFragment,
        fields: Fields<'_>,
        verify: F,
    ) -> TestsuiteResult<()>
    where
        F: FnOnce(ResourceVerifier) -> Fut,
        Fut: std::future::Future<Output = TestsuiteResult<()>>,
    {
        self.add_in_dialog(table, fields).await?;
        verify(self.verifier(address)).await
    }

    /// Submits the add dialog with only a name and expects a validation error
    /// on `error_attribute`
    pub async fn create_with_error(&self, table: &TableFragment, name: &str, error_attribute: &str) -> TestsuiteResult<()> {
        self.create_with_error_fields(table, &[(NAME, Value::from(name))], error_attribute)
            .await
    }

    /// Submits the add dialog and expects a validation error on
    /// `error_attribute`. The dialog stays open.
    pub async fn create_with_error_fields(
        &self,
        table: &TableFragment,
        fields: Fields<'_>,
        error_attribute: &str,
    ) -> TestsuiteResult<()> {
        table.add().await?;
        let dialog = self.console.add_resource_dialog().await?;
        let form = dialog.form().await?;
        form.fill(fields).await?;
        dialog.dialog().primary_button().await?.click().await?;
        form.expect_error(error_attribute).await
    }

    /// Adds a singleton resource from the empty state of its form
    pub async fn create_singleton(&self, address: &Address, form: &FormFragment, fields: Fields<'_>) -> TestsuiteResult<()> {
        info!("create singleton {}", address);
        form.empty_state_add().await?;
        if !fields.is_empty() {
            let dialog = self.console.add_resource_dialog().await?;
            dialog.form().await?.fill(fields).await?;
            dialog.add().await?;
        }
        self.console.success().await?;
        self.verifier(address).verify_exists().await
    }

    /// Fills and submits the add dialog. When a name is among the fields,
    /// waits until the new row shows up.
    async fn add_in_dialog(&self, table: &TableFragment, fields: Fields<'_>) -> TestsuiteResult<()> {
        table.add().await?;
        let dialog = self.console.add_resource_dialog().await?;
        dialog.form().await?.fill(fields).await?;
        dialog.add().await?;
        self.console.success().await?;

        if let Some(name) = row_name(fields) {
            debug!("wait for row '{}'", name);
            table.wait_for_row(name).await?;
        }
        Ok(())
    }

    // ------------------------------------------------------ update

    /// Changes one attribute and verifies the new value
    pub async fn update(
        &self,
        address: &Address,
        form: &FormFragment,
        attribute: &str,
        value: impl Into<Value>,
    ) -> TestsuiteResult<()> {
        let value = value.into();
        info!("update {}:{}", address, attribute);
        self.save_form(form, &[(attribute, value.clone())]).await?;
        verify_updated(&self.verifier(address), attribute, value).await
    }

    /// Changes several fields and runs `verify`
    pub async fn update_with<F, Fut>(
        &self,
        address: &Address,
        form: &FormFragment,
        fields: Fields<'_>,
        verify: F,
    ) -> TestsuiteResult<()>
    where
        F: FnOnce(ResourceVerifier) -> Fut,
        Fut: std::future::Future<Output = TestsuiteResult<()>>,
    {
        info!("update {}", address);
        self.save_form(form, fields).await?;
        verify(self.verifier(address)).await
    }

    /// Sets one field and expects the form to reject it
    pub async fn update_with_error(
        &self,
        form: &FormFragment,
        attribute: &str,
        value: impl Into<Value>,
    ) -> TestsuiteResult<()> {
        self.update_with_error_fields(form, &[(attribute, value.into())], attribute)
            .await
    }

    /// Sets the fields and expects a validation error on `error_attribute`.
    /// The form stays in editing state.
    pub async fn update_with_error_fields(
        &self,
        form: &FormFragment,
        fields: Fields<'_>,
        error_attribute: &str,
    ) -> TestsuiteResult<()> {
        form.edit().await?;
        form.fill(fields).await?;
        form.try_save().await?;
        form.expect_error(error_attribute).await
    }

    async fn save_form(&self, form: &FormFragment, fields: Fields<'_>) -> TestsuiteResult<()> {
        form.edit().await?;
        form.fill(fields).await?;
        form.save().await?;
        self.console.success().await
    }

    // ------------------------------------------------------ reset & delete

    /// Resets the form and verifies all attributes are back to defaults
    pub async fn reset(&self, address: &Address, form: &FormFragment) -> TestsuiteResult<()> {
        info!("reset {}", address);
        form.reset().await?;
        self.console.confirmation_dialog().await?.confirm().await?;
        self.console.success().await?;
        self.verifier(address).verify_reset().await
    }

    /// Removes the row `name` and verifies the resource is gone
    pub async fn delete(&self, address: &Address, table: &TableFragment, name: &str) -> TestsuiteResult<()> {
        info!("delete {}", address);
        table.remove(name).await?;
        self.console.confirmation_dialog().await?.confirm().await?;
        self.console.success().await?;
        self.verifier(address).verify_does_not_exist().await?;
        debug!("wait until row '{}' is gone", name);
        table.wait_until_removed(name).await
    }

    /// Removes a singleton resource through its form
    pub async fn remove_singleton(&self, address: &Address, form: &FormFragment) -> TestsuiteResult<()> {
        info!("remove singleton {}", address);
        form.remove().await?;
        self.console.confirmation_dialog().await?.confirm().await?;
        self.console.success().await?;
        self.verifier(address).verify_does_not_exist().await?;
        let empty_state = form.empty_state().await?;
        form.root().gui().element_visible(&empty_state).await
    }
}

/// Name of the row an add dialog creates, if the fields carry a text name
fn row_name<'a>(fields: Fields<'a>) -> Option<&'a str> {
    fields.iter().find_map(|(attribute, value)| match value {
        Value::Text(name) if *attribute == NAME => Some(name.as_str()),
        _ => None,
    })
}

/// An undefined value must be gone from the model, anything else must match
async fn verify_updated(verifier: &ResourceVerifier, attribute: &str, value: Value) -> TestsuiteResult<()> {
    match value {
        Value::Undefined => verifier.verify_attribute_is_undefined(attribute).await,
        value => verifier.verify_attribute(attribute, value).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TestsuiteError;
    use crate::management::operations::tests::InMemoryClient;
    use crate::management::client::READ_ATTRIBUTE;
    use serde_json::json;
    use std::sync::Arc;

    fn pool() -> Address {
        Address::subsystem("batch-jberet").and("thread-pool", "tp")
    }

    fn verifier(client: Arc<InMemoryClient>) -> ResourceVerifier {
        ResourceVerifier::new(pool(), Operations::new(client), Duration::from_millis(250))
    }

    #[test]
    fn test_row_name() {
        assert_eq!(row_name(&[(NAME, Value::from("tp")), ("max-threads", Value::from(3))]), Some("tp"));
        assert_eq!(row_name(&[("max-threads", Value::from(3)), (NAME, Value::from("tp"))]), Some("tp"));
    }

    #[test]
    fn test_row_name_requires_text_name() {
        assert_eq!(row_name(&[]), None);
        assert_eq!(row_name(&[("path", Value::from("tp"))]), None);
        assert_eq!(row_name(&[(NAME, Value::Undefined)]), None);
        assert_eq!(row_name(&[(NAME, Value::from(vec!["a", "b"]))]), None);
    }

    #[tokio::test]
    async fn test_verify_updated_value() {
        let client = Arc::new(InMemoryClient::default().with_resource(&pool(), &[("max-threads", json!(11))]));
        verify_updated(&verifier(client.clone()), "max-threads", Value::from(11))
            .await
            .unwrap();

        let executed = client.executed.lock().unwrap();
        assert!(executed.iter().any(|op| op.name == READ_ATTRIBUTE));
    }

    #[tokio::test]
    async fn test_verify_updated_undefined() {
        let client = Arc::new(InMemoryClient::default().with_resource(&pool(), &[]));
        verify_updated(&verifier(client), "keepalive-time", Value::Undefined)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_verify_updated_undefined_fails_while_defined() {
        let client = Arc::new(InMemoryClient::default().with_resource(&pool(), &[("keepalive-time", json!(100))]));
        let err = verify_updated(&verifier(client), "keepalive-time", Value::Undefined)
            .await
            .unwrap_err();
        assert!(matches!(err, TestsuiteError::AssertionFailed(_)));
    }
}

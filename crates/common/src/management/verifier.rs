//! Out-of-band verification of the management model
//!
//! Changes made in the console reach the model asynchronously, so every check
//! polls until it holds or the verifier timeout elapses.

use std::time::Duration;

use serde_json::Value as Json;
use tracing::debug;

use crate::address::Address;
use crate::error::{TestsuiteError, TestsuiteResult};
use crate::management::client::Operation;
use crate::management::operations::Operations;
use crate::management::values::Value;
use crate::wait::Wait;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub struct ResourceVerifier {
    address: Address,
    operations: Operations,
    wait: Wait,
}

impl ResourceVerifier {
    pub fn new(address: Address, operations: Operations, timeout: Duration) -> Self {
        Self {
            address,
            operations,
            wait: Wait::new(timeout, POLL_INTERVAL),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub async fn verify_exists(&self) -> TestsuiteResult<()> {
        debug!("verify {} exists", self.address);
        self.check(&format!("{} to exist", self.address), || async move {
            self.operations.exists(&self.address).await
        })
        .await
    }

    pub async fn verify_does_not_exist(&self) -> TestsuiteResult<()> {
        debug!("verify {} does not exist", self.address);
        self.check(&format!("{} not to exist", self.address), || async move {
            Ok::<_, TestsuiteError>(!self.operations.exists(&self.address).await?)
        })
        .await
    }

    pub async fn verify_attribute(&self, name: &str, expected: impl Into<Value>) -> TestsuiteResult<()> {
        let expected = expected.into();
        debug!("verify {}:{} == {:?}", self.address, name, expected);
        let expected = &expected;
        self.check(
            &format!("{}:{} to equal {:?}", self.address, name, expected),
            || async move {
                let actual = self.operations.read_attribute(&self.address, name).await?;
                Ok::<_, TestsuiteError>(expected.matches(&actual))
            },
        )
        .await
    }

    pub async fn verify_attribute_is_undefined(&self, name: &str) -> TestsuiteResult<()> {
        self.verify_attribute(name, Value::Undefined).await
    }

    /// Every writable, optional attribute equals its default, or is undefined
    /// when it has none.
    pub async fn verify_reset(&self) -> TestsuiteResult<()> {
        let description = self
            .operations
            .read_resource_description(&self.address)
            .await?;
        let resettable = resettable_attributes(&description);
        debug!("verify reset of {} ({} attributes)", self.address, resettable.len());

        let resettable = &resettable;
        self.check(&format!("{} to be reset", self.address), || async move {
            let values = self
                .operations
                .execute(Operation::read_resource(self.address.clone()))
                .await?;
            Ok::<_, TestsuiteError>(differences(resettable, &values).is_empty())
        })
        .await
    }

    async fn check<F, Fut>(&self, description: &str, condition: F) -> TestsuiteResult<()>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = TestsuiteResult<bool>>,
    {
        self.wait
            .until(description, condition)
            .await
            .map_err(|e| match e {
                TestsuiteError::Timeout(msg) => TestsuiteError::AssertionFailed(format!("expected {}", msg)),
                other => other,
            })
    }
}

/// `(name, default)` of the read-write, optional, non-deprecated attributes
fn resettable_attributes(description: &Json) -> Vec<(String, Json)> {
    let Some(attributes) = description.get("attributes").and_then(Json::as_object) else {
        return Vec::new();
    };

    attributes
        .iter()
        .filter(|(_, attr)| attr.get("access-type").and_then(Json::as_str) == Some("read-write"))
        .filter(|(_, attr)| attr.get("storage").and_then(Json::as_str) != Some("runtime"))
        .filter(|(_, attr)| !attr.get("required").and_then(Json::as_bool).unwrap_or(false))
        .filter(|(_, attr)| attr.get("deprecated").is_none())
        .map(|(name, attr)| (name.clone(), attr.get("default").cloned().unwrap_or(Json::Null)))
        .collect()
}

/// Names of attributes whose value differs from the expected default.
/// The model may return typed defaults as strings.
fn differences(resettable: &[(String, Json)], values: &Json) -> Vec<String> {
    resettable
        .iter()
        .filter(|(name, default)| {
            let actual = values.get(name).unwrap_or(&Json::Null);
            !Value::from_json(default).matches(actual)
        })
        .map(|(name, _)| name.clone())
        .collect()
}

//! High-level management operations used by fixtures and verifiers

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value as Json;
use tracing::{debug, info, warn};

use crate::address::Address;
use crate::error::{TestsuiteError, TestsuiteResult};
use crate::management::client::{ManagementClient, Operation};
use crate::management::values::{Value, Values};
use crate::wait::Wait;

/// Failure code for a missing resource
const RESOURCE_NOT_FOUND: &str = "WFLYCTL0216";

/// Management operations over a shared client
#[derive(Clone)]
pub struct Operations {
    client: Arc<dyn ManagementClient>,
    headers: Values,
}

impl Operations {
    pub fn new(client: Arc<dyn ManagementClient>) -> Self {
        Self {
            client,
            headers: Values::empty(),
        }
    }

    /// A copy that sends `headers` with every operation, e.g.
    /// `allow-resource-service-restart`
    pub fn headers(&self, headers: Values) -> Self {
        Self {
            client: Arc::clone(&self.client),
            headers,
        }
    }

    /// Executes an operation and returns its result
    pub async fn execute(&self, operation: Operation) -> TestsuiteResult<Json> {
        let operation = if self.headers.is_empty() {
            operation
        } else {
            operation.with_headers(self.headers.clone())
        };
        let result = self.client.execute(&operation).await?;
        result.into_result(&operation)
    }

    pub async fn add(&self, address: &Address) -> TestsuiteResult<()> {
        self.add_with(address, Values::empty()).await
    }

    pub async fn add_with(&self, address: &Address, values: Values) -> TestsuiteResult<()> {
        debug!("add {}", address);
        self.execute(Operation::add(address.clone(), values)).await?;
        Ok(())
    }

    pub async fn remove(&self, address: &Address) -> TestsuiteResult<()> {
        debug!("remove {}", address);
        self.execute(Operation::remove(address.clone())).await?;
        Ok(())
    }

    /// Removes the resource if it exists. Returns whether it was removed.
    pub async fn remove_if_exists(&self, address: &Address) -> TestsuiteResult<bool> {
        if self.exists(address).await? {
            self.remove(address).await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub async fn exists(&self, address: &Address) -> TestsuiteResult<bool> {
        if address.is_root() {
            return Ok(true);
        }
        let operation = Operation::read_resource(address.clone());
        let result = self.client.execute(&operation).await?;
        if result.is_success() {
            Ok(true)
        } else if is_not_found(&result.failure()) {
            Ok(false)
        } else {
            result.into_result(&operation).map(|_| false)
        }
    }

    pub async fn read_attribute(&self, address: &Address, name: &str) -> TestsuiteResult<Json> {
        self.execute(Operation::read_attribute(address.clone(), name)).await
    }

    pub async fn write_attribute(
        &self,
        address: &Address,
        name: &str,
        value: impl Into<Value>,
    ) -> TestsuiteResult<()> {
        self.execute(Operation::write_attribute(address.clone(), name, value))
            .await?;
        Ok(())
    }

    pub async fn undefine_attribute(&self, address: &Address, name: &str) -> TestsuiteResult<()> {
        self.execute(Operation::undefine_attribute(address.clone(), name))
            .await?;
        Ok(())
    }

    pub async fn read_resource_description(&self, address: &Address) -> TestsuiteResult<Json> {
        self.execute(Operation::read_resource_description(address.clone()))
            .await
    }

    /// Reloads the server when its state is `reload-required` and waits until
    /// it is `running` again. Returns whether a reload happened.
    pub async fn reload_if_required(&self, timeout: Duration) -> TestsuiteResult<bool> {
        let state = self.server_state().await?;
        if state != "reload-required" {
            return Ok(false);
        }

        info!("Server requires reload, reloading");
        self.execute(Operation::reload()).await?;

        Wait::new(timeout, Duration::from_millis(500))
            .until("server to be running after reload", || async move {
                Ok::<_, TestsuiteError>(self.server_state().await? == "running")
            })
            .await
            .map_err(|e| {
                warn!("Reload did not finish: {}", e);
                e
            })?;
        Ok(true)
    }

    async fn server_state(&self) -> TestsuiteResult<String> {
        let state = self.read_attribute(&Address::root(), "server-state").await?;
        Ok(state.as_str().unwrap_or_default().to_string())
    }
}

fn is_not_found(failure: &str) -> bool {
    failure.contains(RESOURCE_NOT_FOUND) || failure.contains("not found")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::management::client::{ModelResult, ADD, READ_ATTRIBUTE, READ_RESOURCE, RELOAD, REMOVE, WRITE_ATTRIBUTE};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory management model keyed by address string
    #[derive(Default)]
    pub(crate) struct InMemoryClient {
        pub resources: Mutex<HashMap<String, HashMap<String, Json>>>,
        pub executed: Mutex<Vec<Operation>>,
        pub server_states: Mutex<Vec<String>>,
    }

    impl InMemoryClient {
        pub fn with_resource(self, address: &Address, attributes: &[(&str, Json)]) -> Self {
            self.resources.lock().unwrap().insert(
                address.to_string(),
                attributes.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            );
            self
        }

        pub fn set_attribute(&self, address: &Address, name: &str, value: Json) {
            if let Some(resource) = self.resources.lock().unwrap().get_mut(&address.to_string()) {
                resource.insert(name.to_string(), value);
            }
        }
    }

    fn not_found(address: &Address) -> ModelResult {
        ModelResult::failed(format!("WFLYCTL0216: Management resource '{}' not found", address))
    }

    #[async_trait]
    impl ManagementClient for InMemoryClient {
        async fn execute(&self, operation: &Operation) -> TestsuiteResult<ModelResult> {
            self.executed.lock().unwrap().push(operation.clone());
            let key = operation.address.to_string();
            let mut resources = self.resources.lock().unwrap();

            let result = match operation.name.as_str() {
                ADD => {
                    if resources.contains_key(&key) {
                        ModelResult::failed("WFLYCTL0212: Duplicate resource")
                    } else {
                        let attributes = operation
                            .params
                            .iter()
                            .map(|(k, v)| (k.to_string(), v.to_json()))
                            .collect();
                        resources.insert(key, attributes);
                        ModelResult::success(Json::Null)
                    }
                }
                REMOVE => match resources.remove(&key) {
                    Some(_) => ModelResult::success(Json::Null),
                    None => not_found(&operation.address),
                },
                READ_RESOURCE => match resources.get(&key) {
                    Some(attributes) => ModelResult::success(json!(attributes)),
                    None => not_found(&operation.address),
                },
                READ_ATTRIBUTE if operation.address.is_root() => {
                    let mut states = self.server_states.lock().unwrap();
                    let state = if states.len() > 1 {
                        states.remove(0)
                    } else {
                        states.first().cloned().unwrap_or_else(|| "running".to_string())
                    };
                    ModelResult::success(json!(state))
                }
                READ_ATTRIBUTE => {
                    let name = operation.params.get("name").map(|v| v.display_text()).unwrap_or_default();
                    match resources.get(&key) {
                        Some(attributes) => {
                            ModelResult::success(attributes.get(&name).cloned().unwrap_or(Json::Null))
                        }
                        None => not_found(&operation.address),
                    }
                }
                WRITE_ATTRIBUTE => {
                    let name = operation.params.get("name").map(|v| v.display_text()).unwrap_or_default();
                    let value = operation.params.get("value").map(|v| v.to_json()).unwrap_or(Json::Null);
                    match resources.get_mut(&key) {
                        Some(attributes) => {
                            attributes.insert(name, value);
                            ModelResult::success(Json::Null)
                        }
                        None => not_found(&operation.address),
                    }
                }
                RELOAD => ModelResult::success(Json::Null),
                other => ModelResult::failed(format!("unsupported operation {}", other)),
            };
            Ok(result)
        }
    }

    fn pool(name: &str) -> Address {
        Address::subsystem("batch-jberet").and("thread-pool", name)
    }

    #[tokio::test]
    async fn test_add_and_exists() {
        let ops = Operations::new(Arc::new(InMemoryClient::default()));
        assert!(!ops.exists(&pool("a")).await.unwrap());
        ops.add_with(&pool("a"), Values::of("max-threads", 10)).await.unwrap();
        assert!(ops.exists(&pool("a")).await.unwrap());
        assert_eq!(ops.read_attribute(&pool("a"), "max-threads").await.unwrap(), json!(10));
    }

    #[tokio::test]
    async fn test_add_failure_is_management_error() {
        let client = InMemoryClient::default().with_resource(&pool("dup"), &[]);
        let ops = Operations::new(Arc::new(client));
        let err = ops.add(&pool("dup")).await.unwrap_err();
        assert!(matches!(err, TestsuiteError::Management { .. }));
    }

    #[tokio::test]
    async fn test_remove_if_exists() {
        let client = InMemoryClient::default().with_resource(&pool("gone"), &[]);
        let ops = Operations::new(Arc::new(client));
        assert!(ops.remove_if_exists(&pool("gone")).await.unwrap());
        assert!(!ops.remove_if_exists(&pool("gone")).await.unwrap());
    }

    #[tokio::test]
    async fn test_headers_are_sent() {
        let client = Arc::new(InMemoryClient::default());
        let ops = Operations::new(client.clone());
        ops.headers(Values::of("allow-resource-service-restart", true))
            .add(&pool("x"))
            .await
            .unwrap();
        ops.write_attribute(&pool("x"), "max-threads", 3).await.unwrap();

        let executed = client.executed.lock().unwrap();
        assert_eq!(executed[0].headers, Values::of("allow-resource-service-restart", true));
        assert!(executed[1].headers.is_empty());
    }

    #[tokio::test]
    async fn test_reload_if_required() {
        let client = Arc::new(InMemoryClient::default());
        *client.server_states.lock().unwrap() = vec![
            "reload-required".to_string(),
            "starting".to_string(),
            "running".to_string(),
        ];
        let ops = Operations::new(client.clone());
        assert!(ops.reload_if_required(Duration::from_secs(5)).await.unwrap());
        assert!(client.executed.lock().unwrap().iter().any(|op| op.name == RELOAD));

        assert!(!ops.reload_if_required(Duration::from_secs(5)).await.unwrap());
    }

    #[tokio::test]
    async fn test_root_always_exists() {
        let client = Arc::new(InMemoryClient::default());
        let ops = Operations::new(client.clone());
        assert!(ops.exists(&Address::root()).await.unwrap());
        assert!(client.executed.lock().unwrap().is_empty());
    }
}

//! Management protocol client
//!
//! Operations are sent as JSON to the HTTP management endpoint:
//!
//! ```text
//! POST /management
//! {"operation": "add", "address": [{"subsystem": "batch-jberet"}, {"thread-pool": "tp"}],
//!  "max-threads": 10, "operation-headers": {"allow-resource-service-restart": true}}
//! ```
//!
//! The server answers `200` on success and `500` when the operation failed,
//! both with an `outcome` body.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::address::Address;
use crate::config::ManagementConfig;
use crate::error::{TestsuiteError, TestsuiteResult};
use crate::management::values::{Value, Values};

pub const ADD: &str = "add";
pub const REMOVE: &str = "remove";
pub const READ_RESOURCE: &str = "read-resource";
pub const READ_ATTRIBUTE: &str = "read-attribute";
pub const WRITE_ATTRIBUTE: &str = "write-attribute";
pub const UNDEFINE_ATTRIBUTE: &str = "undefine-attribute";
pub const READ_RESOURCE_DESCRIPTION: &str = "read-resource-description";
pub const RELOAD: &str = "reload";

/// A management operation
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: String,
    pub address: Address,
    pub params: Values,
    pub headers: Values,
}

impl Operation {
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            address,
            params: Values::empty(),
            headers: Values::empty(),
        }
    }

    pub fn add(address: Address, values: Values) -> Self {
        Self::new(ADD, address).with_params(values)
    }

    pub fn remove(address: Address) -> Self {
        Self::new(REMOVE, address)
    }

    pub fn read_resource(address: Address) -> Self {
        Self::new(READ_RESOURCE, address)
    }

    pub fn read_attribute(address: Address, name: &str) -> Self {
        Self::new(READ_ATTRIBUTE, address).param("name", name)
    }

    pub fn write_attribute(address: Address, name: &str, value: impl Into<Value>) -> Self {
        Self::new(WRITE_ATTRIBUTE, address)
            .param("name", name)
            .param("value", value)
    }

    pub fn undefine_attribute(address: Address, name: &str) -> Self {
        Self::new(UNDEFINE_ATTRIBUTE, address).param("name", name)
    }

    pub fn read_resource_description(address: Address) -> Self {
        Self::new(READ_RESOURCE_DESCRIPTION, address)
    }

    pub fn reload() -> Self {
        Self::new(RELOAD, Address::root())
    }

    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params = self.params.and(name, value);
        self
    }

    pub fn with_params(mut self, params: Values) -> Self {
        self.params = params;
        self
    }

    pub fn with_headers(mut self, headers: Values) -> Self {
        self.headers = headers;
        self
    }

    /// The JSON request body
    pub fn to_json(&self) -> Json {
        let mut body = Map::new();
        body.insert("operation".to_string(), Json::String(self.name.clone()));
        body.insert("address".to_string(), serde_json::json!(self.address));
        for (name, value) in self.params.iter() {
            body.insert(name.to_string(), value.to_json());
        }
        if !self.headers.is_empty() {
            let headers: Map<String, Json> = self
                .headers
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_json()))
                .collect();
            body.insert("operation-headers".to_string(), Json::Object(headers));
        }
        Json::Object(body)
    }
}

/// Response body of a management operation
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelResult {
    pub outcome: String,

    #[serde(default)]
    pub result: Json,

    #[serde(default, rename = "failure-description")]
    pub failure_description: Option<Json>,
}

impl ModelResult {
    pub fn success(result: Json) -> Self {
        Self {
            outcome: "success".to_string(),
            result,
            failure_description: None,
        }
    }

    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            outcome: "failed".to_string(),
            result: Json::Null,
            failure_description: Some(Json::String(description.into())),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == "success"
    }

    pub fn failure(&self) -> String {
        match &self.failure_description {
            Some(Json::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => format!("outcome '{}'", self.outcome),
        }
    }

    /// The result, or a `Management` error describing the failure
    pub fn into_result(self, operation: &Operation) -> TestsuiteResult<Json> {
        if self.is_success() {
            Ok(self.result)
        } else {
            Err(TestsuiteError::Management {
                operation: operation.name.clone(),
                address: operation.address.to_string(),
                reason: self.failure(),
            })
        }
    }
}

/// Executes management operations
#[async_trait]
pub trait ManagementClient: Send + Sync {
    async fn execute(&self, operation: &Operation) -> TestsuiteResult<ModelResult>;
}

/// Client for the HTTP management interface
pub struct HttpManagementClient {
    client: reqwest::Client,
    endpoint: String,
    username: Option<String>,
    password: Option<String>,
}

impl HttpManagementClient {
    pub fn new(config: &ManagementConfig) -> TestsuiteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/management", config.url.trim_end_matches('/')),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }
}

#[async_trait]
impl ManagementClient for HttpManagementClient {
    async fn execute(&self, operation: &Operation) -> TestsuiteResult<ModelResult> {
        debug!("{}:{}", operation.address, operation.name);

        let mut request = self.client.post(&self.endpoint).json(&operation.to_json());
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::INTERNAL_SERVER_ERROR {
            Ok(response.json::<ModelResult>().await?)
        } else {
            Err(TestsuiteError::Management {
                operation: operation.name.clone(),
                address: operation.address.to_string(),
                reason: format!("HTTP {}", status),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    #[test]
    fn test_add_operation_json() {
        let address = Address::subsystem("batch-jberet").and("thread-pool", "tp");
        let op = Operation::add(address, Values::of("max-threads", 10))
            .with_headers(Values::of("allow-resource-service-restart", true));

        assert_eq!(
            op.to_json(),
            json!({
                "operation": "add",
                "address": [{"subsystem": "batch-jberet"}, {"thread-pool": "tp"}],
                "max-threads": 10,
                "operation-headers": {"allow-resource-service-restart": true}
            })
        );
    }

    #[test]
    fn test_write_attribute_json() {
        let op = Operation::write_attribute(Address::subsystem("ee"), "spec-descriptor-property-replacement", false);
        let body = op.to_json();
        assert_eq!(body["name"], "spec-descriptor-property-replacement");
        assert_eq!(body["value"], false);
        assert!(body.get("operation-headers").is_none());
    }

    #[test]
    fn test_parse_failed_result() {
        let body = r#"{"outcome":"failed","failure-description":"WFLYCTL0216: Management resource '[(\"subsystem\" => \"x\")]' not found","rolled-back":true}"#;
        let result: ModelResult = serde_json::from_str(body).unwrap();
        assert!(!result.is_success());
        assert!(result.failure().starts_with("WFLYCTL0216"));

        let op = Operation::read_resource(Address::subsystem("x"));
        match result.into_result(&op).unwrap_err() {
            TestsuiteError::Management { operation, address, .. } => {
                assert_eq!(operation, "read-resource");
                assert_eq!(address, "/subsystem=x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_success_result() {
        let result: ModelResult = serde_json::from_str(r#"{"outcome":"success","result":42}"#).unwrap();
        assert_eq!(result.into_result(&Operation::reload()).unwrap(), json!(42));
    }

    /// Answers a single HTTP request with `status` and `body` and hands back
    /// the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });
        (url, handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).into_owned();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        line.to_ascii_lowercase()
                            .strip_prefix("content-length:")
                            .and_then(|v| v.trim().parse::<usize>().ok())
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn client(url: &str, username: Option<&str>) -> HttpManagementClient {
        HttpManagementClient::new(&ManagementConfig {
            url: url.to_string(),
            username: username.map(String::from),
            password: username.map(|_| "secret".to_string()),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_execute_success() {
        let (url, server) = serve_once("200 OK", r#"{"outcome":"success","result":"running"}"#).await;
        let op = Operation::read_attribute(Address::root(), "server-state");

        let result = client(&url, None).execute(&op).await.unwrap();
        assert!(result.is_success());
        assert_eq!(result.result, json!("running"));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /management "));
        assert!(request.contains(r#""operation":"read-attribute""#));
        assert!(!request.to_ascii_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn test_execute_failed_outcome_on_500() {
        let (url, server) = serve_once(
            "500 Internal Server Error",
            r#"{"outcome":"failed","failure-description":"WFLYCTL0212: Duplicate resource"}"#,
        )
        .await;
        let op = Operation::add(Address::subsystem("batch-jberet").and("thread-pool", "tp"), Values::empty());

        let result = client(&url, None).execute(&op).await.unwrap();
        assert!(!result.is_success());
        assert!(result.failure().starts_with("WFLYCTL0212"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_execute_other_status_is_error() {
        for status in ["401 Unauthorized", "404 Not Found"] {
            let (url, server) = serve_once(status, "").await;
            let op = Operation::read_resource(Address::subsystem("ee"));

            match client(&url, None).execute(&op).await.unwrap_err() {
                TestsuiteError::Management { operation, address, reason } => {
                    assert_eq!(operation, "read-resource");
                    assert_eq!(address, "/subsystem=ee");
                    assert!(reason.contains(&status[..3]), "{reason}");
                }
                other => panic!("unexpected error: {other}"),
            }
            server.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_execute_sends_basic_auth_with_username() {
        let (url, server) = serve_once("200 OK", r#"{"outcome":"success"}"#).await;
        client(&url, Some("admin"))
            .execute(&Operation::reload())
            .await
            .unwrap();

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.contains("authorization: basic ywrtaw46c2vjcmv0"));
    }
}

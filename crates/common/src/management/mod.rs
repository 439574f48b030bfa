//! Management model access for fixtures and verification

pub mod client;
pub mod operations;
pub mod values;
pub mod verifier;

use std::sync::Arc;

use crate::config::ManagementConfig;
use crate::error::TestsuiteResult;

pub use client::{HttpManagementClient, ManagementClient, ModelResult, Operation};
pub use operations::Operations;
pub use values::{Value, Values};
pub use verifier::ResourceVerifier;

/// Operations backed by the HTTP management interface
pub fn connect(config: &ManagementConfig) -> TestsuiteResult<Operations> {
    let client = HttpManagementClient::new(config)?;
    Ok(Operations::new(Arc::new(client)))
}

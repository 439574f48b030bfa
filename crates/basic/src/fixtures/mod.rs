//! Resource names and addresses shared by the test classes

pub mod batch;
pub mod infinispan;
pub mod socket_binding;

/// Attribute holding the resource name in add dialogs and forms
pub const NAME: &str = "name";

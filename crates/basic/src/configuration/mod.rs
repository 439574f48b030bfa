//! Configuration test classes

pub mod batch;
pub mod infinispan;
pub mod socket_binding;

//! Socket binding groups

use hal_testsuite::{ids, random, Address, PlaceRequest, TestsuiteResult};
use once_cell::sync::Lazy;

pub const SOCKET_BINDING_GROUP: &str = "socket-binding-group";
pub const DEFAULT_INTERFACE: &str = "default-interface";
pub const PUBLIC: &str = "public";
pub const PRIVATE: &str = "private";

pub static CREATE: Lazy<String> = Lazy::new(|| group_name("create"));
pub static READ: Lazy<String> = Lazy::new(|| group_name("read"));
pub static UPDATE: Lazy<String> = Lazy::new(|| group_name("update"));
pub static DELETE: Lazy<String> = Lazy::new(|| group_name("delete"));

fn group_name(kind: &str) -> String {
    format!("sbg-{}-{}", kind, random::lowercase(10))
}

pub fn socket_binding_group_address(name: &str) -> Address {
    Address::of(SOCKET_BINDING_GROUP, name)
}

/// Finder place listing the socket binding groups
pub fn socket_bindings_place() -> PlaceRequest {
    PlaceRequest::new("configuration").with("path", "socket-bindings")
}

/// Id of the finder item of a group
pub fn item_id(name: &str) -> TestsuiteResult<String> {
    ids::build(SOCKET_BINDING_GROUP, &[name])
}

//! Infinispan subsystem

use hal_testsuite::Address;

pub const INFINISPAN_SUBSYSTEM: &str = "infinispan";
pub const CACHE_CONTAINER: &str = "cache-container";
pub const SCATTERED_CACHE: &str = "scattered-cache";
pub const STORE: &str = "store";
pub const FILE: &str = "file";
pub const TRANSPORT: &str = "transport";
pub const JGROUPS: &str = "jgroups";

/// Store child holding the write behaviour
pub const WRITE: &str = "write";
pub const BEHIND: &str = "behind";
pub const THROUGH: &str = "through";

pub const MODIFICATION_QUEUE_SIZE: &str = "modification-queue-size";
pub const THREAD_POOL_SIZE: &str = "thread-pool-size";

pub fn cache_container_address(name: &str) -> Address {
    Address::subsystem(INFINISPAN_SUBSYSTEM).and(CACHE_CONTAINER, name)
}

pub fn scattered_cache_address(cache_container: &str, name: &str) -> Address {
    cache_container_address(cache_container).and(SCATTERED_CACHE, name)
}

pub fn file_store_address(cache_container: &str, scattered_cache: &str) -> Address {
    scattered_cache_address(cache_container, scattered_cache).and(STORE, FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_address() {
        assert_eq!(
            file_store_address("cc", "sc").and(WRITE, BEHIND).to_string(),
            "/subsystem=infinispan/cache-container=cc/scattered-cache=sc/store=file/write=behind"
        );
    }
}

//! Batch (JBeret) subsystem

use hal_testsuite::{random, Address};
use once_cell::sync::Lazy;

pub const BATCH_SUBSYSTEM: &str = "batch-jberet";
pub const THREAD_POOL: &str = "thread-pool";
pub const MAX_THREADS: &str = "max-threads";
pub const MAX_THREADS_VALUE: i64 = 11;

pub static THREAD_POOL_CREATE: Lazy<String> = Lazy::new(|| format!("tp-create-{}", random::name()));
pub static THREAD_POOL_READ: Lazy<String> = Lazy::new(|| format!("tp-read-{}", random::name()));
pub static THREAD_POOL_UPDATE: Lazy<String> = Lazy::new(|| format!("tp-update-{}", random::name()));
pub static THREAD_POOL_DELETE: Lazy<String> = Lazy::new(|| format!("tp-delete-{}", random::name()));

pub fn subsystem_address() -> Address {
    Address::subsystem(BATCH_SUBSYSTEM)
}

pub fn thread_pool_address(name: &str) -> Address {
    subsystem_address().and(THREAD_POOL, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_pool_address() {
        assert_eq!(
            thread_pool_address("tp").to_string(),
            "/subsystem=batch-jberet/thread-pool=tp"
        );
    }

    #[test]
    fn test_names_are_distinct() {
        let names = [
            THREAD_POOL_CREATE.as_str(),
            THREAD_POOL_READ.as_str(),
            THREAD_POOL_UPDATE.as_str(),
            THREAD_POOL_DELETE.as_str(),
        ];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

//! Basic configuration tests for the HAL management console
//!
//! Each module under [`configuration`] provides one test class. The classes
//! are run by the `basic` test binary:
//!
//! ```text
//! cargo test -p hal-testsuite-basic --test basic -- --tag batch
//! ```

pub mod configuration;
pub mod fixtures;
pub mod pages;

use hal_testsuite::TestClass;

/// All test classes in run order
pub fn test_classes() -> Vec<TestClass> {
    vec![
        configuration::batch::thread_pool_test(),
        configuration::infinispan::write_behaviour_test(),
        configuration::socket_binding::socket_binding_group_test(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_names_are_unique() {
        let classes = test_classes();
        let mut names: Vec<&str> = classes.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), classes.len());
    }
}

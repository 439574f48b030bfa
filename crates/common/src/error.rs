//! Error types for the test suite

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestsuiteError {
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("WebDriver failed to start: {0}")]
    DriverStartup(String),

    #[error("WebDriver health check failed after {0} attempts")]
    DriverHealthCheck(usize),

    #[error("Management operation '{operation}' on {address} failed: {reason}")]
    Management {
        operation: String,
        address: String,
        reason: String,
    },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Location error: {0}")]
    Location(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl TestsuiteError {
    /// Shorthand for an assertion failure with a formatted message
    pub fn assertion(message: impl Into<String>) -> Self {
        TestsuiteError::AssertionFailed(message.into())
    }
}

pub type TestsuiteResult<T> = Result<T, TestsuiteError>;

/// Fails with an assertion error unless `actual == expected`
pub fn ensure_eq<T>(what: &str, expected: T, actual: T) -> TestsuiteResult<()>
where
    T: PartialEq + std::fmt::Debug,
{
    if actual == expected {
        Ok(())
    } else {
        Err(TestsuiteError::assertion(format!(
            "{}: expected {:?}, but was {:?}",
            what, expected, actual
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_eq() {
        assert!(ensure_eq("name", "a", "a").is_ok());

        let err = ensure_eq("max-threads", 11, 12).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Assertion failed: max-threads: expected 11, but was 12"
        );
    }
}

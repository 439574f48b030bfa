//! Suite configuration
//!
//! Values are resolved in this order, later sources winning:
//! built-in defaults, an optional YAML file, `HAL_*` environment variables,
//! and finally command-line flags applied by the suite entry point.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{TestsuiteError, TestsuiteResult};

/// Top-level configuration for a suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Console URL, e.g. `http://localhost:9990/console/index.html`
    pub console_url: String,

    pub management: ManagementConfig,

    pub webdriver: WebDriverConfig,

    pub timeouts: TimeoutConfig,

    /// Directory for results and failure screenshots
    pub output_dir: PathBuf,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            console_url: "http://localhost:9990/console/index.html".to_string(),
            management: ManagementConfig::default(),
            webdriver: WebDriverConfig::default(),
            timeouts: TimeoutConfig::default(),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// Management endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementConfig {
    /// Base URL of the HTTP management interface (without `/management`)
    pub url: String,

    pub username: Option<String>,

    pub password: Option<String>,

    /// Per-request timeout
    #[serde(with = "millis")]
    pub request_timeout: Duration,
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9990".to_string(),
            username: None,
            password: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserKind {
    #[default]
    Chrome,
    Firefox,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
        }
    }

    pub fn parse(value: &str) -> TestsuiteResult<Self> {
        match value.to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            other => Err(TestsuiteError::Config(format!("unknown browser: {}", other))),
        }
    }
}

/// WebDriver session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDriverConfig {
    /// URL of a running WebDriver server. Ignored when `executable` is set.
    pub url: String,

    /// Driver binary (`chromedriver`, `geckodriver`) to spawn on a free port
    pub executable: Option<PathBuf>,

    pub browser: BrowserKind,

    pub headless: bool,

    pub window_width: u32,

    pub window_height: u32,

    /// How long to wait for a spawned driver to answer `/status`
    #[serde(with = "millis")]
    pub startup_timeout: Duration,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:4444".to_string(),
            executable: None,
            browser: BrowserKind::Chrome,
            headless: true,
            window_width: 1600,
            window_height: 1000,
            startup_timeout: Duration::from_secs(30),
        }
    }
}

/// Wait timeouts for UI and management checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    #[serde(with = "millis")]
    pub gui: Duration,

    #[serde(with = "millis")]
    pub ajax: Duration,

    #[serde(with = "millis")]
    pub model: Duration,

    #[serde(with = "millis")]
    pub page_load: Duration,

    #[serde(with = "millis")]
    pub verifier: Duration,

    #[serde(with = "millis")]
    pub poll_interval: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            gui: Duration::from_secs(1),
            ajax: Duration::from_secs(2),
            model: Duration::from_secs(5),
            page_load: Duration::from_secs(30),
            verifier: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl SuiteConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> TestsuiteResult<Self> {
        serde_yaml::from_str(yaml).map_err(TestsuiteError::from)
    }

    /// Parse configuration from a YAML file
    pub fn from_file(path: &Path) -> TestsuiteResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Defaults, then the file (if any), then the environment
    pub fn load(path: Option<&Path>) -> TestsuiteResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies `HAL_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> TestsuiteResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("HAL_CONSOLE_URL") {
            self.console_url = url;
        }
        if let Some(url) = lookup("HAL_MANAGEMENT_URL") {
            self.management.url = url;
        }
        if let Some(user) = lookup("HAL_MANAGEMENT_USERNAME") {
            self.management.username = Some(user);
        }
        if let Some(password) = lookup("HAL_MANAGEMENT_PASSWORD") {
            self.management.password = Some(password);
        }
        if let Some(url) = lookup("HAL_WEBDRIVER_URL") {
            self.webdriver.url = url;
        }
        if let Some(executable) = lookup("HAL_WEBDRIVER_EXECUTABLE") {
            self.webdriver.executable = Some(PathBuf::from(executable));
        }
        if let Some(browser) = lookup("HAL_BROWSER") {
            self.webdriver.browser = BrowserKind::parse(&browser)?;
        }
        if let Some(headless) = lookup("HAL_HEADLESS") {
            self.webdriver.headless = parse_bool("HAL_HEADLESS", &headless)?;
        }
        if let Some(dir) = lookup("HAL_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> TestsuiteResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(TestsuiteError::Config(format!(
            "{} must be a boolean, got {:?}",
            key, value
        ))),
    }
}

/// Durations as integer milliseconds in YAML
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::default();
        assert_eq!(config.timeouts.page_load, Duration::from_secs(30));
        assert_eq!(config.webdriver.browser, BrowserKind::Chrome);
        assert!(config.webdriver.headless);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
console_url: http://hal.example:9990/console/index.html
webdriver:
  browser: firefox
  headless: false
timeouts:
  model: 10000
"#;
        let config = SuiteConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.console_url, "http://hal.example:9990/console/index.html");
        assert_eq!(config.webdriver.browser, BrowserKind::Firefox);
        assert!(!config.webdriver.headless);
        assert_eq!(config.webdriver.url, "http://localhost:4444");
        assert_eq!(config.timeouts.model, Duration::from_secs(10));
        assert_eq!(config.timeouts.gui, Duration::from_secs(1));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "management:\n  url: http://mgmt:9990\n  username: admin").unwrap();

        let config = SuiteConfig::from_file(file.path()).unwrap();
        assert_eq!(config.management.url, "http://mgmt:9990");
        assert_eq!(config.management.username.as_deref(), Some("admin"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("HAL_CONSOLE_URL", "http://other/console"),
            ("HAL_BROWSER", "Firefox"),
            ("HAL_HEADLESS", "0"),
            ("HAL_MANAGEMENT_PASSWORD", "secret"),
        ]
        .into_iter()
        .collect();

        let mut config = SuiteConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.console_url, "http://other/console");
        assert_eq!(config.webdriver.browser, BrowserKind::Firefox);
        assert!(!config.webdriver.headless);
        assert_eq!(config.management.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_env_rejects_bad_values() {
        let mut config = SuiteConfig::default();
        let err = config
            .apply_env(|key| (key == "HAL_HEADLESS").then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(matches!(err, TestsuiteError::Config(_)));

        let err = config
            .apply_env(|key| (key == "HAL_BROWSER").then(|| "lynx".to_string()))
            .unwrap_err();
        assert!(matches!(err, TestsuiteError::Config(_)));
    }
}

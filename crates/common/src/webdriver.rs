//! WebDriver management - spawning a local driver and opening browser sessions

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::{BrowserKind, WebDriverConfig};
use crate::error::{TestsuiteError, TestsuiteResult};

const TERMINATE_GRACE: Duration = Duration::from_millis(500);

/// Handle to a spawned `chromedriver` / `geckodriver` process
pub struct DriverProcess {
    child: Child,
    url: String,
    port: u16,
}

impl DriverProcess {
    /// Spawn the driver binary on a free port and wait until it is ready
    pub async fn spawn(executable: &Path, startup_timeout: Duration) -> TestsuiteResult<Self> {
        let port = find_free_port()?;
        let url = format!("http://127.0.0.1:{}", port);

        info!("Spawning {} on port {}", executable.display(), port);

        let child = Command::new(executable)
            .arg(format!("--port={}", port))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                TestsuiteError::DriverStartup(format!("Failed to spawn {}: {}", executable.display(), e))
            })?;

        let process = DriverProcess { child, url, port };
        process.wait_for_ready(startup_timeout).await?;

        info!("WebDriver is ready at {}", process.url);
        Ok(process)
    }

    /// Poll `/status` until the driver reports ready
    async fn wait_for_ready(&self, timeout_duration: Duration) -> TestsuiteResult<()> {
        let status_url = format!("{}/status", self.url);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = std::time::Instant::now();
        let mut attempts = 0;

        while start.elapsed() < timeout_duration {
            attempts += 1;

            match client.get(&status_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    let body: serde_json::Value = resp.json().await.unwrap_or_default();
                    // geckodriver reports ready=false while a session is active
                    if body["value"]["ready"].as_bool().unwrap_or(true) {
                        return Ok(());
                    }
                    debug!("WebDriver not ready yet: {}", body["value"]["message"]);
                }
                Ok(resp) => {
                    warn!("Status check returned {}", resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for WebDriver to start...");
                    }
                    if !e.is_connect() {
                        warn!("Status check error: {}", e);
                    }
                }
            }

            sleep(Duration::from_millis(100)).await;
        }

        Err(TestsuiteError::DriverHealthCheck(attempts))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stop the driver, gracefully first
    pub async fn stop(&mut self) -> TestsuiteResult<()> {
        if !self.is_running() {
            return Ok(());
        }
        info!("Stopping WebDriver (pid: {})", self.child.id());
        if self.terminate() {
            sleep(TERMINATE_GRACE).await;
        }
        self.force_kill();
        Ok(())
    }

    fn is_running(&mut self) -> bool {
        !matches!(self.child.try_wait(), Ok(Some(_)))
    }

    /// Sends SIGTERM, returns whether it was delivered
    fn terminate(&self) -> bool {
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            kill(Pid::from_raw(self.child.id() as i32), Signal::SIGTERM).is_ok()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    fn force_kill(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl Drop for DriverProcess {
    fn drop(&mut self) {
        if self.is_running() {
            self.force_kill();
        }
    }
}

/// Find a free local port
fn find_free_port() -> TestsuiteResult<u16> {
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

/// A browser session plus the driver process it runs on, if spawned
pub struct BrowserSession {
    driver: WebDriver,
    process: Option<DriverProcess>,
}

impl BrowserSession {
    /// Open a session against the configured driver, spawning it first when
    /// an executable is configured
    pub async fn connect(config: &WebDriverConfig) -> TestsuiteResult<Self> {
        let process = match &config.executable {
            Some(executable) => Some(DriverProcess::spawn(executable, config.startup_timeout).await?),
            None => None,
        };
        let url = process
            .as_ref()
            .map(|p| p.url().to_string())
            .unwrap_or_else(|| config.url.clone());

        info!(
            "Opening {} session at {} (headless: {})",
            config.browser.as_str(),
            url,
            config.headless
        );

        let driver = match config.browser {
            BrowserKind::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                if config.headless {
                    caps.set_headless()?;
                }
                caps.add_arg("--disable-dev-shm-usage")?;
                WebDriver::new(url.as_str(), caps).await?
            }
            BrowserKind::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                if config.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(url.as_str(), caps).await?
            }
        };
        driver
            .set_window_rect(0, 0, config.window_width, config.window_height)
            .await?;

        Ok(Self { driver, process })
    }

    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    /// Close the browser and stop a spawned driver
    pub async fn quit(self) -> TestsuiteResult<()> {
        let BrowserSession { driver, process } = self;
        debug!("Closing browser session");
        driver.quit().await?;
        if let Some(mut process) = process {
            process.stop().await?;
        }
        Ok(())
    }

    /// Path of the driver binary for a browser, as found on `PATH`
    pub fn default_executable(browser: BrowserKind) -> PathBuf {
        match browser {
            BrowserKind::Chrome => PathBuf::from("chromedriver"),
            BrowserKind::Firefox => PathBuf::from("geckodriver"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_free_port() {
        let port1 = find_free_port().unwrap();
        let port2 = find_free_port().unwrap();

        assert!(port1 > 0);
        assert!(port2 > 0);
    }

    #[test]
    fn test_default_executable() {
        assert_eq!(
            BrowserSession::default_executable(BrowserKind::Firefox),
            PathBuf::from("geckodriver")
        );
    }

    #[tokio::test]
    async fn test_spawn_missing_binary() {
        let result = DriverProcess::spawn(
            Path::new("/nonexistent/chromedriver"),
            Duration::from_millis(100),
        )
        .await;
        assert!(matches!(result, Err(TestsuiteError::DriverStartup(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stop_terminates_process() {
        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let mut process = DriverProcess {
            child,
            url: "http://127.0.0.1:0".to_string(),
            port: 0,
        };
        assert!(process.is_running());

        process.stop().await.unwrap();
        assert!(!process.is_running());
        process.stop().await.unwrap();
    }
}

//! HAL console test suite
//!
//! Browser tests for the HAL management console. A test drives the console
//! through page fragments and checks the outcome against the management
//! model of the running server.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SuiteRunner                              │
//! │    ├── before_all(Operations)       fixtures                │
//! │    ├── BrowserSession::connect()    one per test class      │
//! │    ├── case(TestContext)            screenshot on failure   │
//! │    └── after_all(Operations)        always                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestContext                                                │
//! │    ├── Console                                              │
//! │    │     ├── navigate(PlaceRequest)  #token;key=value       │
//! │    │     ├── success() / error()     toast notifications    │
//! │    │     └── finder, dialogs, header, footer, tabs          │
//! │    ├── CrudOperations                                       │
//! │    │     └── create / update / reset / delete + verify      │
//! │    └── Operations                                           │
//! │          └── ManagementClient  ──HTTP/JSON──▶  /management  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod address;
pub mod config;
pub mod console;
pub mod crud;
pub mod error;
pub mod fragment;
pub mod ids;
pub mod management;
pub mod page;
pub mod place;
pub mod random;
pub mod runner;
pub mod wait;
pub mod webdriver;

pub use address::Address;
pub use config::SuiteConfig;
pub use console::Console;
pub use crud::CrudOperations;
pub use error::{ensure_eq, TestsuiteError, TestsuiteResult};
pub use management::{Operations, ResourceVerifier, Value, Values};
pub use page::Page;
pub use place::PlaceRequest;
pub use runner::{SuiteRunner, TestCase, TestClass, TestContext};
pub use wait::Wait;

/// Suite version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

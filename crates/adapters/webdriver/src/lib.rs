//! # traderdash-adapter-webdriver
//!
//! Automation session over the W3C WebDriver wire protocol.
//!
//! [`WebDriverBrowser`] talks to a locally running chromedriver over
//! plain HTTP and hands out sessions that are already logged in to the
//! trading application with the search panel open. No browser-automation
//! framework is involved; the handful of endpoints the session needs are
//! spoken directly in [`client`].
//!
//! ## Dependency rule
//!
//! Depends on `traderdash-app` (port traits) and `traderdash-domain` only.

pub mod client;
mod session;

pub use session::{BrowserSettings, WebDriverBrowser, WebDriverSession};

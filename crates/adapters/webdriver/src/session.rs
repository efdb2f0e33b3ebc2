//! Automation session backed by a real browser through chromedriver.

use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::debug;
use traderdash_app::ports::{AutomationSession, SessionFactory};
use traderdash_domain::error::SessionError;
use traderdash_domain::outcome::DashboardLink;

use crate::client::{DriverClient, ElementId, Locator};

const SEL_USERNAME: &str = "#userNameInput";
const SEL_PASSWORD: &str = "#passwordInput";
const SEL_SUBMIT: &str = "#submitButton";
const SEL_SEARCH_BUTTON: &str = ".search-button";
const SEL_SEARCH_FIELD: &str = "#results-search-filter";
const SEL_DASHBOARD_BUTTON: &str = ".dashboard-button";
const SEL_SELECT_ALL: &str = "#checkbox-all-events";
/// The result row the matcher commits to is always the second checkbox
/// on the page; the first is the select-all control.
const XPATH_SECONDARY_RESULT: &str = "(//input[@type='checkbox'])[2]";

const LOGIN_TIMEOUT: Duration = Duration::from_secs(15);
const ELEMENT_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Connection and credential settings for [`WebDriverBrowser`].
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// Base URL of the driver binary, e.g. `http://localhost:9515`.
    pub driver_url: String,
    /// URL of the trading application login page.
    pub app_url: String,
    /// Login user name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Run the browser without a visible window.
    pub headless: bool,
}

/// Opens logged-in [`WebDriverSession`]s against the trading UI.
pub struct WebDriverBrowser {
    settings: BrowserSettings,
}

impl WebDriverBrowser {
    #[must_use]
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

impl SessionFactory for WebDriverBrowser {
    type Session = WebDriverSession;

    fn open(&self) -> impl Future<Output = Result<Self::Session, SessionError>> + Send {
        let settings = self.settings.clone();
        async move {
            let client = DriverClient::new_session(&settings.driver_url, settings.headless).await?;
            let mut session = WebDriverSession { client };
            match session.login(&settings).await {
                Ok(()) => Ok(session),
                Err(err) => {
                    // Best effort: don't leak the browser on a failed login.
                    if let Err(quit_err) = session.client.quit().await {
                        debug!(error = %quit_err, "failed to quit session after login error");
                    }
                    Err(err)
                }
            }
        }
    }
}

/// One logged-in browser session.
pub struct WebDriverSession {
    client: DriverClient,
}

impl WebDriverSession {
    async fn login(&mut self, settings: &BrowserSettings) -> Result<(), SessionError> {
        self.client.navigate(&settings.app_url).await?;

        let username = self
            .wait_for(Locator::Css(SEL_USERNAME), LOGIN_TIMEOUT)
            .await
            .map_err(|err| SessionError::Authentication(err.to_string()))?;
        self.client.send_keys(&username, &settings.username).await?;

        let password = self
            .client
            .find_element(Locator::Css(SEL_PASSWORD))
            .await?
            .ok_or_else(|| {
                SessionError::Authentication("password field not found on login page".to_string())
            })?;
        self.client.send_keys(&password, &settings.password).await?;

        let submit = self
            .client
            .find_element(Locator::Css(SEL_SUBMIT))
            .await?
            .ok_or_else(|| {
                SessionError::Authentication("submit button not found on login page".to_string())
            })?;
        self.client.click(&submit).await?;

        // The search button only appears once the credentials are accepted.
        let search = self
            .wait_for(Locator::Css(SEL_SEARCH_BUTTON), LOGIN_TIMEOUT)
            .await
            .map_err(|err| SessionError::Authentication(err.to_string()))?;
        self.client.click(&search).await?;
        self.wait_for(Locator::Css(SEL_SEARCH_FIELD), ELEMENT_TIMEOUT)
            .await?;
        debug!("session logged in and search panel open");
        Ok(())
    }

    /// Poll for an element until it shows up or the timeout elapses.
    async fn wait_for(
        &self,
        locator: Locator<'_>,
        timeout: Duration,
    ) -> Result<ElementId, SessionError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(element) = self.client.find_element(locator).await? {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                let selector = match locator {
                    Locator::Css(s) | Locator::XPath(s) => s.to_string(),
                };
                return Err(SessionError::WaitTimeout {
                    selector,
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

impl AutomationSession for WebDriverSession {
    fn set_search_text(
        &mut self,
        text: &str,
    ) -> impl Future<Output = Result<(), SessionError>> + Send {
        async move {
            let field = self
                .wait_for(Locator::Css(SEL_SEARCH_FIELD), ELEMENT_TIMEOUT)
                .await?;
            self.client.clear(&field).await?;
            if !text.is_empty() {
                self.client.send_keys(&field, text).await?;
            }
            Ok(())
        }
    }

    fn select_secondary_result(
        &mut self,
    ) -> impl Future<Output = Result<bool, SessionError>> + Send {
        async move {
            // Give the result list a moment to render before concluding
            // there is nothing to select.
            sleep(POLL_INTERVAL).await;
            match self
                .client
                .find_element(Locator::XPath(XPATH_SECONDARY_RESULT))
                .await?
            {
                Some(checkbox) => {
                    self.client.click(&checkbox).await?;
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    fn read_dashboard_link(
        &mut self,
    ) -> impl Future<Output = Result<DashboardLink, SessionError>> + Send {
        async move {
            let button = self
                .wait_for(Locator::Css(SEL_DASHBOARD_BUTTON), ELEMENT_TIMEOUT)
                .await?;
            let href = self.client.attribute(&button, "href").await?.ok_or_else(|| {
                SessionError::Protocol("dashboard button has no href attribute".to_string())
            })?;
            Ok(DashboardLink::new(href))
        }
    }

    fn clear_all_selections(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
        async move {
            let select_all = self
                .wait_for(Locator::Css(SEL_SELECT_ALL), ELEMENT_TIMEOUT)
                .await?;
            // Double-clicking toggles everything on and off again, landing
            // on a fully deselected page regardless of the current state.
            self.client.double_click(&select_all).await
        }
    }

    fn refresh(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
        async move {
            self.client.refresh().await?;
            self.wait_for(Locator::Css(SEL_SEARCH_FIELD), ELEMENT_TIMEOUT)
                .await?;
            Ok(())
        }
    }

    fn close(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
        async move { self.client.quit().await }
    }
}

//! Minimal W3C WebDriver wire-protocol client.
//!
//! Speaks plain JSON-over-HTTP to a driver binary (chromedriver). Only the
//! endpoints the automation session needs are implemented: session
//! lifecycle, navigation, element lookup, clicks, keys, attributes, and a
//! double-click through the actions endpoint.

use serde_json::{Value, json};
use traderdash_domain::error::SessionError;

/// W3C element identifier key in find-element responses.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// How an element is located.
#[derive(Debug, Clone, Copy)]
pub enum Locator<'a> {
    /// CSS selector.
    Css(&'a str),
    /// XPath expression.
    XPath(&'a str),
}

impl<'a> Locator<'a> {
    fn strategy(self) -> &'static str {
        match self {
            Self::Css(_) => "css selector",
            Self::XPath(_) => "xpath",
        }
    }

    fn value(self) -> &'a str {
        match self {
            Self::Css(v) | Self::XPath(v) => v,
        }
    }
}

/// Opaque element handle returned by the driver.
#[derive(Debug, Clone)]
pub struct ElementId(String);

/// Outcome of a wire call, separating the one "error" the protocol uses
/// for control flow from genuine session failures.
enum WireError {
    NoSuchElement,
    Session(SessionError),
}

impl From<SessionError> for WireError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

/// One driver session.
pub struct DriverClient {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl DriverClient {
    /// Start a new browser session on the driver at `base_url`.
    ///
    /// # Errors
    ///
    /// Fails when the driver is unreachable or rejects the capabilities.
    pub async fn new_session(base_url: &str, headless: bool) -> Result<Self, SessionError> {
        let http = reqwest::Client::new();
        let body = session_capabilities(headless);
        let url = format!("{base_url}/session");

        let response = http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| SessionError::Transport(err.to_string()))?;
        let payload: Value = response
            .json()
            .await
            .map_err(|err| SessionError::Transport(err.to_string()))?;

        let session_id = payload
            .pointer("/value/sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                SessionError::Protocol(format!("missing sessionId in driver response: {payload}"))
            })?
            .to_string();

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            session_id,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/session/{}{path}", self.base_url, self.session_id)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, WireError> {
        let response = self
            .http
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|err| SessionError::Transport(err.to_string()))?;
        Self::decode(response).await
    }

    async fn get(&self, path: &str) -> Result<Value, WireError> {
        let response = self
            .http
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(|err| SessionError::Transport(err.to_string()))?;
        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<Value, WireError> {
        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|err| SessionError::Transport(err.to_string()))?;
        if status.is_success() {
            return Ok(payload);
        }
        Err(classify_error(&payload))
    }

    /// Navigate to `url`.
    ///
    /// # Errors
    ///
    /// Fails on transport or driver errors.
    pub async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.post("/url", &json!({ "url": url }))
            .await
            .map(drop)
            .map_err(|err| err.into_session("navigate"))
    }

    /// Reload the current page.
    ///
    /// # Errors
    ///
    /// Fails on transport or driver errors.
    pub async fn refresh(&self) -> Result<(), SessionError> {
        self.post("/refresh", &json!({}))
            .await
            .map(drop)
            .map_err(|err| err.into_session("refresh"))
    }

    /// Look up one element; `Ok(None)` when the driver reports no match.
    ///
    /// # Errors
    ///
    /// Fails on transport or driver errors other than "no such element".
    pub async fn find_element(
        &self,
        locator: Locator<'_>,
    ) -> Result<Option<ElementId>, SessionError> {
        let body = json!({
            "using": locator.strategy(),
            "value": locator.value(),
        });
        match self.post("/element", &body).await {
            Ok(payload) => element_from_payload(&payload).map(Some),
            Err(WireError::NoSuchElement) => Ok(None),
            Err(WireError::Session(err)) => Err(err),
        }
    }

    /// Click an element.
    ///
    /// # Errors
    ///
    /// Fails on transport or driver errors.
    pub async fn click(&self, element: &ElementId) -> Result<(), SessionError> {
        self.post(&format!("/element/{}/click", element.0), &json!({}))
            .await
            .map(drop)
            .map_err(|err| err.into_session("click"))
    }

    /// Double-click an element through the actions endpoint.
    ///
    /// # Errors
    ///
    /// Fails on transport or driver errors.
    pub async fn double_click(&self, element: &ElementId) -> Result<(), SessionError> {
        let body = double_click_actions(&element.0);
        self.post("/actions", &body)
            .await
            .map(drop)
            .map_err(|err| err.into_session("double-click"))
    }

    /// Type `text` into an element.
    ///
    /// # Errors
    ///
    /// Fails on transport or driver errors.
    pub async fn send_keys(&self, element: &ElementId, text: &str) -> Result<(), SessionError> {
        self.post(
            &format!("/element/{}/value", element.0),
            &json!({ "text": text }),
        )
        .await
        .map(drop)
        .map_err(|err| err.into_session("send keys"))
    }

    /// Clear an input element.
    ///
    /// # Errors
    ///
    /// Fails on transport or driver errors.
    pub async fn clear(&self, element: &ElementId) -> Result<(), SessionError> {
        self.post(&format!("/element/{}/clear", element.0), &json!({}))
            .await
            .map(drop)
            .map_err(|err| err.into_session("clear"))
    }

    /// Read an element attribute; `Ok(None)` when the attribute is unset.
    ///
    /// # Errors
    ///
    /// Fails on transport or driver errors.
    pub async fn attribute(
        &self,
        element: &ElementId,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        let payload = self
            .get(&format!("/element/{}/attribute/{name}", element.0))
            .await
            .map_err(|err| err.into_session("attribute"))?;
        Ok(payload
            .get("value")
            .and_then(Value::as_str)
            .map(ToString::to_string))
    }

    /// End the session, releasing the browser.
    ///
    /// # Errors
    ///
    /// Fails on transport or driver errors.
    pub async fn quit(&self) -> Result<(), SessionError> {
        let response = self
            .http
            .delete(self.endpoint(""))
            .send()
            .await
            .map_err(|err| SessionError::Transport(err.to_string()))?;
        Self::decode(response)
            .await
            .map(drop)
            .map_err(|err| err.into_session("quit"))
    }
}

impl WireError {
    /// Flatten into a session error; "no such element" surfacing here
    /// means a caller expected the element to exist.
    fn into_session(self, action: &str) -> SessionError {
        match self {
            Self::NoSuchElement => {
                SessionError::Protocol(format!("element vanished during {action}"))
            }
            Self::Session(err) => err,
        }
    }
}

fn session_capabilities(headless: bool) -> Value {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-gpu".to_string(),
        "--window-size=1920,1080".to_string(),
        "--disable-extensions".to_string(),
        "--disable-popup-blocking".to_string(),
    ];
    if headless {
        args.push("--headless=old".to_string());
    }
    json!({
        "capabilities": {
            "alwaysMatch": {
                "browserName": "chrome",
                "goog:chromeOptions": {
                    "args": args,
                    "excludeSwitches": ["enable-logging", "disable-automation"],
                    // Skip image loading to speed the UI up.
                    "prefs": { "profile.managed_default_content_settings.images": 2 },
                }
            }
        }
    })
}

fn double_click_actions(element: &str) -> Value {
    json!({
        "actions": [{
            "type": "pointer",
            "id": "mouse",
            "parameters": { "pointerType": "mouse" },
            "actions": [
                { "type": "pointerMove", "duration": 0, "x": 0, "y": 0,
                  "origin": { ELEMENT_KEY: element } },
                { "type": "pointerDown", "button": 0 },
                { "type": "pointerUp", "button": 0 },
                { "type": "pointerDown", "button": 0 },
                { "type": "pointerUp", "button": 0 },
            ],
        }]
    })
}

fn element_from_payload(payload: &Value) -> Result<ElementId, SessionError> {
    payload
        .pointer(&format!("/value/{ELEMENT_KEY}"))
        .and_then(Value::as_str)
        .map(|id| ElementId(id.to_string()))
        .ok_or_else(|| {
            SessionError::Protocol(format!("missing element id in driver response: {payload}"))
        })
}

fn classify_error(payload: &Value) -> WireError {
    let error = payload
        .pointer("/value/error")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let message = payload
        .pointer("/value/message")
        .and_then(Value::as_str)
        .unwrap_or("");
    match error {
        "no such element" => WireError::NoSuchElement,
        "timeout" | "script timeout" => WireError::Session(SessionError::Navigation(format!(
            "driver timeout: {message}"
        ))),
        other => WireError::Session(SessionError::Protocol(format!("{other}: {message}"))),
    }
}

//! Remote leaderboard client
//!
//! The client builds requests and interprets responses; the browser build
//! does the actual `fetch` in between (`send`). One attempt per user action,
//! no timeout, no retry.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use time::Date;
use time::macros::format_description;

pub const SUBMIT_PATH: &str = "/score";
pub const LEADERBOARD_PATH: &str = "/scores";

/// Row defaults for fields the server left out
pub const ANONYMOUS: &str = "Anonymous";
pub const NO_SCORE: &str = "N/A";
pub const UNKNOWN_DATE: &str = "unknown date";
pub const INVALID_DATE: &str = "invalid date";

/// Leaderboard placeholders
pub const NO_SCORES_TEXT: &str = "No scores yet";
pub const UNEXPECTED_FORMAT_TEXT: &str = "Unexpected data format";
pub const LOAD_ERROR_PREFIX: &str = "Error loading leaderboard";

pub const SUBMIT_SUCCESS_TEXT: &str = "Score saved! 🎉";
const SUBMIT_FAILURE_TEXT: &str = "Could not save score";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A request for the transport to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// JSON body
    pub body: Option<String>,
}

/// What came back from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("network error: {0}")]
pub struct TransportError(pub String);

/// Why a score submission did not go through (Display is shown to the player)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please enter your Discord ID")]
    EmptyIdentifier,
    #[error("A score is already being submitted")]
    InFlight,
    #[error("Error: {0}")]
    Transport(#[from] TransportError),
    #[error("Error: unreadable server response")]
    Malformed,
    #[error("{0}")]
    Rejected(String),
}

/// Wire body of `POST /score`
#[derive(Debug, Serialize)]
struct ScoreSubmission<'a> {
    discord_id: &'a str,
    score: u32,
}

/// Reply to `POST /score`
#[derive(Debug, Deserialize)]
struct SubmitReply {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Score API client state
#[derive(Debug, Clone, Default)]
pub struct ScoreClient {
    base_url: String,
    submit_in_flight: bool,
    /// Bumped per leaderboard fetch; only the newest response is shown
    leaderboard_generation: u64,
}

/// A leaderboard request tagged with the fetch it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardFetch {
    pub generation: u64,
    pub request: HttpRequest,
}

impl ScoreClient {
    /// `base_url` is prefixed to the API paths (`""` for same origin)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            submit_in_flight: false,
            leaderboard_generation: 0,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_in_flight
    }

    /// Validate and build the submit request.
    ///
    /// An empty identifier or a submission already pending yields an error and
    /// no request.
    pub fn begin_submit(
        &mut self,
        identifier: &str,
        elapsed_secs: u32,
    ) -> Result<HttpRequest, SubmitError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(SubmitError::EmptyIdentifier);
        }
        if self.submit_in_flight {
            return Err(SubmitError::InFlight);
        }

        let body = serde_json::to_string(&ScoreSubmission {
            discord_id: identifier,
            score: elapsed_secs,
        })
        .map_err(|_| SubmitError::Malformed)?;

        self.submit_in_flight = true;
        log::info!("Submitting score {}s for {}", elapsed_secs, identifier);
        Ok(HttpRequest {
            method: Method::Post,
            url: format!("{}{}", self.base_url, SUBMIT_PATH),
            body: Some(body),
        })
    }

    /// Interpret the submit outcome and release the in-flight guard
    pub fn finish_submit(
        &mut self,
        result: Result<HttpResponse, TransportError>,
    ) -> Result<(), SubmitError> {
        self.submit_in_flight = false;

        let outcome = interpret_submit(result);
        match &outcome {
            Ok(()) => log::info!("Score saved"),
            Err(e) => log::warn!("Score submission failed: {}", e),
        }
        outcome
    }

    pub fn leaderboard_request(&self) -> HttpRequest {
        HttpRequest {
            method: Method::Get,
            url: format!("{}{}", self.base_url, LEADERBOARD_PATH),
            body: None,
        }
    }

    /// Start a leaderboard fetch, superseding any still pending
    pub fn begin_leaderboard(&mut self) -> LeaderboardFetch {
        self.leaderboard_generation += 1;
        LeaderboardFetch {
            generation: self.leaderboard_generation,
            request: self.leaderboard_request(),
        }
    }

    /// Whether a response for `generation` is the newest fetch; stale ones are dropped
    pub fn is_current_leaderboard(&self, generation: u64) -> bool {
        generation == self.leaderboard_generation
    }
}

fn interpret_submit(result: Result<HttpResponse, TransportError>) -> Result<(), SubmitError> {
    let response = result?;
    let reply = serde_json::from_str::<SubmitReply>(&response.body).ok();

    if !response.is_success() {
        let message = reply
            .and_then(|r| r.message)
            .unwrap_or_else(|| format!("Error {}", response.status));
        return Err(SubmitError::Rejected(message));
    }

    let reply = reply.ok_or(SubmitError::Malformed)?;
    if reply.status.as_deref() == Some("success") {
        Ok(())
    } else {
        Err(SubmitError::Rejected(
            reply
                .message
                .unwrap_or_else(|| SUBMIT_FAILURE_TEXT.to_string()),
        ))
    }
}

/// One rendered leaderboard line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    /// 1-based position in the server's order
    pub rank: usize,
    pub name: String,
    pub score: String,
    pub date: String,
}

/// What the leaderboard panel shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardView {
    Rows(Vec<LeaderboardRow>),
    /// Server returned `[]`
    Empty,
    /// Server returned JSON that is not a list
    UnexpectedFormat,
    /// Request failed or body was not JSON
    Failed(String),
}

impl LeaderboardView {
    pub fn from_response(result: Result<HttpResponse, TransportError>) -> Self {
        let view = match result {
            Err(e) => LeaderboardView::Failed(e.to_string()),
            Ok(resp) if !resp.is_success() => {
                LeaderboardView::Failed(format!("HTTP {}", resp.status))
            }
            Ok(resp) => match serde_json::from_str::<Value>(&resp.body) {
                Ok(value) => Self::from_json(&value),
                Err(e) => LeaderboardView::Failed(format!("invalid JSON: {}", e)),
            },
        };
        match &view {
            LeaderboardView::Rows(rows) => log::info!("Leaderboard loaded: {} rows", rows.len()),
            LeaderboardView::Failed(msg) => log::error!("Leaderboard failed: {}", msg),
            LeaderboardView::UnexpectedFormat => log::warn!("Leaderboard response is not a list"),
            LeaderboardView::Empty => log::info!("Leaderboard is empty"),
        }
        view
    }

    /// Rows in the order received; the server does the ranking
    pub fn from_json(value: &Value) -> Self {
        match value.as_array() {
            None => LeaderboardView::UnexpectedFormat,
            Some(records) if records.is_empty() => LeaderboardView::Empty,
            Some(records) => LeaderboardView::Rows(
                records
                    .iter()
                    .enumerate()
                    .map(|(i, record)| row_from_record(i + 1, record))
                    .collect(),
            ),
        }
    }

    /// Markup for the leaderboard panel (server strings are escaped)
    pub fn to_html(&self) -> String {
        match self {
            LeaderboardView::Rows(rows) => rows
                .iter()
                .map(|row| {
                    format!(
                        "<div class=\"leaderboard-item\"><span>{}. {}</span><span>{} s</span><small>{}</small></div>",
                        row.rank,
                        escape_html(&row.name),
                        escape_html(&row.score),
                        escape_html(&row.date),
                    )
                })
                .collect(),
            LeaderboardView::Empty => placeholder("leaderboard-empty", NO_SCORES_TEXT),
            LeaderboardView::UnexpectedFormat => {
                placeholder("leaderboard-empty", UNEXPECTED_FORMAT_TEXT)
            }
            LeaderboardView::Failed(msg) => placeholder(
                "leaderboard-error",
                &format!("{}: {}", LOAD_ERROR_PREFIX, msg),
            ),
        }
    }
}

fn placeholder(class: &str, text: &str) -> String {
    format!("<div class=\"{}\">{}</div>", class, escape_html(text))
}

fn row_from_record(rank: usize, record: &Value) -> LeaderboardRow {
    let name = record
        .get("discord_id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(ANONYMOUS)
        .to_string();

    let score = match record.get("score") {
        None | Some(Value::Null) => NO_SCORE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
    };

    let date = record
        .get("date")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(format_date)
        .unwrap_or_else(|| UNKNOWN_DATE.to_string());

    LeaderboardRow {
        rank,
        name,
        score,
        date,
    }
}

/// Format an ISO-8601 timestamp as `d/m/yyyy` (calendar date part only)
pub fn format_date(raw: &str) -> String {
    raw.get(..10)
        .and_then(|day| Date::parse(day, format_description!("[year]-[month]-[day]")).ok())
        .and_then(|date| {
            date.format(format_description!(
                "[day padding:none]/[month padding:none]/[year]"
            ))
            .ok()
        })
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Perform a request with `fetch` (WASM only)
#[cfg(target_arch = "wasm32")]
pub async fn send(request: &HttpRequest) -> Result<HttpResponse, TransportError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, Response};

    let init = RequestInit::new();
    init.set_method(request.method.as_str());
    if let Some(body) = &request.body {
        init.set_body(&JsValue::from_str(body));
    }

    let req = Request::new_with_str_and_init(&request.url, &init).map_err(js_error)?;
    if request.body.is_some() {
        req.headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;
    }

    let window = web_sys::window().ok_or_else(|| TransportError("no window".to_string()))?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&req))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    let body = JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .unwrap_or_default();

    Ok(HttpResponse {
        status: resp.status(),
        body,
    })
}

#[cfg(target_arch = "wasm32")]
fn js_error(value: wasm_bindgen::JsValue) -> TransportError {
    use wasm_bindgen::JsCast;

    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value));
    TransportError(message)
}

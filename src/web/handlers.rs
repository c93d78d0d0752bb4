//! HTTP request handlers

use super::state::AppState;
use crate::error::{Error, ValidationError};
use crate::export::{ExportFile, ExportFormat};
use crate::results::{ResultSet, SearchResult};
use crate::search::SearchOutcome;
use crate::session::SessionId;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "sid";

/// Count used when the form leaves it blank
const DEFAULT_COUNT: u32 = 10;

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search text
    pub q: Option<String>,
    /// Number of results wanted
    pub count: Option<String>,
    /// Output format (`json` for the API response)
    pub format: Option<String>,
}

/// Query parameters for export
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
}

/// JSON body for `/search?format=json`
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub number_of_results: usize,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

/// Banner shown above the results
#[derive(Debug, Serialize)]
struct Notice {
    level: &'static str,
    message: String,
}

impl Notice {
    fn new(level: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    fn from_error(err: &Error) -> Self {
        match err {
            Error::Validation(_) => Self::new("warning", err.to_string()),
            Error::Provider(e) if e.is_rate_limited() => Self::new(
                "warning",
                format!("{}. The search quota is used up for now; wait a moment and try again.", err),
            ),
            _ => Self::new("error", err.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct FormatLink {
    label: &'static str,
    href: String,
}

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    rank: u32,
    title: &'a str,
    url: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct ResultSetView<'a> {
    query: &'a str,
    fetched_at: String,
    results: Vec<ResultRow<'a>>,
}

impl<'a> ResultSetView<'a> {
    /// Rows for the results table. Only http(s) urls are kept as links.
    fn new(set: &'a ResultSet) -> Self {
        Self {
            query: &set.query,
            fetched_at: set.fetched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            results: set
                .results
                .iter()
                .map(|r| ResultRow {
                    rank: r.rank,
                    title: &r.title,
                    url: if is_web_url(&r.url) { &r.url } else { "" },
                    description: &r.description,
                })
                .collect(),
        }
    }
}

/// Everything the page template needs
#[derive(Debug, Serialize)]
struct PageView<'a> {
    instance_name: &'a str,
    version: &'static str,
    configured: bool,
    max_results: u32,
    query: &'a str,
    count: u32,
    notice: Option<Notice>,
    result_set: Option<ResultSetView<'a>>,
    formats: Vec<FormatLink>,
}

impl<'a> PageView<'a> {
    fn new(state: &'a AppState) -> Self {
        let max_results = state.settings.provider.max_results;
        Self {
            instance_name: state.instance_name(),
            version: crate::VERSION,
            configured: state.is_configured(),
            max_results,
            query: "",
            count: DEFAULT_COUNT.min(max_results),
            notice: None,
            result_set: None,
            formats: ExportFormat::ALL
                .iter()
                .map(|f| FormatLink {
                    label: match f {
                        ExportFormat::Csv => "CSV",
                        ExportFormat::Xlsx => "Excel",
                    },
                    href: format!("/export?format={}", f),
                })
                .collect(),
        }
    }

    fn with_results(mut self, set: Option<&'a ResultSet>) -> Self {
        self.result_set = set.map(ResultSetView::new);
        self
    }
}

/// Session resolved from the request cookie
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub id: SessionId,
    pub is_new: bool,
}

impl Session {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let existing = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| value.parse::<SessionId>().ok());

        match existing {
            Some(id) => Self { id, is_new: false },
            None => Self {
                id: SessionId::generate(),
                is_new: true,
            },
        }
    }

    /// Attach a Set-Cookie header if the session was just created
    fn attach(self, mut response: Response) -> Response {
        if self.is_new {
            let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
        }
        response
    }
}

fn is_web_url(url: &str) -> bool {
    url::Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::Provider(_) => StatusCode::BAD_GATEWAY,
        Error::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn parse_count(raw: Option<&str>) -> Result<u32, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_COUNT),
        Some(s) => s
            .parse()
            .map_err(|_| ValidationError::InvalidCount(s.to_string())),
    }
}

fn render_page(state: &AppState, status: StatusCode, view: &PageView<'_>) -> Response {
    match state.templates.render("index.html", view) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

fn json_error(err: &Error) -> Response {
    let body = ErrorResponse {
        error: err.kind(),
        message: err.to_string(),
    };
    (status_for(err), Json(body)).into_response()
}

/// Home page handler
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = Session::from_headers(&headers);

    let stored = match state.service() {
        Ok(service) => service.last(session.id).await,
        Err(_) => None,
    };

    let mut view = PageView::new(&state).with_results(stored.as_deref());
    if let Some(set) = stored.as_deref() {
        view.query = &set.query;
    }
    if let Err(e) = state.service() {
        view.notice = Some(Notice::from_error(&Error::Configuration(e.clone())));
    }

    session.attach(render_page(&state, StatusCode::OK, &view))
}

/// Search handler
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let session = Session::from_headers(&headers);
    let wants_json = params.format.as_deref() == Some("json");
    let text = params.q.as_deref().unwrap_or("");

    let outcome = match state.service() {
        Err(e) => Err(Error::Configuration(e.clone())),
        Ok(service) => match parse_count(params.count.as_deref()) {
            Err(e) => Err(e.into()),
            Ok(count) => service.search(session.id, text, count).await,
        },
    };

    if wants_json {
        let response = match outcome {
            Ok(SearchOutcome::Found(set)) => Json(SearchResponse {
                query: set.query.clone(),
                number_of_results: set.len(),
                results: set.results.clone(),
            })
            .into_response(),
            Ok(SearchOutcome::NoResults { query }) => Json(SearchResponse {
                query,
                number_of_results: 0,
                results: vec![],
            })
            .into_response(),
            Err(e) => json_error(&e),
        };
        return session.attach(response);
    }

    // On failure the page still shows whatever the session held before
    let previous: Option<Arc<ResultSet>> = match (&outcome, state.service()) {
        (Err(_), Ok(service)) => service.last(session.id).await,
        _ => None,
    };

    let mut view = PageView::new(&state);
    view.query = text;
    if let Ok(count) = parse_count(params.count.as_deref()) {
        view.count = count;
    }

    let status = match &outcome {
        Ok(SearchOutcome::Found(set)) => {
            view.notice = Some(Notice::new(
                "success",
                format!("Found {} results", set.len()),
            ));
            view = view.with_results(Some(set.as_ref()));
            StatusCode::OK
        }
        Ok(SearchOutcome::NoResults { query }) => {
            view.notice = Some(Notice::new(
                "info",
                format!(
                    "No results found for \u{201c}{}\u{201d}. Try different or fewer keywords.",
                    query
                ),
            ));
            StatusCode::OK
        }
        Err(e) => {
            view.notice = Some(Notice::from_error(e));
            view = view.with_results(previous.as_deref());
            status_for(e)
        }
    };

    session.attach(render_page(&state, status, &view))
}

/// Export handler: returns the session's results as a download
pub async fn export(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ExportParams>,
) -> Response {
    let session = Session::from_headers(&headers);

    let result = match state.service() {
        Err(e) => Err(Error::Configuration(e.clone())),
        Ok(service) => {
            match params
                .format
                .as_deref()
                .unwrap_or("csv")
                .parse::<ExportFormat>()
            {
                Err(e) => Err(e.into()),
                Ok(format) => service.export(session.id, format).await,
            }
        }
    };

    let response = match result {
        Ok(file) => download(file),
        Err(e) => {
            tracing::warn!("Export failed: {}", e);
            let stored = match state.service() {
                Ok(service) => service.last(session.id).await,
                Err(_) => None,
            };
            let mut view = PageView::new(&state).with_results(stored.as_deref());
            view.notice = Some(Notice::from_error(&e));
            render_page(&state, status_for(&e), &view)
        }
    };

    session.attach(response)
}

fn download(file: ExportFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, file.mime.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&file.file_name)),
        ],
        file.bytes,
    )
        .into_response()
}

/// `attachment` with an ASCII fallback name and the RFC 5987 UTF-8 name
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "configured": state.is_configured(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(None), Ok(DEFAULT_COUNT));
        assert_eq!(parse_count(Some(" ")), Ok(DEFAULT_COUNT));
        assert_eq!(parse_count(Some("15")), Ok(15));
        assert_eq!(
            parse_count(Some("ten")),
            Err(ValidationError::InvalidCount("ten".to_string()))
        );
    }

    #[test]
    fn test_rate_limit_notice() {
        let err = Error::Provider(ProviderError::Status {
            status: 429,
            detail: "too many requests".to_string(),
        });
        let notice = Notice::from_error(&err);
        assert_eq!(notice.level, "warning");
        assert!(notice.message.starts_with("provider returned HTTP 429"));
        assert!(notice.message.contains("wait a moment"));

        let err = Error::Provider(ProviderError::Timeout);
        assert_eq!(Notice::from_error(&err).level, "error");
    }

    #[test]
    fn test_session_from_cookie() {
        let id = SessionId::generate();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; sid={}", id)).unwrap(),
        );

        let session = Session::from_headers(&headers);
        assert_eq!(session.id, id);
        assert!(!session.is_new);
    }

    #[test]
    fn test_bad_cookie_starts_new_session() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("sid=garbage"));
        assert!(Session::from_headers(&headers).is_new);
        assert!(Session::from_headers(&HeaderMap::new()).is_new);
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("search_results_weather.csv"),
            "attachment; filename=\"search_results_weather.csv\"; \
             filename*=UTF-8''search_results_weather.csv"
        );

        let value = content_disposition("search_results_東京.xlsx");
        assert!(value.contains("filename=\"search_results___.xlsx\""));
        assert!(value.contains("filename*=UTF-8''search_results_%E6%9D%B1%E4%BA%AC.xlsx"));
    }

    #[test]
    fn test_web_urls_only() {
        assert!(is_web_url("https://example.com"));
        assert!(!is_web_url("javascript:alert(1)"));
        assert!(!is_web_url(""));
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use varta_core::types::{Category, Headline, HeadlineFilter, Language, SearchResult, User};
use varta_core::Error;

use crate::sessions::{SessionStore, SESSION_COOKIE};
use crate::state::AppState;
use crate::views::render;
use crate::bindings;

/// Wraps the workspace error for axum. Pipeline errors never reach here
/// (the orchestrator swallows them); this covers storage and
/// serialization failures, which are genuine 500s.
pub struct WebError(Error);

impl<E: Into<Error>> From<E> for WebError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
    }
}

type HandlerResult = Result<Response, WebError>;

/// All headlines, most recent first.
async fn object_list(state: &AppState) -> Result<Vec<Headline>, WebError> {
    let mut headlines = state.headlines.all().await?;
    headlines.reverse();
    Ok(headlines)
}

fn notice_for(summary: Option<varta_scrapers::RunSummary>) -> Option<String> {
    let summary = summary?;
    summary.is_degraded().then(|| {
        format!(
            "scrape incomplete: {} new items, {} source failures",
            summary.inserted, summary.failures
        )
    })
}

/// Scrape trigger and English home page. The freshness miss path runs
/// the full chain for both languages before rendering.
pub async fn home(State(state): State<Arc<AppState>>) -> HandlerResult {
    let today = state.today();
    let summary = state.manager.ensure_fresh(Language::English, today).await?;

    let mut bindings = bindings! {
        "object_list" => object_list(&state).await?,
        "date_today" => today,
    };
    if let Some(notice) = notice_for(summary) {
        bindings.insert("notice".to_string(), json!(notice));
    }
    Ok(render("home_english", bindings))
}

/// Listing page for one (language, category) pair. `object_list` keeps
/// the full reversed set the legacy templates expect; `section_list` is
/// the filtered view for this page.
pub async fn listing(
    State(state): State<Arc<AppState>>,
    Path((language, category)): Path<(String, String)>,
) -> HandlerResult {
    let Some(language) = Language::from_slug(&language) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let Some(category) = Category::from_slug(&category) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let today = state.today();
    let summary = state.manager.ensure_fresh(language, today).await?;

    let mut section_list = state
        .headlines
        .filter(
            &HeadlineFilter::new()
                .language(language)
                .category(category)
                .date(today),
        )
        .await?;
    section_list.reverse();

    let mut bindings = bindings! {
        "object_list" => object_list(&state).await?,
        "section_list" => section_list,
        "date_today" => today,
    };
    if let Some(notice) = notice_for(summary) {
        bindings.insert("notice".to_string(), json!(notice));
    }

    let view = format!("home_{}_{}", language.slug(), category.slug());
    Ok(render(&view, bindings))
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Plaintext credential login. Unknown user and wrong password get the
/// same response; the login view carries no error detail.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> HandlerResult {
    if form.username.is_empty() || form.password.is_empty() {
        return Ok(render("index", bindings! {}));
    }

    let Some(user) = state.users.authenticate(&form.username, &form.password).await? else {
        return Ok(render("index", bindings! {}));
    };

    let today = state.today();
    let bindings = bindings! {
        "object_list" => object_list(&state).await?,
        "user_language" => user.language,
        "date_today" => today,
    };
    let mut response = render("user_view", bindings);

    let token = state.sessions.create(HashMap::from([
        ("username".to_string(), user.name.clone()),
        ("language".to_string(), user.language.code().to_string()),
    ]));
    let cookie = format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, token);
    if let Ok(value) = cookie.parse() {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}

#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    language: Option<u8>,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> HandlerResult {
    if form.name.is_empty() || form.email.is_empty() || form.password.is_empty() {
        return Ok(render("index_register", bindings! {}));
    }

    let user = User {
        name: form.name,
        email: form.email,
        password: form.password,
        language: form
            .language
            .and_then(Language::from_code)
            .unwrap_or(Language::English),
    };

    match state.users.add(&user).await {
        Ok(()) => Ok(render("index", bindings! {})),
        // Duplicate name or email: back to the registration view.
        Err(Error::Auth(_)) => Ok(render("index_register", bindings! {})),
        Err(e) => Err(e.into()),
    }
}

pub async fn account(State(_state): State<Arc<AppState>>) -> HandlerResult {
    Ok(render("index_register", bindings! {}))
}

pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> HandlerResult {
    if let Some(token) = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(SessionStore::token_from_cookie)
    {
        state.sessions.remove(&token);
    }
    Ok(render("index", bindings! {}))
}

pub async fn search_page(State(state): State<Arc<AppState>>) -> HandlerResult {
    let today = state.today();
    let bindings = bindings! {
        "object_list" => object_list(&state).await?,
        "date_today" => today,
    };
    Ok(render("search", bindings))
}

#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    search_category: Option<u8>,
    #[serde(default)]
    search_lang: Option<u8>,
    #[serde(default)]
    search_title: String,
    #[serde(default)]
    search_date: String,
}

/// Rebuilds the search result set from scratch: exact match on language,
/// category and date, substring match on title.
pub async fn search_news(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> HandlerResult {
    let language = form.search_lang.and_then(Language::from_code);
    let category = form.search_category.and_then(Category::from_code);
    let date = NaiveDate::parse_from_str(&form.search_date, "%Y-%m-%d").ok();

    let results: Vec<SearchResult> = match (language, category, date) {
        (Some(language), Some(category), Some(date)) => {
            let filter = HeadlineFilter::new()
                .language(language)
                .category(category)
                .date(date);
            state
                .headlines
                .filter(&filter)
                .await?
                .iter()
                .filter(|h| h.title.contains(&form.search_title))
                .map(SearchResult::from)
                .collect()
        }
        // An unparsable scope matches nothing; the set is still reset.
        _ => Vec::new(),
    };

    state.searches.replace_all(results).await?;

    let bindings = bindings! {
        "object_list" => object_list(&state).await?,
        "object_search" => state.searches.all().await?,
        "date_today" => state.today(),
    };
    Ok(render("search_news", bindings))
}

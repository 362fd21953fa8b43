//! Static form page
//!
//! The Telegram Mini-App form (markup, styles and script) is compiled into
//! the binary and assembled once at startup. Handlers serve it from memory.

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};

use crate::server::ServerState;

const INDEX_HTML: &str = include_str!("assets/index.html");
const STYLES_CSS: &str = include_str!("assets/styles.css");
const SCRIPT_JS: &str = include_str!("assets/script.js");

/// Immutable page content held for the process lifetime
#[derive(Debug)]
pub struct FormPage {
    pub html: String,
    pub css: String,
    pub js: String,
}

impl FormPage {
    pub fn load() -> Arc<Self> {
        Arc::new(Self {
            html: INDEX_HTML.trim().to_string(),
            css: STYLES_CSS.trim().to_string(),
            js: SCRIPT_JS.trim().to_string(),
        })
    }
}

/// `GET /`
pub async fn index_page(State(state): State<ServerState>) -> Html<String> {
    Html(state.page.html.clone())
}

/// `GET /static/styles.css`
pub async fn styles(State(state): State<ServerState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.page.css.clone(),
    )
}

/// `GET /static/script.js`
pub async fn script(State(state): State<ServerState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        state.page.js.clone(),
    )
}

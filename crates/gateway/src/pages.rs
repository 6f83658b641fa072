//! Embedded UI pages and assets.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use rust_embed::RustEmbed;
use std::sync::Arc;

use crate::server::AppState;

/// Where a successful login lands.
pub const APP_PATH: &str = "/app";
/// Landing page with the password form.
pub const LANDING_PATH: &str = "/";

/// Public scripts and styles served under `/assets`.
#[derive(RustEmbed)]
#[folder = "static"]
struct Asset;

/// HTML pages, reachable only through the gated page handlers.
#[derive(RustEmbed)]
#[folder = "pages"]
struct Page;

fn respond(path: &str, file: Option<rust_embed::EmbeddedFile>) -> Response {
    match file {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

fn page(name: &str) -> Response {
    respond(name, Page::get(name))
}

fn asset(path: &str) -> Response {
    respond(path, Asset::get(path))
}

/// `GET /`
pub(crate) async fn landing_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    if state.gate.is_authenticated(&jar) {
        return Redirect::to(APP_PATH).into_response();
    }
    page("index.html")
}

/// `GET /app`
pub(crate) async fn app_handler(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if !state.gate.is_authenticated(&jar) {
        return Redirect::to(LANDING_PATH).into_response();
    }
    page("app.html")
}

/// `GET /assets/*path`
pub(crate) async fn asset_handler(Path(path): Path<String>) -> Response {
    asset(&path)
}

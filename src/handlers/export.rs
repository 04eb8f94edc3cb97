use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::services::{render_html, CatalogService, Locale};
use crate::state::AppState;

/// Cookie consulted when the request names no locale
pub const LOCALE_COOKIE: &str = "locale";

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    /// APIs to include, in document order
    #[serde(default)]
    pub api_ids: Vec<i32>,
    /// `en` or `zh`
    pub locale: Option<String>,
}

/// Export APIs as a standalone HTML document
#[utoipa::path(
    post,
    path = "/api/export",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "HTML document", content_type = "text/html", body = String),
        (status = 400, description = "No APIs selected")
    ),
    tag = "Export"
)]
pub async fn export_apis(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<ExportRequest>,
) -> AppResult<Response> {
    if payload.api_ids.is_empty() {
        return Err(AppError::Validation("No APIs selected".to_string()));
    }

    let locale = payload
        .locale
        .as_deref()
        .or_else(|| jar.get(LOCALE_COOKIE).map(|c| c.value()))
        .map(Locale::parse)
        .unwrap_or_default();

    let entries = CatalogService::export_entries(&state.db, &payload.api_ids).await?;
    let html = render_html(&entries, locale, time::OffsetDateTime::now_utc())?;

    tracing::info!(apis = entries.len(), locale = locale.as_str(), "Export rendered");
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"api-docs.html\""),
        ],
        html,
    )
        .into_response())
}

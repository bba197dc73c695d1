//! HTTP request handlers for the NOTAM board.

use std::sync::Arc;
use std::time::UNIX_EPOCH;

use axum::{
    extract::{Extension, Path, Query},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use notam_common::{DayKey, RawNotam};

use crate::page::{render_page, FormState, PageContext};
use crate::render_jobs::spawn_render;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub day: Option<String>,
}

/// Form body of every page action; which fields are present depends on
/// which button (`btn`) submitted the form.
#[derive(Debug, Default, Deserialize)]
pub struct ActionForm {
    pub btn: Option<String>,
    pub day: Option<String>,
    pub ident: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub rad: Option<String>,
    pub orig_ident: Option<String>,
    pub orig_lat: Option<String>,
    pub orig_lon: Option<String>,
    pub orig_rad: Option<String>,
}

impl ActionForm {
    fn fields(&self) -> (&str, &str, &str, &str) {
        (
            self.ident.as_deref().unwrap_or(""),
            self.lat.as_deref().unwrap_or(""),
            self.lon.as_deref().unwrap_or(""),
            self.rad.as_deref().unwrap_or(""),
        )
    }

    fn original(&self) -> RawNotam {
        RawNotam::new(
            self.orig_ident.as_deref().unwrap_or(""),
            self.orig_lat.as_deref().unwrap_or(""),
            self.orig_lon.as_deref().unwrap_or(""),
            self.orig_rad.as_deref().unwrap_or(""),
        )
    }
}

#[instrument(skip(state))]
pub async fn home_get(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<HomeQuery>,
) -> Html<String> {
    let (day, notice) = select_day(query.day.as_deref());
    respond(&state, day, FormState::default(), notice).await
}

#[instrument(skip(state, form))]
pub async fn home_post(
    Extension(state): Extension<Arc<AppState>>,
    Form(form): Form<ActionForm>,
) -> Html<String> {
    match form.btn.as_deref() {
        Some("today") => respond(&state, DayKey::today_utc(), FormState::default(), None).await,
        Some("date") => {
            let (day, notice) = select_day(form.day.as_deref());
            respond(&state, day, FormState::default(), notice).await
        }
        Some("add") => handle_add(&state, &form).await,
        Some("del") => handle_delete(&state, &form).await,
        Some("upd") => handle_update(&state, &form).await,
        Some("plot") => handle_plot(&state, &form).await,
        other => {
            warn!(btn = ?other, "Unknown form action");
            respond(&state, DayKey::today_utc(), FormState::default(), None).await
        }
    }
}

/// Resolve the requested day, falling back to UTC today with a notice when
/// the input does not parse.
fn select_day(raw: Option<&str>) -> (DayKey, Option<String>) {
    match raw {
        None => (DayKey::today_utc(), None),
        Some(s) if s.trim().is_empty() => (DayKey::today_utc(), None),
        Some(s) => match s.parse::<DayKey>() {
            Ok(day) => (day, None),
            Err(_) => (
                DayKey::today_utc(),
                Some(format!("Invalid day '{}' (expected YYYY-MM-DD); showing today.", s)),
            ),
        },
    }
}

async fn handle_add(state: &Arc<AppState>, form: &ActionForm) -> Html<String> {
    let (day, day_notice) = select_day(form.day.as_deref());
    let (ident, lat, lon, rad) = form.fields();

    match notam_common::parse_fields(ident, lat, lon, rad) {
        Ok(notam) => {
            let notice = match state.store.add(day, &notam).await {
                Ok(()) => {
                    info!(day = %day, ident = %notam.ident(), "NOTAM added");
                    day_notice
                }
                Err(e) => {
                    error!(day = %day, error = %e, "Failed to persist NOTAM");
                    Some("Failed to save the NOTAM; nothing was recorded. Check the server logs.".to_string())
                }
            };
            respond(state, day, FormState::default(), notice).await
        }
        Err(e) => {
            // Re-render with the submitted values preserved and the error
            // attached to the failing field.
            let mut form_state = FormState {
                ident: ident.to_string(),
                lat: lat.to_string(),
                lon: lon.to_string(),
                rad: rad.to_string(),
                ..FormState::default()
            };
            form_state.errors.set(e.field, e.reason.clone());
            respond(state, day, form_state, day_notice).await
        }
    }
}

async fn handle_delete(state: &Arc<AppState>, form: &ActionForm) -> Html<String> {
    let (day, day_notice) = select_day(form.day.as_deref());
    let (ident, lat, lon, rad) = form.fields();
    let target = RawNotam::new(ident, lat, lon, rad);

    let notice = match state.store.delete(day, &target).await {
        Ok(true) => {
            info!(day = %day, ident = %target.ident, "NOTAM deleted");
            day_notice
        }
        Ok(false) => Some("That NOTAM is no longer in the list.".to_string()),
        Err(e) => {
            error!(day = %day, error = %e, "Failed to delete NOTAM");
            Some("Failed to delete the NOTAM; the list is unchanged.".to_string())
        }
    };
    respond(state, day, FormState::default(), notice).await
}

async fn handle_update(state: &Arc<AppState>, form: &ActionForm) -> Html<String> {
    let (day, day_notice) = select_day(form.day.as_deref());
    let (ident, lat, lon, rad) = form.fields();

    let replacement = match notam_common::parse_fields(ident, lat, lon, rad) {
        Ok(notam) => notam,
        Err(e) => {
            let notice = Some(format!("Update rejected: {}.", e));
            return respond(state, day, FormState::default(), notice).await;
        }
    };

    let notice = match state.store.update(day, &form.original(), &replacement).await {
        Ok(true) => {
            info!(day = %day, ident = %replacement.ident(), "NOTAM updated");
            day_notice
        }
        Ok(false) => Some("That NOTAM is no longer in the list; nothing was updated.".to_string()),
        Err(e) => {
            error!(day = %day, error = %e, "Failed to update NOTAM");
            Some("Failed to update the NOTAM; the list is unchanged.".to_string())
        }
    };
    respond(state, day, FormState::default(), notice).await
}

async fn handle_plot(state: &Arc<AppState>, form: &ActionForm) -> Html<String> {
    let (day, day_notice) = select_day(form.day.as_deref());

    let notice = match state.store.get_day(day).await {
        Ok(list) if list.is_empty() => {
            // Normal branch, not a render error: the page shows the blank
            // base map for a day with nothing to plot.
            Some("No NOTAMs to plot for this day; showing the blank map.".to_string())
        }
        Ok(_) => {
            spawn_render(state.clone(), day);
            day_notice
        }
        Err(e) => {
            error!(day = %day, error = %e, "Failed to load NOTAMs for plot");
            Some("Failed to load the day's NOTAMs; nothing was plotted.".to_string())
        }
    };
    respond(state, day, FormState::default(), notice).await
}

/// Build the page for the selected day.
async fn respond(
    state: &Arc<AppState>,
    day: DayKey,
    form: FormState,
    mut notice: Option<String>,
) -> Html<String> {
    let notams = match state.store.get_day(day).await {
        Ok(list) => list,
        Err(e) => {
            error!(day = %day, error = %e, "Failed to load day");
            if notice.is_none() {
                notice = Some("Failed to load the day's NOTAMs.".to_string());
            }
            Vec::new()
        }
    };

    let ctx = PageContext {
        day,
        notams: &notams,
        image_ts: image_mtime_millis(state, day).await,
        render_status: state.renders.status(day),
        notice,
        fallback_name: state.style().base_map_name(),
        form,
    };
    Html(render_page(&ctx))
}

/// Cache-busting marker for the day's plot: its mtime in unix millis, or 0
/// when no plot exists yet.
async fn image_mtime_millis(state: &Arc<AppState>, day: DayKey) -> u64 {
    let path = state.renderer.image_path(day);
    match tokio::fs::metadata(&path).await {
        Ok(meta) => meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
        Err(_) => 0,
    }
}

/// Serve base maps and rendered plots from the image directory.
#[instrument(skip(state))]
pub async fn image_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(file): Path<String>,
) -> Response {
    // Only bare PNG file names; no traversal out of the image directory.
    if file.contains('/') || file.contains('\\') || file.contains("..") || !file.ends_with(".png") {
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = state.renderer.config().image_dir.join(&file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "image/png"),
                // The ts query parameter handles freshness; the browser must
                // revalidate rather than serve a stale plot.
                (header::CACHE_CONTROL, "no-cache"),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

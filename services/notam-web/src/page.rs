//! HTML page construction for the NOTAM board.
//!
//! The service serves a single page: day selection, the day's NOTAM table
//! (with per-row update/delete), the add form with inline per-field errors,
//! and the rendered plot. The page is assembled in-process; the document is
//! small and regular enough that a template engine would be more machinery
//! than markup.

use std::fmt::Write;

use notam_common::{DayKey, FieldName, Notam};

use crate::render_jobs::RenderStatus;

/// Preserved add-form input plus per-field validation errors.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub ident: String,
    pub lat: String,
    pub lon: String,
    pub rad: String,
    pub errors: FieldErrors,
}

/// Inline errors keyed by form field (the `invalid-feedback` pattern).
#[derive(Debug, Clone, Default)]
pub struct FieldErrors {
    pub ident: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub rad: Option<String>,
}

impl FieldErrors {
    pub fn set(&mut self, field: FieldName, reason: impl Into<String>) {
        let slot = match field {
            FieldName::Ident => &mut self.ident,
            FieldName::Lat => &mut self.lat,
            FieldName::Lon => &mut self.lon,
            FieldName::Rad => &mut self.rad,
        };
        *slot = Some(reason.into());
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        match field {
            FieldName::Ident => self.ident.as_deref(),
            FieldName::Lat => self.lat.as_deref(),
            FieldName::Lon => self.lon.as_deref(),
            FieldName::Rad => self.rad.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ident.is_none() && self.lat.is_none() && self.lon.is_none() && self.rad.is_none()
    }
}

/// Everything the page template needs for one response.
#[derive(Debug)]
pub struct PageContext<'a> {
    pub day: DayKey,
    pub notams: &'a [Notam],
    /// Cache-busting marker: the plot file's mtime in unix millis, 0 when no
    /// plot exists yet.
    pub image_ts: u64,
    pub render_status: RenderStatus,
    /// One-shot outcome message (store failures, not-found notices, ...).
    pub notice: Option<String>,
    /// Blank base map file name, the `<img onerror>` fallback.
    pub fallback_name: String,
    pub form: FormState,
}

/// Escape text for HTML element and attribute content.
fn escape(s: &str) -> String {
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

const STYLE_SHEET: &str = "\
body{font-family:sans-serif;margin:1.5em auto;max-width:1100px;padding:0 1em;}\
table{border-collapse:collapse;margin:1em 0;}\
th,td{border:1px solid #ccc;padding:0.3em 0.6em;text-align:left;}\
input{font-family:monospace;}\
input.is-invalid{border-color:#dc3545;outline-color:#dc3545;}\
.invalid-feedback{color:#dc3545;font-size:0.85em;display:block;}\
.notice{background:#fff3cd;border:1px solid #ffc107;padding:0.5em 1em;margin:1em 0;}\
.render-failed{background:#f8d7da;border-color:#dc3545;}\
img.plot{max-width:100%;border:1px solid #888;margin-top:1em;}";

/// Render the full page for one request.
pub fn render_page(ctx: &PageContext) -> String {
    let day = escape(&ctx.day.to_string());
    let mut html = String::with_capacity(8192);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    let _ = write!(html, "<title>{} NOTAMs</title>\n", day);
    let _ = write!(html, "<style>{}</style>\n", STYLE_SHEET);
    html.push_str("</head>\n<body>\n");
    let _ = write!(html, "<h1>GPS NOTAMs &mdash; {}</h1>\n", day);

    push_notices(&mut html, ctx);
    push_day_form(&mut html, &day);
    push_notam_table(&mut html, ctx, &day);
    push_add_form(&mut html, ctx, &day);
    push_plot(&mut html, ctx, &day);

    html.push_str("</body>\n</html>\n");
    html
}

fn push_notices(html: &mut String, ctx: &PageContext) {
    if let Some(notice) = &ctx.notice {
        let _ = write!(html, "<div class=\"notice\">{}</div>\n", escape(notice));
    }
    match &ctx.render_status {
        RenderStatus::Idle => {}
        RenderStatus::Pending => {
            html.push_str(
                "<div class=\"notice\">Rendering in progress &mdash; reload to refresh the plot.</div>\n",
            );
        }
        RenderStatus::Failed(msg) => {
            let _ = write!(
                html,
                "<div class=\"notice render-failed\">Last render failed: {}. The previous plot (if any) is unchanged.</div>\n",
                escape(msg)
            );
        }
    }
}

fn push_day_form(html: &mut String, day: &str) {
    html.push_str("<form method=\"post\" action=\"/\">\n");
    let _ = write!(
        html,
        "<label>Day <input type=\"text\" name=\"day\" value=\"{}\" placeholder=\"YYYY-MM-DD\"></label>\n",
        day
    );
    html.push_str("<button name=\"btn\" value=\"date\">Change Day</button>\n");
    html.push_str("<button name=\"btn\" value=\"today\">Today</button>\n");
    html.push_str("<button name=\"btn\" value=\"plot\">Plot</button>\n");
    html.push_str("</form>\n");
}

fn push_notam_table(html: &mut String, ctx: &PageContext, day: &str) {
    if ctx.notams.is_empty() {
        html.push_str("<p>No NOTAMs recorded for this day.</p>\n");
        return;
    }

    html.push_str("<table>\n<tr><th>Ident</th><th>Latitude</th><th>Longitude</th><th>Radius</th><th></th></tr>\n");
    for notam in ctx.notams {
        let raw = notam.raw();
        let (ident, lat, lon, rad) = (
            escape(&raw.ident),
            escape(&raw.lat),
            escape(&raw.lon),
            escape(&raw.rad),
        );
        html.push_str("<tr><form method=\"post\" action=\"/\">\n");
        let _ = write!(html, "<input type=\"hidden\" name=\"day\" value=\"{}\">\n", day);
        for (name, value) in [
            ("orig_ident", &ident),
            ("orig_lat", &lat),
            ("orig_lon", &lon),
            ("orig_rad", &rad),
        ] {
            let _ = write!(
                html,
                "<input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
                name, value
            );
        }
        for (name, value, size) in [
            ("ident", &ident, 12),
            ("lat", &lat, 8),
            ("lon", &lon, 8),
            ("rad", &rad, 7),
        ] {
            let _ = write!(
                html,
                "<td><input type=\"text\" name=\"{}\" value=\"{}\" size=\"{}\"></td>",
                name, value, size
            );
        }
        html.push_str(
            "<td><button name=\"btn\" value=\"upd\">Update</button> \
             <button name=\"btn\" value=\"del\">Delete</button></td>\n",
        );
        html.push_str("</form></tr>\n");
    }
    html.push_str("</table>\n");
}

fn push_add_form(html: &mut String, ctx: &PageContext, day: &str) {
    html.push_str("<h2>Add NOTAM</h2>\n<form method=\"post\" action=\"/\">\n");
    let _ = write!(html, "<input type=\"hidden\" name=\"day\" value=\"{}\">\n", day);

    let fields = [
        (FieldName::Ident, "Ident", &ctx.form.ident, "e.g. FDC 4/1234"),
        (FieldName::Lat, "Latitude", &ctx.form.lat, "DDMMSS[N|S]"),
        (FieldName::Lon, "Longitude", &ctx.form.lon, "[D]DDMMSS[E|W]"),
        (FieldName::Rad, "Radius", &ctx.form.rad, "1-99999[NM]"),
    ];
    for (field, label, value, placeholder) in fields {
        let error = ctx.form.errors.get(field);
        let class = if error.is_some() { " class=\"is-invalid\"" } else { "" };
        let _ = write!(
            html,
            "<label>{} <input type=\"text\" name=\"{}\" value=\"{}\" placeholder=\"{}\"{}></label>\n",
            label,
            field.as_str(),
            escape(value),
            placeholder,
            class
        );
        if let Some(reason) = error {
            let _ = write!(
                html,
                "<span class=\"invalid-feedback\">{}</span>\n",
                escape(reason)
            );
        }
    }
    html.push_str("<button name=\"btn\" value=\"add\">Add NOTAM</button>\n</form>\n");
}

fn push_plot(html: &mut String, ctx: &PageContext, day: &str) {
    let fallback = escape(&ctx.fallback_name);
    // The cache-busting ts changes exactly when the plot is regenerated; a
    // missing dated plot 404s and the onerror handler swaps in the blank
    // base map.
    let _ = write!(
        html,
        "<img class=\"plot\" src=\"/images/{}_notams.png?ts={}\" alt=\"{} NOTAM plot\" \
         onerror=\"this.onerror=null;this.src='/images/{}';\">\n",
        day, ctx.image_ts, day, fallback
    );
}

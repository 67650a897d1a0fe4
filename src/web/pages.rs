//! Minimal HTML pages. All interpolated text is escaped.

use super::session::HistoryEntry;
use super::RadioTranslation;
use chrono::{DateTime, Utc};
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem}\
textarea{width:100%;height:24rem}\
.error{color:#b00020}\
.notice{color:#555}\
li{margin:.3rem 0}";

/// State shown on the transcript form page.
#[derive(Debug, Default)]
pub struct IndexView<'a> {
    pub submitted_url: &'a str,
    pub transcript: Option<&'a str>,
    pub error: Option<&'a str>,
    pub translated: bool,
    pub history: &'a [HistoryEntry],
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        STYLE,
        body
    )
}

pub fn index_page(view: &IndexView<'_>) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>YouTube transcript</h1>");
    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"/process\">\n\
         <input type=\"text\" name=\"youtube_url\" size=\"60\" placeholder=\"https://www.youtube.com/watch?v=...\" value=\"{}\">\n\
         <button type=\"submit\">Get transcript</button>\n</form>",
        escape(view.submitted_url)
    );

    if let Some(error) = view.error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape(error));
    }

    if let Some(transcript) = view.transcript {
        if view.translated {
            let _ = writeln!(body, "<p class=\"notice\">Translated transcript</p>");
        }
        let _ = writeln!(
            body,
            "<textarea id=\"transcript\" readonly>{}</textarea>",
            escape(transcript)
        );
    }

    if !view.history.is_empty() {
        let _ = writeln!(body, "<h2>History</h2>\n<ul>");
        for entry in view.history {
            let _ = writeln!(
                body,
                "<li><a href=\"/replay/{}\">{}</a> <span class=\"notice\">{}</span></li>",
                escape(&entry.video_id),
                escape(&entry.title),
                escape(&entry.url)
            );
        }
        let _ = writeln!(body, "</ul>");
    }

    let _ = writeln!(
        body,
        "<p><a href=\"/f1translations\">Team radio translations</a></p>"
    );

    layout("Prepis", &body)
}

pub fn radio_page(translations: &[RadioTranslation]) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>Team radio translations</h1>");

    if translations.is_empty() {
        let _ = writeln!(body, "<p class=\"notice\">No translations received yet.</p>");
    } else {
        let _ = writeln!(body, "<ul>");
        for t in translations {
            let _ = writeln!(
                body,
                "<li><span class=\"notice\">{}</span><br>{}<br><strong>{}</strong></li>",
                escape(&format_timestamp(t.timestamp)),
                escape(&t.english),
                escape(&t.slovak)
            );
        }
        let _ = writeln!(body, "</ul>");
    }
    let _ = writeln!(body, "<p><a href=\"/\">Back</a></p>");

    layout("Team radio", &body)
}

fn format_timestamp(unix_seconds: f64) -> String {
    DateTime::<Utc>::from_timestamp(unix_seconds as i64, 0)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

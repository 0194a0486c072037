//! Embedded static assets served from the root catch-all.

use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

const STYLE_CSS: &str = include_str!("../assets/style.css");

/// Embedded asset lookup, path → (content type, body).
fn lookup(file: &str) -> Option<(&'static str, &'static str)> {
    match file {
        "style.css" => Some(("text/css", STYLE_CSS)),
        _ => None,
    }
}

pub(crate) async fn serve(Path(file): Path<String>) -> Response {
    match lookup(&file) {
        Some((content_type, body)) => {
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        None => not_found().await.into_response(),
    }
}

pub(crate) async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheet_is_embedded() {
        let (content_type, body) = lookup("style.css").unwrap();
        assert_eq!(content_type, "text/css");
        assert!(!body.is_empty());
    }

    #[test]
    fn unknown_assets_miss() {
        assert!(lookup("style.css.bak").is_none());
        assert!(lookup("").is_none());
    }
}

use axum::{
    body::Body,
    http::{StatusCode, Uri, header},
    response::IntoResponse,
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets"]
struct Asset;

pub async fn serve_asset(uri: Uri) -> impl IntoResponse {
    let mut path = uri.path().trim_start_matches('/').to_string();

    if path.is_empty() {
        path = "index.html".to_string();
    }

    if let Some(content) = Asset::get(&path) {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        return (
            [(header::CONTENT_TYPE, mime.as_ref())],
            Body::from(content.data),
        )
            .into_response();
    }

    // Directory-style paths such as /admin resolve to their index page.
    let index = format!("{}/index.html", path.trim_end_matches('/'));
    if let Some(content) = Asset::get(&index) {
        return (
            [(header::CONTENT_TYPE, mime_guess::mime::TEXT_HTML_UTF_8.as_ref())],
            Body::from(content.data),
        )
            .into_response();
    }

    if let Some(content) = Asset::get("index.html") {
        let mime = mime_guess::from_path("index.html").first_or_octet_stream();
        (
            [(header::CONTENT_TYPE, mime.as_ref())],
            Body::from(content.data),
        )
            .into_response()
    } else {
        (StatusCode::NOT_FOUND, "404 Not Found").into_response()
    }
}

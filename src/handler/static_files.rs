//! Static file serving module
//!
//! Resolves a request against the root directory and produces the file,
//! a directory redirect/index/listing, a 304, or an error page.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::path::translate_path;
use crate::handler::router::RequestContext;
use crate::http::{self, date, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Serve whatever the request path maps to under the root directory
pub async fn serve_path(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let target = translate_path(&state.root, ctx.path);

    let metadata = match fs::metadata(&target).await {
        Ok(m) => m,
        Err(e) => return io_error_response(ctx, &target, &e),
    };

    if metadata.is_dir() {
        return serve_directory(ctx, state, &target).await;
    }

    // A trailing slash names a directory; a file never matches it
    if ctx.path.ends_with('/') {
        return not_found(ctx);
    }

    serve_file(ctx, &target, &metadata).await
}

/// Redirect to the slash form, then try index files, then list
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
) -> Response<Full<Bytes>> {
    if !ctx.path.ends_with('/') {
        // A leading "//" would make the Location protocol-relative
        let path = ctx.path.trim_start_matches('/');
        let location = match ctx.query {
            Some(q) => format!("/{path}/?{q}"),
            None => format!("/{path}/"),
        };
        return http::build_redirect_response(&location);
    }

    for index_file in &state.index_files {
        let index_path = dir.join(index_file);
        if let Ok(m) = fs::metadata(&index_path).await {
            if m.is_file() {
                return serve_file(ctx, &index_path, &m).await;
            }
        }
    }

    listing::serve_listing(ctx, dir).await
}

/// Serve a regular file, honoring `If-Modified-Since`
async fn serve_file(
    ctx: &RequestContext<'_>,
    file_path: &Path,
    metadata: &std::fs::Metadata,
) -> Response<Full<Bytes>> {
    let modified = metadata.modified().ok();

    // If-None-Match takes precedence and ETags are never issued, so skip
    if !ctx.has_if_none_match {
        if let (Some(since), Some(mtime)) = (ctx.if_modified_since, modified) {
            if date::not_modified_since(mtime, since) {
                return http::build_304_response();
            }
        }
    }

    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => return io_error_response(ctx, file_path, &e),
    };

    let last_modified = modified.map(date::format_http_date);
    http::build_file_response(
        Bytes::from(content),
        mime::guess_content_type(file_path),
        last_modified.as_deref(),
        ctx.is_head,
    )
}

/// Missing paths are 404; every other I/O failure is a 500
fn io_error_response(
    ctx: &RequestContext<'_>,
    path: &Path,
    err: &std::io::Error,
) -> Response<Full<Bytes>> {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::NotADirectory => not_found(ctx),
        _ => {
            logger::log_error(&format!(
                "Failed to read '{}': {err}",
                path.display()
            ));
            http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR, None, ctx.is_head)
        }
    }
}

fn not_found(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    http::build_error_response(StatusCode::NOT_FOUND, Some("File not found"), ctx.is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::header::{CONTENT_TYPE, LAST_MODIFIED, LOCATION};

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            query: None,
            is_head: false,
            if_modified_since: None,
            has_if_none_match: false,
        }
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn site() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();
        std::fs::create_dir_all(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/site.css"), "body{}").unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.htm"), "docs").unwrap();
        let state = AppState::with_root(dir.path(), false).unwrap();
        (dir, state)
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let (_dir, state) = site();
        let resp = serve_path(&ctx("/"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key(LAST_MODIFIED));
        assert_eq!(body_string(resp).await, "<h1>hi</h1>");
    }

    #[tokio::test]
    async fn test_index_htm_fallback() {
        let (_dir, state) = site();
        let resp = serve_path(&ctx("/docs/"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "docs");
    }

    #[tokio::test]
    async fn test_directory_redirect_keeps_query() {
        let (_dir, state) = site();
        let mut c = ctx("/docs");
        c.query = Some("v=2");
        let resp = serve_path(&c, &state).await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/docs/?v=2");
    }

    #[tokio::test]
    async fn test_directory_redirect_stays_on_host() {
        let (dir, state) = site();
        std::fs::create_dir(dir.path().join("evil.example")).unwrap();

        let resp = serve_path(&ctx("//evil.example"), &state).await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/evil.example/");

        let resp = serve_path(&ctx("///docs"), &state).await;
        assert_eq!(resp.headers()[LOCATION], "/docs/");
    }

    #[tokio::test]
    async fn test_directory_listing() {
        let (_dir, state) = site();
        let resp = serve_path(&ctx("/css/"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        let body = body_string(resp).await;
        assert!(body.contains("Directory listing for /css/"));
        assert!(body.contains("<a href=\"site.css\">site.css</a>"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let (_dir, state) = site();
        let resp = serve_path(&ctx("/nope.js"), &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash() {
        let (_dir, state) = site();
        let resp = serve_path(&ctx("/index.html/"), &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_path_below_file() {
        let (_dir, state) = site();
        let resp = serve_path(&ctx("/index.html/extra"), &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_if_modified_since() {
        let (_dir, state) = site();
        let mut c = ctx("/css/site.css");
        c.if_modified_since = Some("Fri, 01 Jan 2100 00:00:00 GMT");
        assert_eq!(serve_path(&c, &state).await.status(), StatusCode::NOT_MODIFIED);

        c.if_modified_since = Some("Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(serve_path(&c, &state).await.status(), StatusCode::OK);

        c.if_modified_since = Some("Fri, 01 Jan 2100 00:00:00 GMT");
        c.has_if_none_match = true;
        assert_eq!(serve_path(&c, &state).await.status(), StatusCode::OK);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_file_is_server_error() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, state) = site();
        let secret = dir.path().join("secret.txt");
        std::fs::write(&secret, "x").unwrap();
        std::fs::set_permissions(&secret, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits, so only check when the read really fails
        if std::fs::read(&secret).is_err() {
            let resp = serve_path(&ctx("/secret.txt"), &state).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

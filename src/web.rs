//! Three-route HTTP/1 server on hyper.
//!
//! `/home` and `/about` match exactly. `/` is a catch-all: anything else lands
//! on the root handler.

use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::fs;
use tokio::net::TcpListener;

use crate::config::ServerConfig;

pub const ROOT_TEXT: &str = "Web services are easy with Go!";
pub const NOT_FOUND_TEXT: &str = "404 page not found\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Home,
    About,
}

impl Route {
    pub fn resolve(path: &str) -> Self {
        match path {
            "/home" => Route::Home,
            "/about" => Route::About,
            _ => Route::Root,
        }
    }
}

/// What the handlers serve.
#[derive(Debug, Clone)]
pub struct Site {
    pub home_page: PathBuf,
    pub about_html: String,
}

impl Site {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            home_page: config.home_page.clone(),
            about_html: config.about_html.clone(),
        }
    }
}

fn respond(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(body.into()));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

async fn serve_file(path: &Path) -> Response<Full<Bytes>> {
    match fs::read(path).await {
        Ok(contents) => respond(StatusCode::OK, content_type_for(path), contents),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "home page not found");
            respond(StatusCode::NOT_FOUND, "text/plain; charset=utf-8", NOT_FOUND_TEXT)
        }
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "failed to read home page");
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                "text/plain; charset=utf-8",
                "500 internal server error\n",
            )
        }
    }
}

/// Service function: any method, routed by path only.
pub async fn handle<B>(req: Request<B>, site: Arc<Site>) -> Result<Response<Full<Bytes>>, Infallible> {
    let route = Route::resolve(req.uri().path());
    tracing::debug!(method = %req.method(), path = req.uri().path(), ?route, "request");

    let resp = match route {
        Route::Root => respond(StatusCode::OK, "text/plain; charset=utf-8", ROOT_TEXT),
        Route::Home => serve_file(&site.home_page).await,
        Route::About => respond(
            StatusCode::OK,
            "text/html; charset=utf-8",
            site.about_html.clone(),
        ),
    };
    Ok(resp)
}

/// Accept loop. Each connection gets its own task; returns once `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, site: Site, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()>,
{
    let site = Arc::new(site);
    tokio::pin!(shutdown);

    loop {
        let (tcp, peer) = tokio::select! {
            accepted = listener.accept() => accepted?,
            _ = &mut shutdown => {
                tracing::info!("server shutting down");
                return Ok(());
            }
        };
        let io = TokioIo::new(tcp);
        let site = Arc::clone(&site);

        tokio::task::spawn(async move {
            let service = service_fn(move |req| handle(req, Arc::clone(&site)));
            if let Err(err) = http1::Builder::new()
                .timer(TokioTimer::new())
                .serve_connection(io, service)
                .await
            {
                tracing::warn!(%peer, error = ?err, "error serving connection");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{BodyExt, Empty};

    fn site(home_page: PathBuf) -> Arc<Site> {
        Arc::new(Site {
            home_page,
            about_html: "<h1>About Page</h1>".to_string(),
        })
    }

    async fn get(path: &str, site: Arc<Site>) -> (StatusCode, String) {
        let req = Request::builder()
            .uri(path)
            .body(Empty::<Bytes>::new())
            .unwrap();
        let resp = handle(req, site).await.unwrap();
        let status = resp.status();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn routes_resolve_exactly() {
        assert_eq!(Route::resolve("/"), Route::Root);
        assert_eq!(Route::resolve("/home"), Route::Home);
        assert_eq!(Route::resolve("/about"), Route::About);
        assert_eq!(Route::resolve("/home/"), Route::Root);
        assert_eq!(Route::resolve("/anything/else"), Route::Root);
    }

    #[tokio::test]
    async fn root_is_catch_all() {
        let site = site(PathBuf::from("missing.html"));
        assert_eq!(get("/", site.clone()).await, (StatusCode::OK, ROOT_TEXT.to_string()));
        assert_eq!(get("/nope", site).await, (StatusCode::OK, ROOT_TEXT.to_string()));
    }

    #[tokio::test]
    async fn about_returns_fragment() {
        let (status, body) = get("/about", site(PathBuf::from("missing.html"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>About Page</h1>");
    }

    #[tokio::test]
    async fn home_serves_file() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("home.html");
        std::fs::write(&page, "<h1>Home</h1>").unwrap();

        let (status, body) = get("/home", site(page)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>Home</h1>");
    }

    #[tokio::test]
    async fn missing_home_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get("/home", site(dir.path().join("gone.html"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, NOT_FOUND_TEXT);
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for(Path::new("a.html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Path::new("a.bin")), "application/octet-stream");
    }
}

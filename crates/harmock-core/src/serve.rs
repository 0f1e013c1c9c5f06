//! HTTP/1.1 replay server in front of an [`InMemoryServer`].
//!
//! Each connection is served by hyper on its own task. Requests are turned
//! into [`MockRequest`]s, dispatched to the registered handlers, delayed as
//! recorded, and written back. Unmatched requests get `404 Not Found`.

use std::convert::Infallible;
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use http::header::{CONTENT_ENCODING, CONTENT_LENGTH, HOST, TRANSFER_ENCODING};
use http::request::Parts;
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::mock::{InMemoryServer, MockRequest};

/// Accepts connections on `listener` until the task is dropped.
pub async fn serve(listener: TcpListener, server: Arc<InMemoryServer>) -> Result<()> {
    let addr = listener.local_addr().context("read listener address")?;
    info!("replaying web archive on http://{}", addr);

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                error!("accept failed: {}", err);
                continue;
            }
        };
        debug!(%peer, "accepted connection");

        let server = Arc::clone(&server);
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = hyper::service::service_fn(move |request: Request<Incoming>| {
                let server = Arc::clone(&server);
                async move { Ok::<_, Infallible>(respond(&server, request).await) }
            });
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                debug!(%peer, "connection closed with error: {}", err);
            }
        });
    }
}

async fn respond(server: &InMemoryServer, request: Request<Incoming>) -> Response<Full<Bytes>> {
    let (parts, body) = request.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            warn!("failed to read request body: {}", err);
            return plain(StatusCode::BAD_REQUEST, "unreadable request body");
        }
    };

    let Some(url) = request_url(&parts) else {
        return plain(StatusCode::BAD_REQUEST, "unparseable request target");
    };

    let mock_request = MockRequest::new(parts.method, url)
        .with_headers(parts.headers)
        .with_body(body);

    let Some(mocked) = server.handle(&mock_request) else {
        warn!(
            "no recorded response for {} {}",
            mock_request.method, mock_request.url
        );
        return plain(StatusCode::NOT_FOUND, "no recorded response for this request");
    };

    if !mocked.delay.is_zero() {
        tokio::time::sleep(mocked.delay).await;
    }

    let mut response = mocked.into_http();
    // The archive stores decoded bodies; recorded framing headers no longer apply.
    for name in [CONTENT_LENGTH, CONTENT_ENCODING, TRANSFER_ENCODING] {
        response.headers_mut().remove(name);
    }
    response.map(Full::new)
}

/// Absolute URL for the request, using the `Host` header (or the URI authority).
fn request_url(parts: &Parts) -> Option<Url> {
    let host = parts
        .headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| parts.uri.authority().map(|authority| authority.as_str()))
        .unwrap_or("localhost");
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    Url::parse(&format!("http://{host}{path_and_query}")).ok()
}

fn plain(status: StatusCode, message: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(message.as_bytes())));
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(uri: &str, host: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(host) = host {
            builder = builder.header(HOST, host);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn request_url_uses_host_header() {
        let url = request_url(&parts("/users?page=2", Some("127.0.0.1:9000"))).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/users?page=2");
    }

    #[test]
    fn request_url_defaults_to_localhost() {
        let url = request_url(&parts("/", None)).unwrap();
        assert_eq!(url.as_str(), "http://localhost/");
    }
}

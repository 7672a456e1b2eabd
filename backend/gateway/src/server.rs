//! HTTP server in front of the dispatcher.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use linestash_channels::SIGNATURE_HEADER;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::dispatcher::{Dispatcher, WebhookResponse};

#[derive(Clone)]
pub struct GatewayState {
    dispatcher: Arc<Dispatcher>,
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Build the app: the webhook route plus `GET /healthz`.
pub fn router(dispatcher: Arc<Dispatcher>, webhook_path: &str) -> Router {
    Router::new()
        .route(webhook_path, post(webhook))
        .route("/healthz", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
        .with_state(GatewayState { dispatcher })
}

async fn webhook(State(state): State<GatewayState>, headers: HeaderMap, body: Bytes) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    state.dispatcher.dispatch_raw(&body, signature).await.into_response()
}

/// Serve until Ctrl-C.
pub async fn start_server(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("linestash listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use linestash_channels::sign;
    use tower::ServiceExt;

    const BODY: &str = r#"{"events":[{"type":"message","message":{"type":"text","text":"help"},"source":{"type":"user","userId":"U1"},"replyToken":"T1"}]}"#;

    fn app(harness: &Harness) -> Router {
        router(harness.dispatcher.clone(), "/callback")
    }

    #[tokio::test]
    async fn signed_post_is_accepted() {
        let harness = Harness::new();
        let request = Request::post("/callback")
            .header(SIGNATURE_HEADER, sign(Harness::SECRET, BODY.as_bytes()).unwrap())
            .body(Body::from(BODY))
            .unwrap();

        let response = app(&harness).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#""OK""#);
        assert_eq!(harness.messenger.replies().len(), 1);
    }

    #[tokio::test]
    async fn unsigned_post_is_rejected_as_text() {
        let harness = Harness::new();
        let request = Request::post("/callback").body(Body::from(BODY)).unwrap();

        let response = app(&harness).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Invalid signature");
    }

    #[tokio::test]
    async fn non_utf8_body_gets_the_dispatcher_response() {
        let harness = Harness::new();
        let raw: &'static [u8] = b"{\"events\":\"\xfe\"}";

        let unsigned = Request::post("/callback").body(Body::from(raw)).unwrap();
        let response = app(&harness).oneshot(unsigned).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Invalid signature");

        let signed = Request::post("/callback")
            .header(SIGNATURE_HEADER, sign(Harness::SECRET, raw).unwrap())
            .body(Body::from(raw))
            .unwrap();
        let response = app(&harness).oneshot(signed).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn health_check() {
        let harness = Harness::new();
        let request = Request::get("/healthz").body(Body::empty()).unwrap();
        let response = app(&harness).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

//! Webhook entry point.
//!
//! verify signature -> record raw payload -> parse -> per-event handler ->
//! reply. Every failure is mapped to a response in one place.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use linestash_channels::{LineClient, parse_webhook, verify_signature};
use linestash_config::{LogFailurePolicy, StashConfig};
use linestash_core::{
    Clock, InboundEvent, MessagingApi, ObjectStore, ReplyModel, ReplyPayload, StashError,
    SystemClock,
};
use linestash_media::MediaPersister;
use linestash_storage::{EventLogger, build_store};
use serde_json::Value;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::handlers::ReplyHandlers;
use crate::model::EchoModel;
use crate::replies::ReplyTable;

pub const ACK_MESSAGE: &str = "OK";
pub const INVALID_SIGNATURE_BODY: &str = "Invalid signature";

/// A webhook delivery as received over HTTP.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    pub body: String,
    /// Value of the `x-line-signature` header, if present.
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
    pub content_type: &'static str,
}

impl WebhookResponse {
    pub fn accepted() -> Self {
        Self {
            status: 201,
            body: Value::String(ACK_MESSAGE.to_string()).to_string(),
            content_type: "application/json",
        }
    }

    pub fn invalid_signature() -> Self {
        Self { status: 400, body: INVALID_SIGNATURE_BODY.to_string(), content_type: "text/plain" }
    }

    pub fn failure(err: &StashError) -> Self {
        Self {
            status: 500,
            body: Value::String(err.to_string()).to_string(),
            content_type: "application/json",
        }
    }

    fn from_result(result: Result<(), StashError>) -> Self {
        match result {
            Ok(()) => Self::accepted(),
            Err(err) if err.is_client_error() => Self::invalid_signature(),
            Err(err) => Self::failure(&err),
        }
    }
}

/// Collaborators the dispatcher talks to.
pub struct DispatcherDeps {
    pub messaging: Arc<dyn MessagingApi>,
    pub store: Arc<dyn ObjectStore>,
    pub model: Arc<dyn ReplyModel>,
    pub clock: Arc<dyn Clock>,
}

pub struct Dispatcher {
    channel_secret: String,
    log_failure: LogFailurePolicy,
    event_logger: EventLogger,
    handlers: ReplyHandlers,
    messaging: Arc<dyn MessagingApi>,
}

impl Dispatcher {
    pub fn new(config: &StashConfig, deps: DispatcherDeps) -> Result<Self, StashError> {
        let channel_secret = config
            .line
            .channel_secret
            .clone()
            .ok_or_else(|| StashError::Config("line.channelSecret is not set".into()))?;
        let scratch_dir: PathBuf = config.storage.scratch_dir();

        let event_logger = EventLogger::new(
            deps.store.clone(),
            deps.clock.clone(),
            &scratch_dir,
            config.storage.log_prefix.clone(),
        );
        let persister = MediaPersister::new(
            deps.messaging.clone(),
            deps.store.clone(),
            deps.clock.clone(),
            &scratch_dir,
        )
        .with_legacy_jpeg(config.storage.legacy_jpeg_content_type);
        let handlers = ReplyHandlers::new(
            ReplyTable::from_config(&config.replies),
            persister,
            deps.messaging.clone(),
            deps.model,
            config.line.loading_seconds,
        );

        Ok(Self {
            channel_secret,
            log_failure: config.dispatch.log_failure,
            event_logger,
            handlers,
            messaging: deps.messaging,
        })
    }

    /// Wire up the production collaborators from config.
    pub async fn from_config(config: &StashConfig) -> Result<Self, StashError> {
        let store = build_store(&config.storage).await?;
        let messaging = Arc::new(LineClient::from_config(&config.line)?);
        info!(store = store.name(), "Dispatcher ready");
        Self::new(
            config,
            DispatcherDeps {
                messaging,
                store,
                model: Arc::new(EchoModel),
                clock: Arc::new(SystemClock),
            },
        )
    }

    /// Handle one delivery. Never fails: errors become the response.
    pub async fn dispatch(&self, request: &WebhookRequest) -> WebhookResponse {
        let span = info_span!("webhook", request_id = %Uuid::new_v4());
        async {
            let result = self.process(request).await;
            match &result {
                Ok(()) => debug!("Webhook handled"),
                Err(e) if e.is_client_error() => warn!("Rejected webhook with invalid signature"),
                Err(e) => error!(error = %e, "Webhook handling failed"),
            }
            WebhookResponse::from_result(result)
        }
        .instrument(span)
        .await
    }

    /// Handle a delivery whose body has not been checked for UTF-8 yet.
    ///
    /// A body that is not UTF-8 is rejected as an invalid signature unless it
    /// is correctly signed, in which case it is a malformed payload.
    pub async fn dispatch_raw(&self, body: &[u8], signature: Option<String>) -> WebhookResponse {
        match std::str::from_utf8(body) {
            Ok(text) => self.dispatch(&WebhookRequest { body: text.to_string(), signature }).await,
            Err(e) => {
                let signed = signature
                    .as_deref()
                    .is_some_and(|sig| verify_signature(&self.channel_secret, body, sig));
                let err = if signed {
                    StashError::MalformedPayload(format!("body is not UTF-8: {e}"))
                } else {
                    StashError::InvalidSignature
                };
                warn!(error = %err, bytes = body.len(), "Rejected non-UTF-8 webhook body");
                WebhookResponse::from_result(Err(err))
            }
        }
    }

    async fn process(&self, request: &WebhookRequest) -> Result<(), StashError> {
        let started = Instant::now();

        let signature = request.signature.as_deref().ok_or(StashError::InvalidSignature)?;
        if !verify_signature(&self.channel_secret, request.body.as_bytes(), signature) {
            return Err(StashError::InvalidSignature);
        }

        match self.event_logger.record(&request.body).await {
            Ok(key) => debug!(key = %key, "Payload logged"),
            Err(e) if self.log_failure == LogFailurePolicy::Continue => {
                warn!(error = %e, "Payload log failed; continuing")
            }
            Err(e) => return Err(e),
        }

        let events = parse_webhook(&request.body)?;
        debug!(count = events.len(), "Parsed webhook events");
        for event in &events {
            self.handle_event(event, started).await?;
        }
        Ok(())
    }

    async fn handle_event(&self, event: &InboundEvent, started: Instant) -> Result<(), StashError> {
        if event.redelivery {
            info!(message_id = %event.message_id, "Handling redelivered event");
        }
        let Some(units) = self.handlers.handle(event, started).await? else {
            return Ok(());
        };
        let Some(token) = &event.reply_token else {
            warn!(kind = event.kind.name(), "Event has no reply token; reply dropped");
            return Ok(());
        };
        let payload = ReplyPayload::new(token.clone(), units)?;
        self.messaging.reply(payload).await?;
        info!(kind = event.kind.name(), source = event.source.kind(), "Replied");
        Ok(())
    }
}

use thiserror::Error;

/// Error taxonomy for webhook handling.
///
/// Only `InvalidSignature` is answered with a client error; everything else
/// surfaces as a generic server failure for the request.
#[derive(Debug, Error)]
pub enum StashError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("unknown source kind: {0}")]
    UnknownSourceKind(String),

    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),

    #[error("failed to download content for message {message_id}: {reason}")]
    DownloadFailed { message_id: String, reason: String },

    #[error("failed to upload object {key}: {reason}")]
    UploadFailed { key: String, reason: String },

    #[error("reply failed: {0}")]
    ReplyFailed(String),

    #[error("reply carries {0} message units, at most 5 are allowed")]
    ReplyTooLarge(usize),

    #[error("scratch file error: {0}")]
    Scratch(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl StashError {
    /// True when the request itself should be rejected rather than failed.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StashError::InvalidSignature)
    }
}

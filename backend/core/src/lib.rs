pub mod artifact;
pub mod error;
pub mod event;
pub mod message;
pub mod traits;

pub use artifact::{artifact_stamp, log_key, media_file_name, media_key, ARTIFACT_STAMP_FORMAT};
pub use error::StashError;
pub use event::{InboundEvent, MediaKind, MessageKind, Source};
pub use message::{Emoji, ReplyPayload, ReplyUnit, MAX_REPLY_UNITS};
pub use traits::{Clock, MessagingApi, ObjectStore, ReplyModel, SystemClock};

pub type Result<T, E = StashError> = std::result::Result<T, E>;

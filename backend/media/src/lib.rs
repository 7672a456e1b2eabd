pub mod mime_detect;
pub mod persister;

pub use mime_detect::{LEGACY_MEDIA_CONTENT_TYPE, content_type_for, upload_content_type};
pub use persister::{MediaPersister, StoredMedia};

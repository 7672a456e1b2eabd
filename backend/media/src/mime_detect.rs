//! MIME types for persisted media.
//!
//! Used by the persister to label stored objects.

use linestash_core::MediaKind;

/// Every media object was tagged with this before per-kind types existed.
pub const LEGACY_MEDIA_CONTENT_TYPE: &str = "image/jpeg";

/// MIME type matching the extension a media kind is stored under.
pub fn content_type_for(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "image/jpeg",
        MediaKind::Video => "video/mp4",
        MediaKind::Audio => "audio/mp4",
    }
}

/// The content type to upload with, honouring the legacy tagging switch.
pub fn upload_content_type(kind: MediaKind, legacy_jpeg: bool) -> &'static str {
    if legacy_jpeg { LEGACY_MEDIA_CONTENT_TYPE } else { content_type_for(kind) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_kind_types() {
        assert_eq!(content_type_for(MediaKind::Image), "image/jpeg");
        assert_eq!(content_type_for(MediaKind::Video), "video/mp4");
        assert_eq!(content_type_for(MediaKind::Audio), "audio/mp4");
    }

    #[test]
    fn legacy_switch_forces_jpeg() {
        assert_eq!(upload_content_type(MediaKind::Video, true), "image/jpeg");
        assert_eq!(upload_content_type(MediaKind::Video, false), "video/mp4");
    }
}

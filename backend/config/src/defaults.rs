//! Default values used when neither the config file nor the environment sets a field.

pub const DEFAULT_LINE_API_BASE_URL: &str = "https://api.line.me";
pub const DEFAULT_LINE_DATA_API_BASE_URL: &str = "https://api-data.line.me";
pub const DEFAULT_LOADING_SECONDS: u32 = 5;

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WEBHOOK_PATH: &str = "/callback";

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_MODEL_TRIGGER: &str = "model";
pub const DEFAULT_MEDIA_SAVED: &str = "Your file has been saved.";

/// LINE's published sample emoji set.
pub const DEFAULT_STICKER_TEXT: &str = "$ Thanks for the sticker!";
pub const DEFAULT_STICKER_PRODUCT_ID: &str = "5ac1bfd5040ab15980c9b435";
pub const DEFAULT_STICKER_EMOJI_ID: &str = "001";

pub fn default_lines() -> Vec<String> {
    vec!["Message received.".to_string(), "Nothing else to do here.".to_string()]
}

pub fn default_triggers() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        (
            "help",
            vec![
                "Send a photo, video or voice message and it will be stored.",
                "Stickers in a one-to-one chat get a thank-you.",
                "Any other text gets a timing report.",
            ],
        ),
        (
            "about",
            vec!["linestash keeps the media shared with this bot.", "Files land in object storage."],
        ),
    ]
}

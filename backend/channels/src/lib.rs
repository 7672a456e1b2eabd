//! LINE Messaging API integration.
//!
//! - `line_receive`: webhook signature checks and event parsing
//! - `line_send`: outbound wire payloads
//! - `line`: the HTTPS client implementing `MessagingApi`

pub mod line;
pub mod line_receive;
pub mod line_send;

pub use line::LineClient;
pub use line_receive::{SIGNATURE_HEADER, parse_webhook, sign, verify_signature};

//! Replay a recorded webhook delivery.
//!
//! The input is the API gateway proxy shape the bot was first deployed
//! behind: `{"headers": {...}, "body": "...", "isBase64Encoded": false}`.
//! The response is printed in the same shape.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use linestash_channels::SIGNATURE_HEADER;
use linestash_config::StashConfig;
use linestash_gateway::{Dispatcher, WebhookRequest, WebhookResponse};

use crate::read_input;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyEvent {
    #[serde(default)]
    headers: Option<HashMap<String, String>>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    is_base64_encoded: bool,
}

impl ProxyEvent {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Replay input is not a proxy event")
    }

    /// Header names are matched case-insensitively.
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()?
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn into_request(self) -> Result<WebhookRequest> {
        let signature = self.header(SIGNATURE_HEADER).map(str::to_string);
        let body = match self.body {
            None => String::new(),
            Some(body) if self.is_base64_encoded => {
                let bytes = STANDARD.decode(body.trim()).context("Body is not valid base64")?;
                String::from_utf8(bytes).context("Decoded body is not UTF-8")?
            }
            Some(body) => body,
        };
        Ok(WebhookRequest { body, signature })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    status_code: u16,
    headers: HashMap<&'static str, &'static str>,
    body: String,
}

impl From<WebhookResponse> for ProxyResponse {
    fn from(response: WebhookResponse) -> Self {
        Self {
            status_code: response.status,
            headers: HashMap::from([("Content-Type", response.content_type)]),
            body: response.body,
        }
    }
}

pub async fn run(config: &StashConfig, event_path: &Path) -> Result<()> {
    let raw = read_input(event_path).await?;
    let request = ProxyEvent::parse(&raw)?.into_request()?;

    let dispatcher = Dispatcher::from_config(config).await?;
    let response = ProxyResponse::from(dispatcher.dispatch(&request).await);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

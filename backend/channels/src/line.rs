//! LINE client: the Messaging API calls the bot makes.
//!
//! Replies and the loading animation go to the main API host; message
//! content is fetched from the data host.

use async_trait::async_trait;
use bytes::Bytes;
use linestash_config::LineConfig;
use linestash_core::{MessagingApi, ReplyPayload, StashError};
use linestash_logging::redact_sensitive_data;
use reqwest::{Client, Response};
use tracing::{debug, error};

use crate::line_send::{LoadingRequest, ReplyRequest};

pub struct LineClient {
    http: Client,
    access_token: String,
    api_base_url: String,
    data_api_base_url: String,
}

impl LineClient {
    pub fn new(
        access_token: impl Into<String>,
        api_base_url: impl Into<String>,
        data_api_base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            access_token: access_token.into(),
            api_base_url: trim_base(api_base_url.into()),
            data_api_base_url: trim_base(data_api_base_url.into()),
        }
    }

    pub fn from_config(config: &LineConfig) -> Result<Self, StashError> {
        let token = config
            .channel_access_token
            .clone()
            .ok_or_else(|| StashError::Config("line.channelAccessToken is not set".into()))?;
        Ok(Self::new(token, &config.api_base_url, &config.data_api_base_url))
    }

    /// Error text for a non-success response, with credentials scrubbed.
    async fn failure_text(response: Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        redact_sensitive_data(&format!("{status}: {body}"))
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[async_trait]
impl MessagingApi for LineClient {
    async fn download_content(&self, message_id: &str) -> Result<Bytes, StashError> {
        let failed = |reason: String| StashError::DownloadFailed {
            message_id: message_id.to_string(),
            reason,
        };
        let url = format!("{}/v2/bot/message/{message_id}/content", self.data_api_base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            let reason = Self::failure_text(response).await;
            error!(message_id, %reason, "[LINE] Content download failed");
            return Err(failed(reason));
        }
        let content = response.bytes().await.map_err(|e| failed(e.to_string()))?;
        debug!(message_id, size = content.len(), "[LINE] Downloaded content");
        Ok(content)
    }

    async fn reply(&self, payload: ReplyPayload) -> Result<(), StashError> {
        let url = format!("{}/v2/bot/message/reply", self.api_base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&ReplyRequest::new(payload.reply_token(), payload.units()))
            .send()
            .await
            .map_err(|e| StashError::ReplyFailed(e.to_string()))?;

        if !response.status().is_success() {
            let reason = Self::failure_text(response).await;
            error!(%reason, "[LINE] Reply failed");
            return Err(StashError::ReplyFailed(reason));
        }
        debug!(units = payload.units().len(), "[LINE] Sent reply");
        Ok(())
    }

    async fn show_loading(&self, user_id: &str, seconds: u32) -> Result<(), StashError> {
        let url = format!("{}/v2/bot/chat/loading/start", self.api_base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&LoadingRequest { chat_id: user_id, loading_seconds: seconds })
            .send()
            .await
            .map_err(|e| StashError::ReplyFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StashError::ReplyFailed(Self::failure_text(response).await));
        }
        Ok(())
    }
}

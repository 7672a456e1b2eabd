use async_trait::async_trait;
use linestash_core::{ReplyModel, StashError};

/// Stand-in for the reserved model trigger until a real model is wired in.
pub struct EchoModel;

#[async_trait]
impl ReplyModel for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    async fn respond(&self, text: &str) -> Result<Vec<String>, StashError> {
        Ok(vec![format!("Model received: {text}"), "No model is configured yet.".to_string()])
    }
}

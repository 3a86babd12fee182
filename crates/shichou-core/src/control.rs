//! Control-surface entry point into the pipeline.
//!
//! The popup (or any other control surface) sends `{"action":"extractData"}`
//! and receives `{success, data?, error?}` once the bridge fetch and the
//! extraction have both finished.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shichou_bridge::DataBridge;
use shichou_detect::PageSource;

use crate::assembler::MediaAssembler;
use crate::models::MediaRecord;

/// Messages accepted from the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ControlMessage {
    #[serde(rename = "extractData")]
    ExtractData,
}

/// Reply to a [`ControlMessage::ExtractData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractDataResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<MediaRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractDataResponse {
    pub fn ok(data: MediaRecord) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Answers control-surface messages for one page.
#[derive(Debug, Clone)]
pub struct ControlHandler {
    assembler: Arc<MediaAssembler>,
    bridge: DataBridge,
}

impl ControlHandler {
    pub fn new(assembler: Arc<MediaAssembler>, bridge: DataBridge) -> Self {
        Self { assembler, bridge }
    }

    pub async fn handle(
        &self,
        page: &dyn PageSource,
        message: ControlMessage,
    ) -> ExtractDataResponse {
        match message {
            ControlMessage::ExtractData => match self.assembler.extract(page, &self.bridge).await {
                Ok(record) => ExtractDataResponse::ok(record),
                Err(e) => {
                    tracing::warn!(error = %e, "Extraction failed");
                    ExtractDataResponse::failure(e.to_string())
                }
            },
        }
    }

    /// Decode a raw message and handle it.
    ///
    /// Malformed JSON and unknown actions get a failure reply.
    pub async fn handle_json(&self, page: &dyn PageSource, raw: &str) -> ExtractDataResponse {
        match serde_json::from_str::<ControlMessage>(raw) {
            Ok(message) => self.handle(page, message).await,
            Err(e) => {
                tracing::warn!(error = %e, "Unsupported control message");
                ExtractDataResponse::failure(format!("unsupported control message: {e}"))
            }
        }
    }
}

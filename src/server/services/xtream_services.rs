use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::server::error::Error;

use super::fetch_services::DynFetchService;

/// fixed control-api sub-path every xtream-style portal serves
const XTREAM_API_PATH: &str = "/player_api.php";

pub type DynXtreamService = Arc<dyn XtreamServiceTrait + Send + Sync>;

/// uniform wrapper the client unpacks, failures carry their status inside
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XtreamEnvelope {
    Success {
        payload: serde_json::Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        action: Option<String>,
    },
    Failure {
        message: String,
        status: u16,
    },
}

#[mockall::automock]
#[async_trait::async_trait]
pub trait XtreamServiceTrait {
    /// forward a control-api query and wrap the outcome in the envelope
    async fn relay(&self, base_url: &str, params: Vec<(String, String)>) -> XtreamEnvelope;
}

pub struct XtreamService {
    fetch: DynFetchService,
}

impl XtreamService {
    pub fn new(fetch: DynFetchService) -> Self {
        Self { fetch }
    }
}

#[async_trait::async_trait]
impl XtreamServiceTrait for XtreamService {
    async fn relay(&self, base_url: &str, params: Vec<(String, String)>) -> XtreamEnvelope {
        // action is echoed back untouched, never validated against the payload
        let action = params
            .iter()
            .find(|(key, _)| key == "action")
            .map(|(_, value)| value.clone());

        let target = format!("{}{}", base_url, XTREAM_API_PATH);
        debug!("relaying xtream call to {} (action: {:?})", target, action);

        match self.fetch.get_json(&target, &params).await {
            Ok(payload) => XtreamEnvelope::Success { payload, action },
            Err(Error::Upstream { status, message }) => {
                XtreamEnvelope::Failure { message, status }
            }
            // no upstream response at all reads as not found
            Err(_) => XtreamEnvelope::Failure {
                message: "Error: not found".to_string(),
                status: 404,
            },
        }
    }
}

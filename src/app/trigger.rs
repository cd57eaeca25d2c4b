//! Remote trigger adapter.
//!
//! Turns an invocation event (a manual HTTP call or a scheduled timer) into a
//! sync run and maps the outcome onto an HTTP-style response.

use crate::adapters::http_sync;
use crate::config::lambda::TriggerEnv;
use crate::domain::model::SyncReport;
use crate::utils::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const SUCCESS_MESSAGE: &str = "Firewall updated successfully";
pub const MISSING_TOKEN_MESSAGE: &str = "env.API_TOKEN is not defined. Please define it.";

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TriggerEvent {
    Scheduled(ScheduledEvent),
    Http(HttpRequest),
}

/// EventBridge timer payload (`"detail-type": "Scheduled Event"`).
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduledEvent {
    pub source: String,
    #[serde(rename = "detail-type")]
    pub detail_type: String,
    #[serde(default)]
    pub time: Option<String>,
}

/// API Gateway / function URL request. Only the headers matter here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpRequest {
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.as_ref().and_then(|headers| {
            headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl TriggerResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "text/plain".to_string());
        Self {
            status_code,
            headers,
            body: body.into(),
        }
    }
}

pub async fn run_sync(env: &TriggerEnv) -> Result<SyncReport> {
    let config = env.sync_config()?;
    tracing::debug!("Trigger config: {:?}", config);
    http_sync(config)?.run().await
}

/// Manual call: checked against `WORKER_SECRET` when one is configured.
pub async fn handle_http(request: &HttpRequest, env: &TriggerEnv) -> TriggerResponse {
    if let Some(secret) = env.worker_secret() {
        if request.header("Authorization") != Some(secret) {
            tracing::warn!("Rejected manual call with missing or wrong Authorization header");
            return TriggerResponse::new(403, SyncError::UnauthorizedError.to_string());
        }
    }

    if !env.has_api_token() {
        tracing::error!("{}", MISSING_TOKEN_MESSAGE);
        return TriggerResponse::new(403, MISSING_TOKEN_MESSAGE);
    }

    match run_sync(env).await {
        Ok(report) => {
            tracing::info!(
                "{}: {} ({} rules)",
                SUCCESS_MESSAGE,
                report.firewall_name,
                report.rule_count
            );
            TriggerResponse::new(200, SUCCESS_MESSAGE)
        }
        Err(e) => {
            tracing::error!("Firewall update failed: {} ({:?})", e, e.category());
            TriggerResponse::new(500, e.to_string())
        }
    }
}

/// Timer call: no request-level authorization.
pub async fn handle_scheduled(event: &ScheduledEvent, env: &TriggerEnv) -> Result<SyncReport> {
    tracing::info!(
        "Scheduled run from {} ({}) at {}",
        event.source,
        event.detail_type,
        event.time.as_deref().unwrap_or("unknown time")
    );

    if !env.has_api_token() {
        return Err(SyncError::MissingConfigError {
            field: "API_TOKEN".to_string(),
        });
    }

    run_sync(env).await
}

pub async fn handle_event(event: TriggerEvent, env: &TriggerEnv) -> Result<TriggerResponse> {
    match event {
        TriggerEvent::Http(request) => Ok(handle_http(&request, env).await),
        // 排程失敗不回傳 invocation error，避免 Lambda 非同步重試整個流程
        TriggerEvent::Scheduled(scheduled) => match handle_scheduled(&scheduled, env).await {
            Ok(_) => Ok(TriggerResponse::new(200, SUCCESS_MESSAGE)),
            Err(e) => {
                tracing::error!(
                    "Scheduled firewall update failed: {} ({:?}, firewall modified: {})",
                    e,
                    e.category(),
                    e.firewall_modified()
                );
                Ok(TriggerResponse::new(500, e.to_string()))
            }
        },
    }
}

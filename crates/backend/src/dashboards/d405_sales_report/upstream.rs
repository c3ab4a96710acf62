use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use contracts::dashboards::d405_sales_report::{ExportRequest, ReportRequest};

use super::error::GatewayError;
use crate::shared::config::UpstreamConfig;

/// Report API behind the gateway.
#[async_trait]
pub trait ReportUpstream: Send + Sync {
    /// `GET /filters` with `<field>_ids=1,2` query params
    async fn filters(&self, params: &[(String, String)]) -> Result<Value, GatewayError>;

    async fn dashboard(&self, request: &ReportRequest) -> Result<Value, GatewayError>;

    async fn table(&self, page: u32, request: &ReportRequest) -> Result<Value, GatewayError>;

    /// Binary workbook
    async fn export(&self, request: &ExportRequest) -> Result<Vec<u8>, GatewayError>;
}

/// HTTP-клиент к API отчёта продаж
pub struct HttpReportUpstream {
    client: reqwest::Client,
    base_url: String,
}

impl HttpReportUpstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Upstream {
            status: status.as_u16(),
            message: server_message(&body, status.as_u16()),
        })
    }

    async fn post_json(&self, url: String, body: &impl serde::Serialize) -> Result<Value, GatewayError> {
        tracing::info!("Report API: POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl ReportUpstream for HttpReportUpstream {
    async fn filters(&self, params: &[(String, String)]) -> Result<Value, GatewayError> {
        let url = self.url("filters");
        tracing::info!("Report API: GET {} ({} params)", url, params.len());
        let response = self.client.get(&url).query(params).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json::<Value>().await?)
    }

    async fn dashboard(&self, request: &ReportRequest) -> Result<Value, GatewayError> {
        self.post_json(self.url("dashboard"), request).await
    }

    async fn table(&self, page: u32, request: &ReportRequest) -> Result<Value, GatewayError> {
        self.post_json(format!("{}?page={}", self.url("table"), page), request)
            .await
    }

    async fn export(&self, request: &ExportRequest) -> Result<Vec<u8>, GatewayError> {
        let url = self.url("export");
        tracing::info!("Report API: POST {} (dataview={})", url, request.dataview.code());
        let response = self.client.post(&url).json(request).send().await?;
        let response = Self::check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Error text of a failed upstream call: `message`, then `error`, then the raw body.
pub fn server_message(body: &str, status: u16) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["message", "error"]
            .iter()
            .find_map(|key| v.get(key).and_then(Value::as_str).map(str::to_string))
    });
    match from_json {
        Some(message) if !message.trim().is_empty() => message,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => format!("Report API returned status {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_prefers_json_message() {
        assert_eq!(
            server_message(r#"{"message":"Invalid date range"}"#, 422),
            "Invalid date range"
        );
        assert_eq!(server_message(r#"{"error":"boom"}"#, 500), "boom");
        assert_eq!(server_message("  plain text ", 500), "plain text");
        assert_eq!(server_message("", 503), "Report API returned status 503");
    }

    #[test]
    fn test_url_join() {
        let upstream = HttpReportUpstream::new(&UpstreamConfig {
            base_url: "http://reports.local/api/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(upstream.url("filters"), "http://reports.local/api/filters");
        assert_eq!(upstream.url("/table"), "http://reports.local/api/table");
    }
}

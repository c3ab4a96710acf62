use contracts::dashboards::d405_sales_report::{
    DashboardPayload, ExportRequest, FilterQuery, ReportRequest, TablePage,
};
use gloo_net::http::{Request, Response};
use serde_json::Value;

use crate::shared::api_utils::api_url;

/// Query string for `GET /api/filters`; empty when unconstrained.
pub fn filters_query(query: &FilterQuery) -> String {
    if query.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = query
        .params
        .iter()
        .map(|(field, value)| {
            format!(
                "{}={}",
                urlencoding::encode(field),
                urlencoding::encode(value)
            )
        })
        .collect();
    format!("?{}", pairs.join("&"))
}

/// Server message of a failed response, generic text otherwise
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    message_from_body(&body).unwrap_or_else(|| format!("HTTP error: {}", status))
}

fn message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Raw catalogs response; fanned out by the caller
pub async fn fetch_filters(query: &FilterQuery) -> Result<Value, String> {
    let url = format!("{}{}", api_url("/api/filters"), filters_query(query));

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn fetch_dashboard(request: &ReportRequest) -> Result<DashboardPayload, String> {
    let response = Request::post(&api_url("/api/dashboard"))
        .json(request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json::<DashboardPayload>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn fetch_table_page(page: u32, request: &ReportRequest) -> Result<TablePage, String> {
    let url = format!("{}?page={}", api_url("/api/table"), page);
    let response = Request::post(&url)
        .json(request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    let value: Value = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;
    Ok(TablePage::from_value(&value))
}

/// Spreadsheet bytes
pub async fn export_file(request: &ExportRequest) -> Result<Vec<u8>, String> {
    let response = Request::post(&api_url("/api/export"))
        .json(request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .binary()
        .await
        .map_err(|e| format!("Failed to read file: {}", e))
}

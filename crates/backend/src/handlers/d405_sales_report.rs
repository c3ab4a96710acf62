use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use contracts::dashboards::d405_sales_report::{ExportRequest, ReportRequest};

use crate::dashboards::d405_sales_report::{service, GatewayError, ReportUpstream};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<dyn ReportUpstream>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// GET /api/filters?region_ids=1,2
pub async fn get_filters(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, GatewayError> {
    tracing::info!("D405: loading filter catalogs ({} params)", query.len());
    let catalogs = service::load_filters(state.upstream.as_ref(), &query).await?;
    Ok(Json(catalogs))
}

/// POST /api/dashboard
pub async fn post_dashboard(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<Value>, GatewayError> {
    tracing::info!(
        "D405: dashboard {}..{} by {}",
        request.window.from_date,
        request.window.to_date,
        request.window.search_type.code()
    );
    let payload = service::load_dashboard(state.upstream.as_ref(), &request).await?;
    Ok(Json(payload))
}

/// POST /api/table?page=2
pub async fn post_table(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<Value>, GatewayError> {
    let page = service::load_table(state.upstream.as_ref(), page.page, &request).await?;
    Ok(Json(page))
}

/// POST /api/export
pub async fn post_export(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let file_name = request.file_name();
    let bytes = service::export(state.upstream.as_ref(), &request).await?;
    tracing::info!("D405: export {} ({} bytes)", file_name, bytes.len());
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::configure_routes;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Records calls and answers with canned values.
    #[derive(Default)]
    struct FakeUpstream {
        calls: Mutex<Vec<String>>,
        fail_with: Option<(u16, String)>,
    }

    impl FakeUpstream {
        fn record(&self, call: String) -> Result<(), GatewayError> {
            self.calls.lock().unwrap().push(call);
            match &self.fail_with {
                Some((status, message)) => Err(GatewayError::Upstream {
                    status: *status,
                    message: message.clone(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl ReportUpstream for FakeUpstream {
        async fn filters(&self, params: &[(String, String)]) -> Result<Value, GatewayError> {
            let joined: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
            self.record(format!("filters {}", joined.join("&")))?;
            Ok(json!({"companies": [{"company_id": 1, "company_name": "Acme"}]}))
        }

        async fn dashboard(&self, _request: &ReportRequest) -> Result<Value, GatewayError> {
            self.record("dashboard".to_string())?;
            Ok(json!({"charts": {}, "summary": {"total_amount": 10}}))
        }

        async fn table(&self, page: u32, _request: &ReportRequest) -> Result<Value, GatewayError> {
            self.record(format!("table {page}"))?;
            Ok(json!({"data": [], "current_page": page, "total_pages": 3}))
        }

        async fn export(&self, request: &ExportRequest) -> Result<Vec<u8>, GatewayError> {
            self.record(format!("export {}", request.dataview.code()))?;
            Ok(b"PK\x03\x04".to_vec())
        }
    }

    fn app(upstream: Arc<FakeUpstream>) -> axum::Router {
        configure_routes(AppState { upstream })
    }

    fn body() -> Value {
        json!({
            "from_date": "2024-01-01",
            "to_date": "2024-01-31",
            "search_type": "quantity",
            "display_quantity": 10,
            "region_ids": [3]
        })
    }

    fn post(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_filters_forward_known_params() {
        let upstream = Arc::new(FakeUpstream::default());
        let response = app(upstream.clone())
            .oneshot(
                Request::get("/api/filters?region_ids=1,2&foo=bar")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            upstream.calls.lock().unwrap().as_slice(),
            ["filters region_ids=1,2"]
        );
        let catalogs = read_json(response).await;
        assert_eq!(catalogs["companies"][0]["company_name"], "Acme");
    }

    #[tokio::test]
    async fn test_dashboard_fills_level() {
        let upstream = Arc::new(FakeUpstream::default());
        let response = app(upstream)
            .oneshot(post("/api/dashboard", &body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["level"], "region");
    }

    #[tokio::test]
    async fn test_dashboard_rejects_out_of_scope_dimension() {
        let upstream = Arc::new(FakeUpstream::default());
        let mut request = body();
        request["customer_ids"] = json!([9]);
        let response = app(upstream.clone())
            .oneshot(post("/api/dashboard", &request))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(upstream.calls.lock().unwrap().is_empty());
        let error = read_json(response).await;
        assert!(error["message"].as_str().unwrap().contains("Customer"));
    }

    #[tokio::test]
    async fn test_table_page_defaults_to_one() {
        let upstream = Arc::new(FakeUpstream::default());
        let router = app(upstream.clone());
        router
            .clone()
            .oneshot(post("/api/table", &body()))
            .await
            .unwrap();
        router
            .oneshot(post("/api/table?page=3", &body()))
            .await
            .unwrap();
        assert_eq!(
            upstream.calls.lock().unwrap().as_slice(),
            ["table 1", "table 3"]
        );
    }

    #[tokio::test]
    async fn test_upstream_error_message_passthrough() {
        let upstream = Arc::new(FakeUpstream {
            fail_with: Some((422, "No sales in range".to_string())),
            ..Default::default()
        });
        let response = app(upstream)
            .oneshot(post("/api/table", &body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(read_json(response).await["message"], "No sales in range");
    }

    #[tokio::test]
    async fn test_export_sets_download_headers() {
        let upstream = Arc::new(FakeUpstream::default());
        let mut request = body();
        request["dataview"] = json!("weekly");
        let response = app(upstream.clone())
            .oneshot(post("/api/export", &request))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"sales-report-2024-01-01-to-2024-01-31.xlsx\""
        );
        assert_eq!(response.headers()[header::CONTENT_TYPE], XLSX_CONTENT_TYPE);
        assert_eq!(upstream.calls.lock().unwrap().as_slice(), ["export weekly"]);
    }
}

use serde_json::Value;
use std::collections::HashMap;

use contracts::dashboards::d405_sales_report::{
    Dimension, DimensionGroup, ExportRequest, ReportRequest, ReportWindow, TablePage,
    ValidationError, DISPLAY_QUANTITY_OPTIONS, HIERARCHY_ORDER,
};

use super::error::GatewayError;
use super::upstream::ReportUpstream;

/// Keeps only known `<dimension>_ids` params, in hierarchy order.
pub fn filter_params(query: &HashMap<String, String>) -> Vec<(String, String)> {
    HIERARCHY_ORDER
        .iter()
        .filter_map(|dim| {
            let field = dim.filter_field();
            let value = query.get(&field)?.trim();
            if value.is_empty() {
                return None;
            }
            Some((field, value.to_string()))
        })
        .collect()
}

fn check_window(window: &ReportWindow) -> Result<(), GatewayError> {
    if window.from_date > window.to_date {
        return Err(ValidationError::InvalidDateRange {
            from: window.from_date,
            to: window.to_date,
        }
        .into());
    }
    if window.display_quantity == 0 {
        return Err(ValidationError::MissingDisplayQuantity.into());
    }
    if !DISPLAY_QUANTITY_OPTIONS.contains(&window.display_quantity) {
        tracing::warn!(
            "D405: display_quantity {} is outside the standard options",
            window.display_quantity
        );
    }
    Ok(())
}

fn selected(request: &ReportRequest) -> Vec<Dimension> {
    HIERARCHY_ORDER
        .iter()
        .copied()
        .filter(|dim| {
            request
                .filters
                .slot(*dim)
                .is_some_and(|ids| !ids.is_empty())
        })
        .collect()
}

pub fn check_dashboard(request: &ReportRequest) -> Result<(), GatewayError> {
    check_window(&request.window)?;
    let dims = selected(request);
    if dims.is_empty() {
        return Err(ValidationError::NoSelection.into());
    }
    let blocked: Vec<&str> = dims
        .iter()
        .filter(|dim| dim.group() != DimensionGroup::Hierarchy)
        .map(|dim| dim.display_name())
        .collect();
    if !blocked.is_empty() {
        return Err(ValidationError::DashboardScope(blocked.join(", ")).into());
    }
    Ok(())
}

/// Table and export bodies are scoped to a single dimension.
pub fn check_table(request: &ReportRequest) -> Result<(), GatewayError> {
    check_window(&request.window)?;
    let present = request.filters.present();
    if present.len() > 1 {
        let names: Vec<&str> = present.iter().map(|d| d.display_name()).collect();
        return Err(GatewayError::InvalidRequest(format!(
            "Table requests take one dimension filter, got: {}",
            names.join(", ")
        )));
    }
    Ok(())
}

/// Level of a dashboard request: the most granular selected hierarchy dimension.
pub fn request_level(request: &ReportRequest) -> Dimension {
    selected(request)
        .last()
        .copied()
        .unwrap_or(Dimension::Company)
}

pub async fn load_filters(
    upstream: &dyn ReportUpstream,
    query: &HashMap<String, String>,
) -> Result<Value, GatewayError> {
    let params = filter_params(query);
    let catalogs = upstream.filters(&params).await?;
    if !catalogs.is_object() {
        return Err(GatewayError::InvalidResponse(
            "filters response is not an object".to_string(),
        ));
    }
    Ok(catalogs)
}

/// Forwards the dashboard request. A payload without `level` gets the one
/// implied by the request.
pub async fn load_dashboard(
    upstream: &dyn ReportUpstream,
    request: &ReportRequest,
) -> Result<Value, GatewayError> {
    check_dashboard(request)?;
    let mut payload = upstream.dashboard(request).await?;
    let Some(object) = payload.as_object_mut() else {
        return Err(GatewayError::InvalidResponse(
            "dashboard response is not an object".to_string(),
        ));
    };
    if !object.get("level").is_some_and(Value::is_string) {
        object.insert(
            "level".to_string(),
            Value::String(request_level(request).slug().to_string()),
        );
    }
    Ok(payload)
}

pub async fn load_table(
    upstream: &dyn ReportUpstream,
    page: u32,
    request: &ReportRequest,
) -> Result<Value, GatewayError> {
    check_table(request)?;
    let page = page.max(1);
    let value = upstream.table(page, request).await?;
    let parsed = TablePage::from_value(&value);
    tracing::info!(
        "D405: table page {}/{} with {} rows ({} total)",
        parsed.current_page,
        parsed.total_pages,
        parsed.rows.len(),
        parsed.total_rows
    );
    Ok(value)
}

pub async fn export(
    upstream: &dyn ReportUpstream,
    request: &ExportRequest,
) -> Result<Vec<u8>, GatewayError> {
    check_table(&request.request)?;
    let bytes = upstream.export(request).await?;
    if bytes.is_empty() {
        return Err(GatewayError::InvalidResponse("export file is empty".to_string()));
    }
    Ok(bytes)
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::dimension::{Dimension, HIERARCHY_ORDER};
use super::store::{FilterHierarchyStore, RefreshScope};

/// One selectable value of a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Catalogs per dimension, as fanned out from one `/api/filters` response.
pub type CatalogMap = BTreeMap<Dimension, Vec<CatalogItem>>;

/// Returns the first candidate field that is present and not null.
pub fn resolve_field<'a, S: AsRef<str>>(record: &'a Value, candidates: &[S]) -> Option<&'a Value> {
    let object = record.as_object()?;
    candidates
        .iter()
        .filter_map(|key| object.get(key.as_ref()))
        .find(|value| !value.is_null())
}

/// Like [`resolve_field`], rendered as text. Numbers keep their decimal form,
/// empty strings count as missing.
pub fn resolve_text<S: AsRef<str>>(record: &Value, candidates: &[S]) -> Option<String> {
    let object = record.as_object()?;
    candidates.iter().find_map(|key| match object.get(key.as_ref())? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Like [`resolve_field`], as a number. Numeric strings are accepted.
pub fn resolve_number<S: AsRef<str>>(record: &Value, candidates: &[S]) -> Option<f64> {
    let object = record.as_object()?;
    candidates.iter().find_map(|key| match object.get(key.as_ref())? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Parses one catalog record. Records without an id are skipped; a missing name
/// falls back to the id.
pub fn parse_catalog_item(dim: Dimension, record: &Value) -> Option<CatalogItem> {
    let id = resolve_text(record, &dim.id_candidates()[..])?;
    let name = resolve_text(record, &dim.name_candidates()[..]).unwrap_or_else(|| id.clone());
    Some(CatalogItem { id, name })
}

/// Splits a `/api/filters` response into per-dimension catalogs.
///
/// A collection that is missing or not an array yields an empty catalog.
pub fn fan_out_catalogs(response: &Value) -> CatalogMap {
    HIERARCHY_ORDER
        .iter()
        .map(|dim| {
            let items = response
                .get(dim.collection_key())
                .and_then(Value::as_array)
                .map(|records| {
                    records
                        .iter()
                        .filter_map(|record| parse_catalog_item(*dim, record))
                        .collect()
                })
                .unwrap_or_default();
            (*dim, items)
        })
        .collect()
}

/// Query for `GET /api/filters`, scoped by the selections above the refreshed range.
/// Values are raw; percent-encoding is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterQuery {
    pub params: Vec<(String, String)>,
}

impl FilterQuery {
    /// Builds the ancestor-scoped query for a refresh of `scope`.
    ///
    /// `RefreshScope::All` carries no constraints.
    pub fn for_scope(store: &FilterHierarchyStore, scope: RefreshScope) -> Self {
        let RefreshScope::From(from) = scope else {
            return Self::default();
        };
        let params = HIERARCHY_ORDER
            .iter()
            .take_while(|dim| **dim < from)
            .filter_map(|dim| {
                let selected = store.selection(*dim);
                if selected.is_empty() {
                    None
                } else {
                    Some((dim.filter_field(), selected.join(",")))
                }
            })
            .collect();
        Self { params }
    }

    /// Active dimensions whose catalog a refresh of `scope` replaces.
    pub fn targets(store: &FilterHierarchyStore, scope: RefreshScope) -> Vec<Dimension> {
        store
            .active()
            .iter()
            .copied()
            .filter(|dim| scope.covers(*dim))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_field_first_present_wins() {
        let record = json!({"name": null, "label": "North", "title": "ignored"});
        assert_eq!(
            resolve_field(&record, &["name", "label", "title"]),
            Some(&json!("North"))
        );
        assert_eq!(resolve_field(&record, &["missing"]), None);
        assert_eq!(resolve_field(&json!([1, 2]), &["name"]), None);
    }

    #[test]
    fn test_resolve_text_and_number() {
        let record = json!({"id": 42, "name": "", "label": "Main", "total": "12.5"});
        assert_eq!(resolve_text(&record, &["id"]), Some("42".to_string()));
        assert_eq!(resolve_text(&record, &["name", "label"]), Some("Main".to_string()));
        assert_eq!(resolve_number(&record, &["total"]), Some(12.5));
        assert_eq!(resolve_number(&record, &["label"]), None);
    }

    #[test]
    fn test_parse_catalog_item_fallbacks() {
        let item = parse_catalog_item(
            Dimension::Salesman,
            &json!({"salesman_id": 7, "salesman_name": "Ivan"}),
        );
        assert_eq!(item, Some(CatalogItem::new("7", "Ivan")));

        let item = parse_catalog_item(Dimension::Region, &json!({"code": "R1"}));
        assert_eq!(item, Some(CatalogItem::new("R1", "R1")));

        assert_eq!(parse_catalog_item(Dimension::Region, &json!({"name": "x"})), None);
    }

    #[test]
    fn test_fan_out_tolerates_missing_collections() {
        let response = json!({
            "regions": [{"id": 1, "name": "North"}, {"id": 2, "title": "South"}],
            "customers": "not an array",
        });
        let catalogs = fan_out_catalogs(&response);
        assert_eq!(
            catalogs[&Dimension::Region],
            vec![CatalogItem::new("1", "North"), CatalogItem::new("2", "South")]
        );
        assert!(catalogs[&Dimension::Customer].is_empty());
        assert!(catalogs[&Dimension::Company].is_empty());
        assert_eq!(catalogs.len(), 11);
    }

    #[test]
    fn test_filter_query_uses_selections_above_scope() {
        let mut store = FilterHierarchyStore::new();
        store.activate(Dimension::Company);
        store.activate(Dimension::Region);
        store.activate(Dimension::Warehouse);
        store.activate(Dimension::Item);
        store.toggle_value(Dimension::Company, "1");
        store.toggle_value(Dimension::Company, "2");
        store.toggle_value(Dimension::Region, "5");

        let query = FilterQuery::for_scope(&store, RefreshScope::From(Dimension::Area));
        assert_eq!(
            query.params,
            vec![
                ("company_ids".to_string(), "1,2".to_string()),
                ("region_ids".to_string(), "5".to_string()),
            ]
        );
        assert!(FilterQuery::for_scope(&store, RefreshScope::All).is_empty());
        assert_eq!(
            FilterQuery::targets(&store, RefreshScope::From(Dimension::Area)),
            vec![Dimension::Warehouse, Dimension::Item]
        );
    }
}

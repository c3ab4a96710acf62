use serde::{Deserialize, Serialize};

/// One facet of the sales report filter hierarchy.
///
/// Variant order is the hierarchy order (least to most granular), so the derived
/// `Ord` can be used directly for "above/below" comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "company")]
    Company,
    #[serde(rename = "region")]
    Region,
    #[serde(rename = "area")]
    Area,
    #[serde(rename = "warehouse")]
    Warehouse,
    #[serde(rename = "route")]
    Route,
    #[serde(rename = "salesman")]
    Salesman,
    #[serde(rename = "item-category")]
    ItemCategory,
    #[serde(rename = "items")]
    Item,
    #[serde(rename = "channel-categories")]
    ChannelCategory,
    #[serde(rename = "customer-category")]
    CustomerCategory,
    #[serde(rename = "customer")]
    Customer,
}

/// Where a dimension sits in the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionGroup {
    /// Company / Region / Area / Warehouse: the only dimensions a dashboard may be scoped by
    Hierarchy,
    /// Route / Salesman
    SearchBy,
    MoreFilters,
}

impl DimensionGroup {
    pub fn all() -> [DimensionGroup; 3] {
        [
            DimensionGroup::Hierarchy,
            DimensionGroup::SearchBy,
            DimensionGroup::MoreFilters,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            DimensionGroup::Hierarchy => "Hierarchy",
            DimensionGroup::SearchBy => "Search by",
            DimensionGroup::MoreFilters => "More filters",
        }
    }
}

/// Fixed hierarchy order, least to most granular.
pub const HIERARCHY_ORDER: [Dimension; 11] = [
    Dimension::Company,
    Dimension::Region,
    Dimension::Area,
    Dimension::Warehouse,
    Dimension::Route,
    Dimension::Salesman,
    Dimension::ItemCategory,
    Dimension::Item,
    Dimension::ChannelCategory,
    Dimension::CustomerCategory,
    Dimension::Customer,
];

/// Dimensions whose table/export columns are additive rather than single-column.
pub const CUSTOMER_GROUP: [Dimension; 3] = [
    Dimension::ChannelCategory,
    Dimension::CustomerCategory,
    Dimension::Customer,
];

impl Dimension {
    pub fn all() -> &'static [Dimension] {
        &HIERARCHY_ORDER
    }

    /// Position in the hierarchy order (0 = Company).
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Stable slug used in the UI and in serialized state.
    pub fn slug(self) -> &'static str {
        match self {
            Dimension::Company => "company",
            Dimension::Region => "region",
            Dimension::Area => "area",
            Dimension::Warehouse => "warehouse",
            Dimension::Route => "route",
            Dimension::Salesman => "salesman",
            Dimension::ItemCategory => "item-category",
            Dimension::Item => "items",
            Dimension::ChannelCategory => "channel-categories",
            Dimension::CustomerCategory => "customer-category",
            Dimension::Customer => "customer",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Dimension> {
        HIERARCHY_ORDER.iter().copied().find(|d| d.slug() == slug)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Dimension::Company => "Company",
            Dimension::Region => "Region",
            Dimension::Area => "Area",
            Dimension::Warehouse => "Warehouse",
            Dimension::Route => "Route",
            Dimension::Salesman => "Salesman",
            Dimension::ItemCategory => "Item Category",
            Dimension::Item => "Items",
            Dimension::ChannelCategory => "Channel Category",
            Dimension::CustomerCategory => "Customer Category",
            Dimension::Customer => "Customer",
        }
    }

    /// Icon name for the frontend `icon()` helper.
    pub fn icon(self) -> &'static str {
        match self {
            Dimension::Company => "building",
            Dimension::Region => "globe",
            Dimension::Area => "map",
            Dimension::Warehouse => "warehouse",
            Dimension::Route => "route",
            Dimension::Salesman => "user",
            Dimension::ItemCategory => "folder",
            Dimension::Item => "package",
            Dimension::ChannelCategory => "share",
            Dimension::CustomerCategory => "tag",
            Dimension::Customer => "users",
        }
    }

    pub fn group(self) -> DimensionGroup {
        match self {
            Dimension::Company | Dimension::Region | Dimension::Area | Dimension::Warehouse => {
                DimensionGroup::Hierarchy
            }
            Dimension::Route | Dimension::Salesman => DimensionGroup::SearchBy,
            _ => DimensionGroup::MoreFilters,
        }
    }

    /// Collection key in the `/api/filters` response.
    pub fn collection_key(self) -> &'static str {
        match self {
            Dimension::Company => "companies",
            Dimension::Region => "regions",
            Dimension::Area => "areas",
            Dimension::Warehouse => "warehouses",
            Dimension::Route => "routes",
            Dimension::Salesman => "salesmen",
            Dimension::ItemCategory => "item_categories",
            Dimension::Item => "items",
            Dimension::ChannelCategory => "channel_categories",
            Dimension::CustomerCategory => "customer_categories",
            Dimension::Customer => "customers",
        }
    }

    /// Singular stem shared by the filter field, the id/name fallbacks and the table column.
    fn stem(self) -> &'static str {
        match self {
            Dimension::Company => "company",
            Dimension::Region => "region",
            Dimension::Area => "area",
            Dimension::Warehouse => "warehouse",
            Dimension::Route => "route",
            Dimension::Salesman => "salesman",
            Dimension::ItemCategory => "item_category",
            Dimension::Item => "item",
            Dimension::ChannelCategory => "channel_category",
            Dimension::CustomerCategory => "customer_category",
            Dimension::Customer => "customer",
        }
    }

    /// Request field carrying this dimension's selected ids, e.g. `warehouse_ids`.
    pub fn filter_field(self) -> String {
        format!("{}_ids", self.stem())
    }

    /// Table/export column rendered for this dimension, e.g. `customer_name`.
    pub fn column_key(self) -> String {
        format!("{}_name", self.stem())
    }

    /// Candidate id field names in a catalog record, tried in order.
    pub fn id_candidates(self) -> Vec<String> {
        vec![
            format!("{}_id", self.stem()),
            "id".to_string(),
            "code".to_string(),
        ]
    }

    /// Candidate display-name field names in a catalog record, tried in order.
    pub fn name_candidates(self) -> Vec<String> {
        vec![
            format!("{}_name", self.stem()),
            "name".to_string(),
            "label".to_string(),
            "title".to_string(),
        ]
    }

    /// Cascade graph `H`: every dimension whose selection must be reset when this
    /// one changes. Already flattened to the full downstream closure.
    pub fn descendants(self) -> &'static [Dimension] {
        use Dimension::*;
        match self {
            Company => &[Region, Area, Warehouse, Route, Salesman, Customer],
            Region => &[Area, Warehouse, Route, Salesman, Customer],
            Area => &[Warehouse, Route, Salesman, Customer],
            Warehouse => &[Route, Salesman, Customer],
            Route => &[Salesman, Customer],
            Salesman => &[Customer],
            ItemCategory => &[Item],
            Item => &[],
            ChannelCategory => &[CustomerCategory, Customer],
            CustomerCategory => &[Customer],
            Customer => &[],
        }
    }

    /// Next dimension in hierarchy order, `None` for the most granular one.
    pub fn next(self) -> Option<Dimension> {
        HIERARCHY_ORDER.get(self.rank() + 1).copied()
    }

    pub fn is_customer_group(self) -> bool {
        CUSTOMER_GROUP.contains(&self)
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_follows_hierarchy_order() {
        for (i, dim) in HIERARCHY_ORDER.iter().enumerate() {
            assert_eq!(dim.rank(), i);
        }
        assert!(Dimension::Company < Dimension::Customer);
        assert!(Dimension::Salesman < Dimension::ItemCategory);
    }

    #[test]
    fn test_slug_roundtrip() {
        for dim in Dimension::all() {
            assert_eq!(Dimension::from_slug(dim.slug()), Some(*dim));
        }
        assert_eq!(Dimension::from_slug("nope"), None);
        assert_eq!(
            serde_json::to_string(&Dimension::ChannelCategory).unwrap(),
            "\"channel-categories\""
        );
    }

    #[test]
    fn test_field_names() {
        assert_eq!(Dimension::Warehouse.filter_field(), "warehouse_ids");
        assert_eq!(Dimension::Item.filter_field(), "item_ids");
        assert_eq!(Dimension::ChannelCategory.column_key(), "channel_category_name");
        assert_eq!(Dimension::Salesman.collection_key(), "salesmen");
    }

    #[test]
    fn test_descendants_are_below_in_hierarchy() {
        for dim in Dimension::all() {
            for child in dim.descendants() {
                assert!(child > dim, "{child} listed under {dim}");
            }
        }
    }

    #[test]
    fn test_descendants_are_closed() {
        // Flattened graph: a descendant's descendants are already listed.
        for dim in Dimension::all() {
            for child in dim.descendants() {
                for grandchild in child.descendants() {
                    assert!(dim.descendants().contains(grandchild));
                }
            }
        }
    }

    #[test]
    fn test_groups() {
        assert_eq!(Dimension::Area.group(), DimensionGroup::Hierarchy);
        assert_eq!(Dimension::Route.group(), DimensionGroup::SearchBy);
        assert_eq!(Dimension::Customer.group(), DimensionGroup::MoreFilters);
        assert_eq!(Dimension::Customer.next(), None);
        assert_eq!(Dimension::Warehouse.next(), Some(Dimension::Route));
    }
}

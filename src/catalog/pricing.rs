use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One service entry under a tow type
///
/// The server-side table carries pricing fields too (rates, units, rules);
/// the form only needs the label and the display rank, the rest is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceEntry {
    /// Human readable label shown in the dropdown
    pub label: String,

    /// Explicit display order within the tow type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropdown_rank: Option<f64>,
}

impl ServiceEntry {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            dropdown_rank: None,
        }
    }

    /// Builder method: set the dropdown rank
    pub fn with_rank(mut self, rank: f64) -> Self {
        self.dropdown_rank = Some(rank);
        self
    }
}

/// A dropdown option: value plus visible label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceOption {
    pub key: String,
    pub label: String,
}

/// Tow type -> service key -> entry, in page order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PricingTable {
    tow_types: IndexMap<String, IndexMap<String, ServiceEntry>>,
}

impl PricingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the embedded pricing JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Register a service under a tow type, creating the tow type if needed
    pub fn insert(
        &mut self,
        tow_type: impl Into<String>,
        service_key: impl Into<String>,
        entry: ServiceEntry,
    ) {
        self.tow_types
            .entry(tow_type.into())
            .or_default()
            .insert(service_key.into(), entry);
    }

    /// Tow type keys in page order
    pub fn tow_types(&self) -> impl Iterator<Item = &str> {
        self.tow_types.keys().map(String::as_str)
    }

    pub fn contains_tow_type(&self, tow_type: &str) -> bool {
        self.tow_types.contains_key(tow_type)
    }

    pub fn service(&self, tow_type: &str, service_key: &str) -> Option<&ServiceEntry> {
        self.tow_types.get(tow_type)?.get(service_key)
    }

    /// Dropdown options for a tow type, ordered by rank
    ///
    /// Ascending `dropdown_rank`; entries without a rank sort after every
    /// ranked entry. The sort is stable so ties keep page order.
    /// Returns `None` for an unknown tow type.
    pub fn options_for(&self, tow_type: &str) -> Option<Vec<ServiceOption>> {
        let services = self.tow_types.get(tow_type)?;

        let mut entries: Vec<(&String, &ServiceEntry)> = services.iter().collect();
        entries.sort_by(|(_, a), (_, b)| compare_rank(a.dropdown_rank, b.dropdown_rank));

        Some(
            entries
                .into_iter()
                .map(|(key, entry)| ServiceOption {
                    key: key.clone(),
                    label: entry.label.clone(),
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.tow_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tow_types.is_empty()
    }
}

fn compare_rank(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(options: &[ServiceOption]) -> Vec<&str> {
        options.iter().map(|o| o.key.as_str()).collect()
    }

    #[test]
    fn test_rank_orders_before_unranked() {
        let json = r#"{
            "light": {
                "tow": {"label": "Tow", "dropdown_rank": 1},
                "winch": {"label": "Winch"}
            }
        }"#;
        let table = PricingTable::from_json(json).unwrap();

        let options = table.options_for("light").unwrap();
        assert_eq!(keys(&options), vec!["tow", "winch"]);
        assert_eq!(options[0].label, "Tow");
    }

    #[test]
    fn test_unranked_entries_keep_page_order() {
        let json = r#"{
            "heavy": {
                "jump_start": {"label": "Jump Start"},
                "lockout": {"label": "Lockout"},
                "recovery": {"label": "Recovery", "dropdown_rank": 3},
                "tow": {"label": "Tow", "dropdown_rank": 1},
                "fuel": {"label": "Fuel Delivery"}
            }
        }"#;
        let table = PricingTable::from_json(json).unwrap();

        let options = table.options_for("heavy").unwrap();
        assert_eq!(
            keys(&options),
            vec!["tow", "recovery", "jump_start", "lockout", "fuel"]
        );
    }

    #[test]
    fn test_equal_ranks_are_stable() {
        let mut table = PricingTable::new();
        table.insert("light", "b", ServiceEntry::new("B").with_rank(2.0));
        table.insert("light", "a", ServiceEntry::new("A").with_rank(2.0));
        table.insert("light", "c", ServiceEntry::new("C").with_rank(1.0));

        let options = table.options_for("light").unwrap();
        assert_eq!(keys(&options), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_unknown_tow_type() {
        let table = PricingTable::new();
        assert!(table.options_for("medium").is_none());
        assert!(!table.contains_tow_type("medium"));
    }

    #[test]
    fn test_extra_pricing_fields_are_ignored() {
        let json = r#"{
            "light": {
                "window_film": {
                    "label": "Window Film",
                    "pricing_type": "per_unit",
                    "dropdown_rank": 4,
                    "units": {"side_window": {"label": "Side Windows", "price": 20.0}}
                }
            }
        }"#;
        let table = PricingTable::from_json(json).unwrap();
        let entry = table.service("light", "window_film").unwrap();
        assert_eq!(entry.label, "Window Film");
        assert_eq!(entry.dropdown_rank, Some(4.0));
    }

    #[test]
    fn test_tow_types_in_page_order() {
        let json = r#"{"medium": {}, "light": {}, "heavy": {}}"#;
        let table = PricingTable::from_json(json).unwrap();
        let tow_types: Vec<_> = table.tow_types().collect();
        assert_eq!(tow_types, vec!["medium", "light", "heavy"]);
        assert_eq!(table.options_for("light").unwrap().len(), 0);
    }
}

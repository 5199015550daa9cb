//! Product data extracted from detail pages.
//!
//! Feature dictionaries carry arbitrary string keys, so they are modeled as
//! an insertion-ordered map from feature name to string value. Duplicate
//! keys keep the first occurrence only.

use chrono::{DateTime, Utc};

/// Insertion-ordered mapping from feature name to string value.
///
/// Inserting an existing key is a no-op: the first-seen value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureMap {
    entries: Vec<(String, String)>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair. Returns `false` if the key was already
    /// present, in which case the existing value is kept.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value.into()));
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for FeatureMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Everything scraped from one product detail page, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub manufacturer: String,
    /// Page title text before the first comma.
    pub name: String,
    /// Price with grouping separators stripped.
    pub price: f64,
    /// Flat feature map across all groups, first occurrence wins.
    pub features: FeatureMap,
    /// Features grouped by category heading, in page order.
    pub groups: Vec<(String, FeatureMap)>,
}

impl ProductDetails {
    /// Project this page into a record, applying the optional feature
    /// filter.
    ///
    /// Without a filter, the record carries the full field set in page
    /// order: manufacturer, name, price, scraped features, link. With a
    /// filter, the record carries exactly the requested names in filter
    /// order; bare names resolve against the flat field set, categorized
    /// entries against their category group. Any missing name fails the
    /// whole projection with the list of missing keys.
    pub fn into_record(
        self,
        link: &str,
        filter: Option<&crate::domain::target::FeatureFilter>,
    ) -> Result<ProductRecord, Vec<String>> {
        let mut fields = FeatureMap::new();
        fields.insert("manufacturer", self.manufacturer);
        fields.insert("name", self.name);
        fields.insert("price", self.price.to_string());
        for (key, value) in self.features.iter() {
            fields.insert(key, value);
        }
        fields.insert("link", link);

        let Some(filter) = filter else {
            return Ok(ProductRecord { fields });
        };

        use crate::domain::target::FeatureSelector;
        let mut selected = FeatureMap::new();
        let mut missing = Vec::new();
        for selector in filter.iter() {
            match selector {
                FeatureSelector::Name(name) => match fields.get(name) {
                    Some(value) => {
                        selected.insert(name.clone(), value);
                    }
                    None => missing.push(name.clone()),
                },
                FeatureSelector::Category { category, features } => {
                    let group = self.groups.iter().find(|(c, _)| c == category);
                    for name in features {
                        match group.and_then(|(_, map)| map.get(name)) {
                            Some(value) => {
                                selected.insert(name.clone(), value);
                            }
                            None => missing.push(format!("{category}: {name}")),
                        }
                    }
                }
            }
        }

        if missing.is_empty() {
            Ok(ProductRecord { fields: selected })
        } else {
            Err(missing)
        }
    }
}

/// One retained product: exactly the requested fields (or the full scraped
/// field set when no filter was given).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    fields: FeatureMap,
}

impl ProductRecord {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys()
    }

    pub fn fields(&self) -> &FeatureMap {
        &self.fields
    }
}

/// Result of one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeResult {
    pub records: Vec<ProductRecord>,
    /// Products visited but excluded (unsupported URL or missing features).
    pub discarded: usize,
    pub started_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::target::{FeatureFilter, FeatureSelector};

    fn details() -> ProductDetails {
        ProductDetails {
            manufacturer: "Corsair".into(),
            name: "Vengeance".into(),
            price: 119.5,
            features: [
                ("frequency".to_string(), "6000".to_string()),
                ("CL".to_string(), "CL30".to_string()),
            ]
            .into_iter()
            .collect(),
            groups: vec![
                (
                    "RAM".into(),
                    [("frequency".to_string(), "6000".to_string())]
                        .into_iter()
                        .collect(),
                ),
                (
                    "Cache".into(),
                    [("frequency".to_string(), "400".to_string())]
                        .into_iter()
                        .collect(),
                ),
            ],
        }
    }

    #[test]
    fn first_seen_value_wins_on_duplicate_keys() {
        let mut map = FeatureMap::new();
        assert!(map.insert("chipset", "AMD B650"));
        assert!(!map.insert("chipset", "Realtek ALC897"));
        assert_eq!(map.get("chipset"), Some("AMD B650"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn unfiltered_record_keeps_page_field_order() {
        let record = details().into_record("https://example.com/p", None).unwrap();
        let names: Vec<_> = record.field_names().collect();
        assert_eq!(
            names,
            ["manufacturer", "name", "price", "frequency", "CL", "link"]
        );
        assert_eq!(record.get("price"), Some("119.5"));
        assert_eq!(record.get("link"), Some("https://example.com/p"));
    }

    #[test]
    fn filtered_record_carries_exactly_the_requested_fields() {
        let filter = FeatureFilter::from_names(["price", "name", "CL"]);
        let record = details()
            .into_record("https://example.com/p", Some(&filter))
            .unwrap();
        let names: Vec<_> = record.field_names().collect();
        assert_eq!(names, ["price", "name", "CL"]);
        assert_eq!(record.get("manufacturer"), None);
        assert_eq!(record.get("link"), None);
    }

    #[test]
    fn category_qualified_entry_resolves_within_its_category() {
        // Bare `frequency` would hit the flat map (RAM value, first seen);
        // the Cache-qualified entry must pick the Cache group value.
        let filter = FeatureFilter::new(vec![
            FeatureSelector::Name("price".into()),
            FeatureSelector::Name("name".into()),
            FeatureSelector::Category {
                category: "Cache".into(),
                features: vec!["frequency".into()],
            },
        ]);
        let record = details()
            .into_record("https://example.com/p", Some(&filter))
            .unwrap();
        assert_eq!(record.get("frequency"), Some("400"));
    }

    #[test]
    fn ram_qualified_frequency_is_not_shadowed_by_cache() {
        let filter = FeatureFilter::new(vec![
            FeatureSelector::Name("price".into()),
            FeatureSelector::Name("name".into()),
            FeatureSelector::Category {
                category: "RAM".into(),
                features: vec!["frequency".into()],
            },
        ]);
        let record = details()
            .into_record("https://example.com/p", Some(&filter))
            .unwrap();
        assert_eq!(record.get("frequency"), Some("6000"));
    }

    #[test]
    fn missing_filter_keys_fail_the_projection() {
        let filter = FeatureFilter::from_names(["price", "latency", "voltage"]);
        let missing = details()
            .into_record("https://example.com/p", Some(&filter))
            .unwrap_err();
        assert_eq!(missing, ["latency", "voltage"]);
    }

    #[test]
    fn missing_category_is_reported_with_its_feature() {
        let filter = FeatureFilter::new(vec![FeatureSelector::Category {
            category: "Memory".into(),
            features: vec!["frequency".into()],
        }]);
        let missing = details()
            .into_record("https://example.com/p", Some(&filter))
            .unwrap_err();
        assert_eq!(missing, ["Memory: frequency"]);
    }
}

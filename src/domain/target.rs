//! Declarative scrape targets.
//!
//! A target pairs a search-results URL with the features to extract. Spec
//! files are YAML documents of the form:
//!
//! ```yaml
//! url: https://www.toppreise.ch/search?q=ddr5
//! features:
//!   - price
//!   - name
//!   - RAM:
//!       - frequency
//! ```
//!
//! Feature entries are either bare names or a single-key mapping that
//! qualifies feature names with a category, disambiguating same-named
//! features across categories.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::constants::toppreise;

/// One entry of a feature filter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSelector")]
pub enum FeatureSelector {
    /// Bare feature name, resolved against the flat field set.
    Name(String),
    /// Feature names resolved only within the named category group.
    Category {
        category: String,
        features: Vec<String>,
    },
}

/// Untagged YAML shape: a string, or a `{category: [names]}` mapping.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSelector {
    Name(String),
    Group(BTreeMap<String, Vec<String>>),
}

impl TryFrom<RawSelector> for FeatureSelector {
    type Error = String;

    fn try_from(raw: RawSelector) -> Result<Self, Self::Error> {
        match raw {
            RawSelector::Name(name) => Ok(Self::Name(name)),
            RawSelector::Group(map) => {
                let mut entries = map.into_iter();
                match (entries.next(), entries.next()) {
                    (Some((category, features)), None) => {
                        Ok(Self::Category { category, features })
                    }
                    _ => Err("categorized feature entry must have exactly one key".to_string()),
                }
            }
        }
    }
}

/// Ordered list of requested features.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FeatureFilter(Vec<FeatureSelector>);

impl FeatureFilter {
    pub fn new(selectors: Vec<FeatureSelector>) -> Self {
        Self(selectors)
    }

    /// Filter made of bare names only, as supplied on the command line.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            names
                .into_iter()
                .map(|n| FeatureSelector::Name(n.into()))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureSelector> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct SpecFile {
    url: String,
    features: Option<FeatureFilter>,
}

/// A scrape target: search-results URL plus optional feature filter.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeTarget {
    url: String,
    features: Option<FeatureFilter>,
}

impl ScrapeTarget {
    /// Build a target from a search-results URL. The ungrouped-variants
    /// query string is appended so every product variant lists separately.
    pub fn new(url: impl Into<String>, features: Option<FeatureFilter>) -> Self {
        let url = format!("{}?{}", url.into(), toppreise::UNGROUPED_VARIANTS_QUERY);
        Self { url, features }
    }

    /// Load a target from a YAML spec file.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read spec file {}", path.display()))?;
        let spec: SpecFile = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse spec file {}", path.display()))?;
        Ok(Self::new(spec.url, spec.features))
    }

    /// Search-results URL with the ungrouped-variants query appended.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn features(&self) -> Option<&FeatureFilter> {
        self.features.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn ungrouped_variants_query_is_appended_once() {
        let target = ScrapeTarget::new("https://www.toppreise.ch/search?q=ram", None);
        assert_eq!(
            target.url(),
            "https://www.toppreise.ch/search?q=ram?1299760721062_fi_pcds_v=0"
        );
        assert_eq!(
            target.url().matches("1299760721062_fi_pcds_v=0").count(),
            1
        );
    }

    #[test]
    fn flat_spec_file_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "url: https://www.toppreise.ch/produktliste\nfeatures:\n  - price\n  - name\n  - CL"
        )
        .unwrap();

        let target = ScrapeTarget::from_yaml(file.path()).unwrap();
        let filter = target.features().unwrap();
        let names: Vec<_> = filter.iter().collect();
        assert_eq!(
            names,
            [
                &FeatureSelector::Name("price".into()),
                &FeatureSelector::Name("name".into()),
                &FeatureSelector::Name("CL".into()),
            ]
        );
    }

    #[test]
    fn mixed_spec_file_parses_categorized_entries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "url: https://www.toppreise.ch/produktliste\n\
             features:\n  - price\n  - RAM:\n      - frequency\n      - module size"
        )
        .unwrap();

        let target = ScrapeTarget::from_yaml(file.path()).unwrap();
        let entries: Vec<_> = target.features().unwrap().iter().cloned().collect();
        assert_eq!(
            entries,
            [
                FeatureSelector::Name("price".into()),
                FeatureSelector::Category {
                    category: "RAM".into(),
                    features: vec!["frequency".into(), "module size".into()],
                },
            ]
        );
    }

    #[test]
    fn spec_without_features_has_no_filter() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "url: https://www.toppreise.ch/produktliste").unwrap();
        let target = ScrapeTarget::from_yaml(file.path()).unwrap();
        assert!(target.features().is_none());
    }

    #[test]
    fn multi_key_category_entry_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "url: https://www.toppreise.ch/produktliste\n\
             features:\n  - RAM:\n      - frequency\n    Cache:\n      - frequency"
        )
        .unwrap();
        assert!(ScrapeTarget::from_yaml(file.path()).is_err());
    }
}

//! Data set catalog: the ordered list of selectable data sets.
//!
//! A data set without a `name` is the reserved "all data sets"
//! pseudo-entry. The catalog is sorted so that the pseudo-entry (when
//! present) is always displayed first, followed by named data sets in
//! lexicographic order.

use crate::error::ConnectorError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// A logical, selectable unit of data the connector can fetch.
///
/// `name` is the stable identifier used for staging-collection naming;
/// `label_plural` is what the user sees in the selection UI. A data
/// set with no `name` is the "all data sets" pseudo-entry — selecting
/// it makes the host fetch every named data set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub label_plural: String,
}

impl Dataset {
    /// Creates a named data set.
    pub fn named(name: impl Into<String>, label_plural: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            label_plural: label_plural.into(),
        }
    }

    /// Creates the "all data sets" pseudo-entry.
    pub fn all(label_plural: impl Into<String>) -> Self {
        Self {
            name: None,
            label_plural: label_plural.into(),
        }
    }

    /// Returns true for the "all data sets" pseudo-entry.
    pub fn is_all(&self) -> bool {
        self.name.is_none()
    }
}

/// Sorts a catalog in place: the "all data sets" pseudo-entry first,
/// then named data sets in lexicographic name order. The sort is
/// stable.
pub fn sort_datasets(datasets: &mut [Dataset]) {
    datasets.sort_by(compare_datasets);
}

fn compare_datasets(a: &Dataset, b: &Dataset) -> Ordering {
    match (&a.name, &b.name) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

/// Validates catalog invariants: at most one pseudo-entry, no
/// duplicate names.
pub fn validate_catalog(datasets: &[Dataset]) -> Result<(), ConnectorError> {
    let mut seen = HashSet::new();
    let mut all_entries = 0usize;
    for dataset in datasets {
        match &dataset.name {
            None => {
                all_entries += 1;
                if all_entries > 1 {
                    return Err(ConnectorError::Catalog(
                        "more than one 'all data sets' entry".to_string(),
                    ));
                }
            }
            Some(name) => {
                if !seen.insert(name.as_str()) {
                    return Err(ConnectorError::Catalog(format!(
                        "duplicate data set name '{}'",
                        name
                    )));
                }
            }
        }
    }
    Ok(())
}

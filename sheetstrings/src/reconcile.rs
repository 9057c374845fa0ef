//! Merging spreadsheet values into an existing resource map.
//!
//! Rules:
//! - A present cell for a key missing from the prior map is a create.
//! - A present cell for a key already in the prior map is an update, even when
//!   the value is unchanged.
//! - An absent cell is skipped; the prior value (if any) stays.
//! - An empty string is a present cell.
//! - Nothing is ever removed.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::ResourceMap;

/// Outcome of reconciling one language column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Reconciliation {
    /// Keys that were not in the prior map.
    pub to_create: BTreeSet<String>,
    /// Keys that were in the prior map and received a value from the sheet.
    pub to_update: BTreeSet<String>,
    /// Keys whose value differs from the prior map.
    pub changed: BTreeSet<String>,
    /// Final content: the prior map with every supplied value applied.
    pub map: ResourceMap,
}

impl Reconciliation {
    /// Whether the final map differs from the prior one.
    pub fn has_changes(&self) -> bool {
        !self.to_create.is_empty() || !self.changed.is_empty()
    }
}

/// Applies a language column to `existing`.
///
/// `column` yields `(key, cell)` pairs in sheet order. When a key repeats,
/// the last present value wins; classification is always against
/// `existing`, so `to_create` and `to_update` never overlap.
pub fn reconcile<'a, I>(existing: ResourceMap, column: I) -> Reconciliation
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut result = Reconciliation::default();
    let mut map = existing.clone();

    for (key, cell) in column {
        let Some(value) = cell else {
            continue;
        };

        match existing.get(key) {
            None => {
                result.to_create.insert(key.to_string());
            }
            Some(prior) => {
                result.to_update.insert(key.to_string());
                if prior != value {
                    result.changed.insert(key.to_string());
                } else {
                    result.changed.remove(key);
                }
            }
        }
        map.insert(key, value);
    }

    result.map = map;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing(pairs: &[(&str, &str)]) -> ResourceMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_new_key_is_created() {
        let result = reconcile(ResourceMap::new(), [("greeting", Some("Hello"))]);
        assert!(result.to_create.contains("greeting"));
        assert!(result.to_update.is_empty());
        assert_eq!(result.map.get("greeting"), Some("Hello"));
        assert!(result.has_changes());
    }

    #[test]
    fn test_existing_key_is_updated() {
        let result = reconcile(existing(&[("greeting", "Hi")]), [("greeting", Some("Hello"))]);
        assert!(result.to_create.is_empty());
        assert!(result.to_update.contains("greeting"));
        assert!(result.changed.contains("greeting"));
        assert_eq!(result.map.get("greeting"), Some("Hello"));
    }

    #[test]
    fn test_unchanged_value_is_still_update() {
        let result = reconcile(existing(&[("greeting", "Hello")]), [("greeting", Some("Hello"))]);
        assert!(result.to_update.contains("greeting"));
        assert!(result.changed.is_empty());
        assert!(!result.has_changes());
    }

    #[test]
    fn test_absent_cell_preserves_existing() {
        let result = reconcile(
            existing(&[("greeting", "Hi")]),
            [("greeting", None), ("new", None)],
        );
        assert!(result.to_create.is_empty());
        assert!(result.to_update.is_empty());
        assert_eq!(result.map, existing(&[("greeting", "Hi")]));
    }

    #[test]
    fn test_empty_string_is_a_translation() {
        let result = reconcile(
            existing(&[("greeting", "Hi")]),
            [("greeting", Some("")), ("blank", Some(""))],
        );
        assert_eq!(result.map.get("greeting"), Some(""));
        assert_eq!(result.map.get("blank"), Some(""));
        assert!(result.to_create.contains("blank"));
        assert!(result.to_update.contains("greeting"));
    }

    #[test]
    fn test_keys_missing_from_column_are_kept() {
        let result = reconcile(existing(&[("farewell", "Bye")]), [("greeting", Some("Hello"))]);
        assert_eq!(result.map.get("farewell"), Some("Bye"));
        assert_eq!(result.map.len(), 2);
    }

    #[test]
    fn test_duplicate_key_last_wins_and_sets_stay_disjoint() {
        let result = reconcile(
            existing(&[("old", "x")]),
            [
                ("dup", Some("first")),
                ("dup", Some("second")),
                ("old", Some("y")),
                ("old", Some("x")),
            ],
        );
        assert_eq!(result.map.get("dup"), Some("second"));
        assert_eq!(result.map.get("old"), Some("x"));
        assert!(result.to_create.contains("dup"));
        assert!(result.to_update.contains("old"));
        assert!(result.to_create.is_disjoint(&result.to_update));
        assert!(result.changed.is_empty());
    }
}

//! Name index over the catalogue.
//!
//! Activity names are only unique within a sub-dimension, but dependencies
//! refer to activities by bare name. The index keeps every activity in
//! catalogue order (dimension, then sub-dimension, then activity) and
//! resolves a name to the first entry carrying it.

use crate::model::{Activity, ActivityEntry, Catalogue};
use std::collections::HashMap;

/// An activity in the index arena. `position` is its slot in catalogue order.
#[derive(Debug, Clone, Copy)]
pub struct ActivityRef<'a> {
    pub position: usize,
    pub dimension: &'a str,
    pub sub_dimension: &'a str,
    pub name: &'a str,
    pub activity: &'a Activity,
}

/// Arena of all activities plus name and uuid lookup tables.
pub struct ActivityIndex<'a> {
    entries: Vec<ActivityRef<'a>>,
    by_name: HashMap<&'a str, Vec<usize>>,
    by_uuid: HashMap<&'a str, Vec<usize>>,
}

impl<'a> ActivityIndex<'a> {
    pub fn new(catalogue: &'a Catalogue) -> Self {
        let mut entries = Vec::new();
        let mut by_name: HashMap<&'a str, Vec<usize>> = HashMap::new();
        let mut by_uuid: HashMap<&'a str, Vec<usize>> = HashMap::new();

        for (position, entry) in catalogue.activities().enumerate() {
            let ActivityEntry {
                dimension,
                sub_dimension,
                name,
                activity,
            } = entry;
            by_name.entry(name).or_default().push(position);
            if let Some(uuid) = activity.uuid.as_deref() {
                by_uuid.entry(uuid).or_default().push(position);
            }
            entries.push(ActivityRef {
                position,
                dimension,
                sub_dimension,
                name,
                activity,
            });
        }

        ActivityIndex {
            entries,
            by_name,
            by_uuid,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ActivityRef<'a>] {
        &self.entries
    }

    pub fn get(&self, position: usize) -> Option<&ActivityRef<'a>> {
        self.entries.get(position)
    }

    /// Every activity carrying `name`, in catalogue order.
    pub fn find_all_by_name(&self, name: &str) -> Vec<&ActivityRef<'a>> {
        self.by_name
            .get(name)
            .map(|positions| positions.iter().map(|&p| &self.entries[p]).collect())
            .unwrap_or_default()
    }

    /// The first activity carrying `name` in catalogue order, if any.
    pub fn get_element_by_name(&self, name: &str) -> Option<&ActivityRef<'a>> {
        self.by_name
            .get(name)
            .and_then(|positions| positions.first())
            .map(|&p| &self.entries[p])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Names carried by more than one activity, sorted, each with all of
    /// its locations in catalogue order.
    pub fn duplicates(&self) -> Vec<(&'a str, Vec<&ActivityRef<'a>>)> {
        self.shared(&self.by_name)
    }

    /// The first activity in catalogue order whose `uuid` matches.
    pub fn find_by_uuid(&self, uuid: &str) -> Option<&ActivityRef<'a>> {
        self.by_uuid
            .get(uuid)
            .and_then(|positions| positions.first())
            .map(|&p| &self.entries[p])
    }

    /// Uuids carried by more than one activity, sorted, each with all of
    /// its owners in catalogue order.
    pub fn duplicate_uuids(&self) -> Vec<(&'a str, Vec<&ActivityRef<'a>>)> {
        self.shared(&self.by_uuid)
    }

    fn shared(&self, table: &HashMap<&'a str, Vec<usize>>) -> Vec<(&'a str, Vec<&ActivityRef<'a>>)> {
        let mut dups: Vec<(&'a str, Vec<&ActivityRef<'a>>)> = table
            .iter()
            .filter(|(_, positions)| positions.len() > 1)
            .map(|(key, positions)| (*key, positions.iter().map(|&p| &self.entries[p]).collect()))
            .collect();
        dups.sort_by(|a, b| a.0.cmp(b.0));
        dups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> serde_json::Value {
        json!({
            "level": 1,
            "usefulness": 1,
            "difficultyOfImplementation": {"knowledge": 1, "time": 1, "resources": 1}
        })
    }

    fn catalogue() -> Catalogue {
        Catalogue::from_value(&json!({
            "Culture and Organization": {
                "Process": {"Shared": record(), "Only here": record()}
            },
            "Build and Deployment": {
                "Build": {"Shared": record()},
                "Deployment": {"Rollback": record()}
            }
        }))
        .unwrap()
    }

    #[test]
    fn first_match_follows_catalogue_order() {
        let catalogue = catalogue();
        let index = ActivityIndex::new(&catalogue);
        let hit = index.get_element_by_name("Shared").unwrap();
        // "Build and Deployment" sorts before "Culture and Organization"
        assert_eq!(hit.dimension, "Build and Deployment");
        assert_eq!(hit.sub_dimension, "Build");
    }

    #[test]
    fn find_all_returns_every_location() {
        let catalogue = catalogue();
        let index = ActivityIndex::new(&catalogue);
        let all = index.find_all_by_name("Shared");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].dimension, "Build and Deployment");
        assert_eq!(all[1].dimension, "Culture and Organization");
    }

    #[test]
    fn unknown_name_is_none() {
        let catalogue = catalogue();
        let index = ActivityIndex::new(&catalogue);
        assert!(index.get_element_by_name("Nope").is_none());
        assert!(index.find_all_by_name("Nope").is_empty());
        assert!(!index.contains("Nope"));
    }

    #[test]
    fn duplicates_are_reported() {
        let catalogue = catalogue();
        let index = ActivityIndex::new(&catalogue);
        let dups = index.duplicates();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].0, "Shared");
        assert_eq!(dups[0].1.len(), 2);
    }

    #[test]
    fn shared_uuid_resolves_to_first_owner() {
        let owned = |uuid: &str| {
            let mut value = record();
            value["uuid"] = json!(uuid);
            value
        };
        let catalogue = Catalogue::from_value(&json!({
            "D": {"S": {"Other": owned("u-1"), "Base": owned("u-1"), "Solo": owned("u-2")}}
        }))
        .unwrap();
        let index = ActivityIndex::new(&catalogue);
        assert_eq!(index.find_by_uuid("u-1").map(|e| e.name), Some("Base"));
        assert_eq!(index.find_by_uuid("u-2").map(|e| e.name), Some("Solo"));
        assert!(index.find_by_uuid("u-3").is_none());

        let dups = index.duplicate_uuids();
        assert_eq!(dups.len(), 1);
        let owners: Vec<&str> = dups[0].1.iter().map(|e| e.name).collect();
        assert_eq!(owners, vec!["Base", "Other"]);
    }

    #[test]
    fn positions_match_slots() {
        let catalogue = catalogue();
        let index = ActivityIndex::new(&catalogue);
        assert_eq!(index.len(), 4);
        for (i, entry) in index.entries().iter().enumerate() {
            assert_eq!(entry.position, i);
            assert_eq!(index.get(i).map(|e| e.name), Some(entry.name));
        }
    }
}

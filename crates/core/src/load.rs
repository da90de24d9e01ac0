//! Catalogue loading from YAML files.
//!
//! A catalogue file holds either a single document (the dimension map) or a
//! `meta` document followed by the dimension map. Several files merge in
//! order. A later record overrides an earlier activity field by field; the
//! earlier activity is found by `uuid` when the record has one, otherwise by
//! name. `ignore` keys drop earlier definitions before the file is merged:
//! under a dimension it drops that dimension, under a sub-dimension it drops
//! every sub-dimension of that name, and `ignore: true` on an activity drops
//! the earlier activity with the same uuid (or name, without a uuid).

use crate::error::CatalogueError;
use crate::migrate::{prepare, LoadedCatalogue};
use crate::model::{is_metadata_key, Catalogue};
use crate::report::{Finding, FindingSeverity};
use crate::source::{FileSystemProvider, SourceProvider};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Top-level key holding YAML anchors for reference lists; not a dimension.
pub const YAML_REFERENCES_KEY: &str = "_yaml_references";

/// Key marking earlier definitions to drop (see the module docs).
pub const IGNORE_KEY: &str = "ignore";

/// Load, merge and migrate the catalogue files at `paths`.
pub fn load_catalogue(
    provider: &dyn SourceProvider,
    paths: &[PathBuf],
) -> Result<LoadedCatalogue, CatalogueError> {
    let mut merged = Map::new();
    let mut findings = Vec::new();
    for path in paths {
        let text = provider
            .read_source(path)
            .map_err(|source| CatalogueError::Io {
                path: path.clone(),
                source,
            })?;
        let dimensions = parse_catalogue_text(path, &text)?;
        tracing::debug!(
            path = %path.display(),
            dimensions = dimensions.len(),
            "read catalogue file"
        );
        let contents = CatalogueFile::split(dimensions, path)?;
        contents.merge_into(&mut merged, path, &mut findings);
    }

    let catalogue = Catalogue::from_value(&Value::Object(merged))?;
    let mut loaded = prepare(catalogue)?;
    findings.append(&mut loaded.findings);
    loaded.findings = findings;
    tracing::info!(
        files = paths.len(),
        dimensions = loaded.catalogue.dimensions.len(),
        activities = loaded.catalogue.activity_count(),
        findings = loaded.findings.len(),
        "loaded catalogue"
    );
    Ok(loaded)
}

/// [`load_catalogue`] reading from the local filesystem.
pub fn load_catalogue_files(paths: &[PathBuf]) -> Result<LoadedCatalogue, CatalogueError> {
    load_catalogue(&FileSystemProvider, paths)
}

/// Parse one catalogue file into its dimension map.
pub fn parse_catalogue_text(path: &Path, text: &str) -> Result<Map<String, Value>, CatalogueError> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document).map_err(|e| CatalogueError::Yaml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        documents.push(value);
    }

    let data = match documents.len() {
        0 => Value::Null,
        1 => documents.remove(0),
        2 if has_meta(&documents[0]) => documents.remove(1),
        2 => {
            return Err(CatalogueError::Layout {
                path: path.to_path_buf(),
                message: "first of two documents must carry a 'meta' key".to_string(),
            })
        }
        n => {
            return Err(CatalogueError::Layout {
                path: path.to_path_buf(),
                message: format!("expected 1 or 2 documents, found {}", n),
            })
        }
    };

    let mut dimensions = match data {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        _ => {
            return Err(CatalogueError::Layout {
                path: path.to_path_buf(),
                message: "dimension document must be a mapping".to_string(),
            })
        }
    };
    dimensions.remove(YAML_REFERENCES_KEY);
    Ok(dimensions)
}

fn has_meta(document: &Value) -> bool {
    document
        .as_object()
        .is_some_and(|map| map.contains_key("meta"))
}

// ── Merging ──────────────────────────────────────────────────────────────────

/// Where an activity record sits in the merged dimension map.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    dimension: String,
    sub_dimension: String,
    name: String,
}

/// Earlier definitions a file asks to drop.
#[derive(Debug, Default)]
struct IgnoreList {
    dimensions: BTreeSet<String>,
    sub_dimensions: BTreeSet<String>,
    uuids: BTreeSet<String>,
    names: BTreeSet<String>,
}

impl IgnoreList {
    fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
            && self.sub_dimensions.is_empty()
            && self.uuids.is_empty()
            && self.names.is_empty()
    }

    fn drops(&self, name: &str, record: &Value) -> bool {
        self.names.contains(name) || record_uuid(record).is_some_and(|u| self.uuids.contains(u))
    }

    fn apply(&self, merged: &mut Map<String, Value>) {
        if self.is_empty() {
            return;
        }
        merged.retain(|dimension, _| !self.dimensions.contains(dimension));
        for subs in merged.values_mut().filter_map(Value::as_object_mut) {
            subs.retain(|sub, _| !self.sub_dimensions.contains(sub));
            for (sub, group) in subs.iter_mut() {
                if is_metadata_key(sub) {
                    continue;
                }
                if let Some(activities) = group.as_object_mut() {
                    activities.retain(|name, record| !self.drops(name, record));
                }
            }
        }
    }
}

/// One catalogue file taken apart: its metadata blocks, the activity
/// records it defines and the earlier definitions it drops. Dimensions and
/// sub-dimensions exist only through what they contain.
#[derive(Debug, Default)]
struct CatalogueFile {
    metadata: Vec<(String, String, Value)>,
    activities: Vec<(Slot, Value)>,
    ignored: IgnoreList,
}

impl CatalogueFile {
    fn split(dimensions: Map<String, Value>, path: &Path) -> Result<Self, CatalogueError> {
        let mut file = CatalogueFile::default();
        for (dim_name, dim_value) in dimensions {
            let Value::Object(subs) = dim_value else {
                return Err(CatalogueError::Structure(format!(
                    "dimension '{}' in '{}' must be a mapping of sub-dimensions",
                    dim_name,
                    path.display()
                )));
            };
            for (sub_name, sub_value) in subs {
                if sub_name == IGNORE_KEY {
                    file.ignored.dimensions.insert(dim_name.clone());
                    continue;
                }
                if is_metadata_key(&sub_name) {
                    file.metadata.push((dim_name.clone(), sub_name, sub_value));
                    continue;
                }
                let Value::Object(records) = sub_value else {
                    return Err(CatalogueError::Structure(format!(
                        "sub-dimension '{}' in '{}' must be a mapping of activities",
                        sub_name,
                        path.display()
                    )));
                };
                for (name, record) in records {
                    if name == IGNORE_KEY {
                        file.ignored.sub_dimensions.insert(sub_name.clone());
                        continue;
                    }
                    if record.get(IGNORE_KEY) == Some(&Value::Bool(true)) {
                        match record_uuid(&record) {
                            Some(uuid) => file.ignored.uuids.insert(uuid.to_string()),
                            None => file.ignored.names.insert(name),
                        };
                        continue;
                    }
                    let slot = Slot {
                        dimension: dim_name.clone(),
                        sub_dimension: sub_name.clone(),
                        name,
                    };
                    file.activities.push((slot, record));
                }
            }
        }
        Ok(file)
    }

    fn merge_into(self, merged: &mut Map<String, Value>, path: &Path, findings: &mut Vec<Finding>) {
        if !self.ignored.is_empty() {
            tracing::debug!(
                path = %path.display(),
                dimensions = self.ignored.dimensions.len(),
                sub_dimensions = self.ignored.sub_dimensions.len(),
                activities = self.ignored.uuids.len() + self.ignored.names.len(),
                "dropping ignored definitions"
            );
        }
        self.ignored.apply(merged);

        for (dimension, key, value) in self.metadata {
            if let Some(subs) = object_entry(merged, &dimension) {
                subs.insert(key, value);
            }
        }

        // records only match activities from earlier files
        let mut earlier = Lookups::of(merged);
        for (target, record) in self.activities {
            let matched = match record_uuid(&record) {
                Some(uuid) => earlier.by_uuid.get(uuid).cloned().or_else(|| {
                    if let Some(slot) = earlier.named_like(&target) {
                        findings.push(uuid_conflict(merged, &slot, uuid, path));
                    }
                    None
                }),
                None => earlier.named_like(&target),
            };

            match matched {
                Some(slot) => {
                    let mut base = take(merged, &slot).unwrap_or_else(|| Value::Object(Map::new()));
                    overlay(&mut base, record);
                    if let Some(group) = group_mut(merged, &target) {
                        group.insert(target.name.clone(), base);
                    }
                    tracing::debug!(
                        activity = target.name.as_str(),
                        from = %format!("{} / {}", slot.dimension, slot.sub_dimension),
                        path = %path.display(),
                        "activity overridden by later catalogue file"
                    );
                    earlier.repoint(&slot, &target);
                }
                None => {
                    if let Some(group) = group_mut(merged, &target) {
                        match group.get_mut(&target.name) {
                            Some(existing) => overlay(existing, record),
                            None => {
                                group.insert(target.name, record);
                            }
                        }
                    }
                }
            }
        }

        prune_empty(merged);
    }
}

/// Drop activity groups left without records, then dimensions left empty.
fn prune_empty(merged: &mut Map<String, Value>) {
    for subs in merged.values_mut().filter_map(Value::as_object_mut) {
        subs.retain(|sub, group| {
            is_metadata_key(sub) || group.as_object().map_or(true, |g| !g.is_empty())
        });
    }
    merged.retain(|_, subs| subs.as_object().map_or(true, |s| !s.is_empty()));
}

/// Activities already in the merged map, by uuid (first owner) and by name.
struct Lookups {
    by_uuid: HashMap<String, Slot>,
    by_name: HashMap<String, Vec<Slot>>,
}

impl Lookups {
    fn of(merged: &Map<String, Value>) -> Self {
        let mut lookups = Lookups {
            by_uuid: HashMap::new(),
            by_name: HashMap::new(),
        };
        for (dimension, subs) in merged {
            let Some(subs) = subs.as_object() else { continue };
            for (sub_dimension, group) in subs {
                if is_metadata_key(sub_dimension) {
                    continue;
                }
                let Some(group) = group.as_object() else { continue };
                for (name, record) in group {
                    let slot = Slot {
                        dimension: dimension.clone(),
                        sub_dimension: sub_dimension.clone(),
                        name: name.clone(),
                    };
                    if let Some(uuid) = record_uuid(record) {
                        lookups
                            .by_uuid
                            .entry(uuid.to_string())
                            .or_insert_with(|| slot.clone());
                    }
                    lookups.by_name.entry(name.clone()).or_default().push(slot);
                }
            }
        }
        lookups
    }

    /// The earlier activity named like `target`: the one at the same
    /// location when there is one, else the first in catalogue order.
    fn named_like(&self, target: &Slot) -> Option<Slot> {
        let slots = self.by_name.get(&target.name)?;
        slots
            .iter()
            .find(|slot| *slot == target)
            .or_else(|| slots.first())
            .cloned()
    }

    fn repoint(&mut self, from: &Slot, to: &Slot) {
        let slots = self
            .by_uuid
            .values_mut()
            .chain(self.by_name.values_mut().flatten());
        for slot in slots {
            if slot == from {
                *slot = to.clone();
            }
        }
        if from.name != to.name {
            self.by_name.entry(to.name.clone()).or_default().push(to.clone());
        }
    }
}

fn uuid_conflict(merged: &Map<String, Value>, slot: &Slot, uuid: &str, path: &Path) -> Finding {
    let existing = peek(merged, slot)
        .and_then(record_uuid)
        .unwrap_or("none")
        .to_string();
    tracing::warn!(
        activity = slot.name.as_str(),
        uuid,
        existing = existing.as_str(),
        path = %path.display(),
        "activity defined again with a different uuid"
    );
    Finding {
        check: "uuid_conflict".to_string(),
        severity: FindingSeverity::Warning,
        message: format!(
            "Activity '{}' exists with different uuids ({} and {})",
            slot.name, uuid, existing
        ),
        activity: Some(slot.name.clone()),
        details: Some(serde_json::json!({
            "uuids": [uuid, existing],
            "file": path.display().to_string(),
        })),
    }
}

fn record_uuid(record: &Value) -> Option<&str> {
    record.get("uuid").and_then(Value::as_str)
}

/// Copy every field of `record` over `base`, keeping fields it does not set.
fn overlay(base: &mut Value, record: Value) {
    match (base, record) {
        (Value::Object(base), Value::Object(fields)) => base.extend(fields),
        (base, record) => *base = record,
    }
}

fn object_entry<'m>(map: &'m mut Map<String, Value>, key: &str) -> Option<&'m mut Map<String, Value>> {
    map.entry(key)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
}

fn group_mut<'m>(merged: &'m mut Map<String, Value>, slot: &Slot) -> Option<&'m mut Map<String, Value>> {
    object_entry(object_entry(merged, &slot.dimension)?, &slot.sub_dimension)
}

fn peek<'m>(merged: &'m Map<String, Value>, slot: &Slot) -> Option<&'m Value> {
    merged
        .get(&slot.dimension)?
        .get(&slot.sub_dimension)?
        .get(&slot.name)
}

fn take(merged: &mut Map<String, Value>, slot: &Slot) -> Option<Value> {
    merged
        .get_mut(&slot.dimension)?
        .get_mut(&slot.sub_dimension)?
        .as_object_mut()?
        .remove(&slot.name)
}

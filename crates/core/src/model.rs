//! Catalogue data model: dimensions, sub-dimensions and activities.
//!
//! All three levels are key-sorted maps, so iteration order is the
//! catalogue order used by name lookups (first match wins).

use crate::error::CatalogueError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix marking a sub-dimension key as metadata rather than an activity group.
pub const METADATA_PREFIX: char = '_';

/// Activities of one sub-dimension, keyed by activity name.
pub type SubDimension = BTreeMap<String, Activity>;

/// The full activity catalogue.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalogue {
    pub dimensions: BTreeMap<String, Dimension>,
}

/// A dimension: activity groups plus opaque `_`-prefixed metadata blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dimension {
    pub sub_dimensions: BTreeMap<String, SubDimension>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// A single security activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub level: u8,
    pub usefulness: u8,
    #[serde(rename = "difficultyOfImplementation")]
    pub difficulty: DifficultyOfImplementation,
    #[serde(rename = "dependsOn", default)]
    pub depends_on: Vec<String>,
    /// Reference system name (e.g. `samm2`) to reference codes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub references: BTreeMap<String, Vec<String>>,
    /// Legacy top-level SAMM2 mapping; folded into `references` on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samm2: Option<Vec<String>>,
    /// Legacy top-level ISO 27001:2017 mapping; folded into `references` on load.
    #[serde(
        rename = "iso27001-2017",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub iso27001_2017: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<serde_json::Value>,
    #[serde(
        rename = "md-description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub md_description: Option<serde_json::Value>,
    /// Descriptive fields the scoring engine does not interpret
    /// (risk, measure, tags, evidence, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Composite effort rating of an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyOfImplementation {
    pub knowledge: Knowledge,
    pub time: u8,
    pub resources: u8,
}

/// Required knowledge: one rating, or one rating per area
/// (operation, development, expertise, security).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Knowledge {
    Scalar(u8),
    Areas(Vec<u8>),
}

/// One activity located in the catalogue.
#[derive(Debug, Clone, Copy)]
pub struct ActivityEntry<'a> {
    pub dimension: &'a str,
    pub sub_dimension: &'a str,
    pub name: &'a str,
    pub activity: &'a Activity,
}

/// Whether a sub-dimension key names a metadata block.
pub fn is_metadata_key(key: &str) -> bool {
    key.starts_with(METADATA_PREFIX)
}

impl Catalogue {
    /// Build a catalogue from an already-parsed
    /// `dimension -> sub-dimension -> activity -> record` mapping.
    ///
    /// Records are decoded as-is; the load-time migration pass
    /// ([`crate::migrate::prepare`]) is not applied here.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, CatalogueError> {
        let dims = value.as_object().ok_or_else(|| {
            CatalogueError::Structure("expected a mapping of dimensions".to_string())
        })?;

        let mut dimensions = BTreeMap::new();
        for (dim_name, dim_value) in dims {
            let subs = dim_value.as_object().ok_or_else(|| {
                CatalogueError::Structure(format!(
                    "dimension '{}' must be a mapping of sub-dimensions",
                    dim_name
                ))
            })?;

            let mut dimension = Dimension::default();
            for (sub_name, sub_value) in subs {
                if is_metadata_key(sub_name) {
                    dimension
                        .metadata
                        .insert(sub_name.clone(), sub_value.clone());
                    continue;
                }
                let records = sub_value.as_object().ok_or_else(|| {
                    CatalogueError::Structure(format!(
                        "sub-dimension '{}' in '{}' must be a mapping of activities",
                        sub_name, dim_name
                    ))
                })?;

                let mut activities = SubDimension::new();
                for (activity_name, record) in records {
                    let activity: Activity =
                        serde_json::from_value(record.clone()).map_err(|e| {
                            CatalogueError::InvalidActivity {
                                dimension: dim_name.clone(),
                                sub_dimension: sub_name.clone(),
                                activity: activity_name.clone(),
                                message: e.to_string(),
                            }
                        })?;
                    activities.insert(activity_name.clone(), activity);
                }
                dimension.sub_dimensions.insert(sub_name.clone(), activities);
            }
            dimensions.insert(dim_name.clone(), dimension);
        }

        Ok(Catalogue { dimensions })
    }

    /// Every activity in catalogue order, metadata blocks skipped.
    pub fn activities(&self) -> impl Iterator<Item = ActivityEntry<'_>> {
        self.dimensions.iter().flat_map(|(dim_name, dimension)| {
            dimension
                .sub_dimensions
                .iter()
                .flat_map(move |(sub_name, activities)| {
                    activities.iter().map(move |(name, activity)| ActivityEntry {
                        dimension: dim_name,
                        sub_dimension: sub_name,
                        name,
                        activity,
                    })
                })
        })
    }

    /// Mutable access to every activity, metadata blocks skipped.
    pub fn activities_mut(&mut self) -> impl Iterator<Item = (&str, &mut Activity)> {
        self.dimensions.values_mut().flat_map(|dimension| {
            dimension
                .sub_dimensions
                .values_mut()
                .flat_map(|activities| activities.iter_mut().map(|(n, a)| (n.as_str(), a)))
        })
    }

    pub fn activity_count(&self) -> usize {
        self.activities().count()
    }
}

//! Declared `dependsOn` relations as a flat edge list.

use crate::index::ActivityIndex;
use crate::model::Catalogue;
use serde::Serialize;

/// A declared `dependsOn` relation: `from` depends on `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
    pub dimension: String,
    pub sub_dimension: String,
    pub from: String,
    pub to: String,
    /// Whether `to` names an activity of the catalogue.
    pub resolved: bool,
}

/// Every declared dependency, grouped per sub-dimension in catalogue order.
pub fn dependency_edges(catalogue: &Catalogue) -> Vec<DependencyEdge> {
    let index = ActivityIndex::new(catalogue);
    index
        .entries()
        .iter()
        .flat_map(|entry| {
            entry.activity.depends_on.iter().map(|to| DependencyEdge {
                dimension: entry.dimension.to_string(),
                sub_dimension: entry.sub_dimension.to_string(),
                from: entry.name.to_string(),
                to: to.clone(),
                resolved: index.contains(to),
            })
        })
        .collect()
}

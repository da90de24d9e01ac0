//! Selection filter: keep the activities whose selection state the report
//! asks for.

use crate::model::{Catalogue, Dimension, SubDimension};
use crate::options::ReportOptions;
use std::collections::BTreeSet;

/// Subset of `catalogue` matching the `performed` / `planned` flags of
/// `options`, given the set of selected activity names.
///
/// Dimension and sub-dimension grouping is preserved; groups left without
/// any activity are dropped, as are metadata blocks.
pub fn filter_by_state(
    catalogue: &Catalogue,
    selection: &BTreeSet<String>,
    options: ReportOptions,
) -> Catalogue {
    let mut filtered = Catalogue::default();

    for (dim_name, dimension) in &catalogue.dimensions {
        let mut kept = Dimension::default();
        for (sub_name, activities) in &dimension.sub_dimensions {
            let matching: SubDimension = activities
                .iter()
                .filter(|(name, _)| options.includes(selection.contains(name.as_str())))
                .map(|(name, activity)| (name.clone(), activity.clone()))
                .collect();
            if !matching.is_empty() {
                kept.sub_dimensions.insert(sub_name.clone(), matching);
            }
        }
        if !kept.sub_dimensions.is_empty() {
            filtered.dimensions.insert(dim_name.clone(), kept);
        }
    }

    filtered
}

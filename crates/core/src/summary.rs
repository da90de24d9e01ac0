//! Usefulness / hardness summary per sub-dimension and level.
//!
//! For every sub-dimension and maturity level the summary gives the mean and
//! population standard deviation of the activities' usefulness ratings and
//! of their difficulty elements, plus a five-step band for each mean.

use crate::error::CyclicDependencyError;
use crate::index::ActivityIndex;
use crate::model::Catalogue;
use crate::resolve::collect_difficulty_elements;
use serde::Serialize;
use std::collections::BTreeMap;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 4;

/// Five-step rating band, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Band {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

const BANDS: [Band; 5] = [Band::VeryLow, Band::Low, Band::Medium, Band::High, Band::VeryHigh];

impl Band {
    /// Band of a mean rating. Means just under a half-step already count
    /// towards the lower band.
    pub fn from_mean(value: f64) -> Band {
        if value < 1.49 {
            Band::VeryLow
        } else if value < 2.49 {
            Band::Low
        } else if value < 3.49 {
            Band::Medium
        } else if value < 4.49 {
            Band::High
        } else {
            Band::VeryHigh
        }
    }

    /// Band of a single 1..=5 rating.
    pub fn from_rating(rating: u8) -> Option<Band> {
        BANDS.get(usize::from(rating).checked_sub(1)?).copied()
    }

    /// The band mirrored around `Medium`.
    pub fn reversed(self) -> Band {
        BANDS[BANDS.len() - 1 - self as usize]
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::VeryLow => "Very Low",
            Band::Low => "Low",
            Band::Medium => "Medium",
            Band::High => "High",
            Band::VeryHigh => "Very High",
        }
    }

    /// Label used for knowledge ratings, hinting at the disciplines involved.
    pub fn knowledge_label(self) -> &'static str {
        match self {
            Band::VeryLow => "Very Low (one discipline)",
            Band::Low => "Low (one discipline)",
            Band::Medium => "Medium (two disciplines)",
            Band::High => "High (two disciplines)",
            Band::VeryHigh => "Very High (three or more disciplines)",
        }
    }
}

/// Mean and population standard deviation of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
}

impl Stats {
    pub fn of(values: &[f64]) -> Option<Stats> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Stats {
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelSummary {
    pub activity_count: usize,
    pub usefulness: Stats,
    /// Higher usefulness is better, so its band runs the other way round.
    pub usefulness_band: Band,
    pub difficulty: Stats,
    pub difficulty_band: Band,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubDimensionSummary {
    pub dimension: String,
    pub sub_dimension: String,
    /// Keyed by level; levels without activities are absent.
    pub levels: BTreeMap<u8, LevelSummary>,
}

/// Summarize usefulness and difficulty for every sub-dimension and level.
///
/// With `aggregated` set, each activity's difficulty elements include those
/// of its dependencies.
pub fn summarize(
    catalogue: &Catalogue,
    aggregated: bool,
) -> Result<Vec<SubDimensionSummary>, CyclicDependencyError> {
    let index = ActivityIndex::new(catalogue);
    let mut summaries = Vec::new();

    for (dim_name, dimension) in &catalogue.dimensions {
        for sub_name in dimension.sub_dimensions.keys() {
            let mut levels = BTreeMap::new();
            for level in MIN_LEVEL..=MAX_LEVEL {
                let mut usefulness = Vec::new();
                let mut elements = Vec::new();
                for entry in index.entries().iter().filter(|e| {
                    e.dimension == dim_name
                        && e.sub_dimension == sub_name
                        && e.activity.level == level
                }) {
                    usefulness.push(f64::from(entry.activity.usefulness));
                    collect_difficulty_elements(&index, Some(entry), aggregated, &mut elements)?;
                }
                let (Some(useful), Some(difficulty)) = (Stats::of(&usefulness), Stats::of(&elements))
                else {
                    continue;
                };
                levels.insert(
                    level,
                    LevelSummary {
                        activity_count: usefulness.len(),
                        usefulness: useful,
                        usefulness_band: Band::from_mean(useful.mean).reversed(),
                        difficulty,
                        difficulty_band: Band::from_mean(difficulty.mean),
                    },
                );
            }
            summaries.push(SubDimensionSummary {
                dimension: dim_name.clone(),
                sub_dimension: sub_name.clone(),
                levels,
            });
        }
    }

    Ok(summaries)
}

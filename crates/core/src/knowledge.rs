//! Knowledge score normalization.

use crate::model::{Activity, Knowledge};

/// Number of knowledge areas: operation, development, expertise, security.
pub const KNOWLEDGE_AREAS: usize = 4;

/// Reduce an activity's knowledge rating to a single scalar.
///
/// A scalar rating is returned unchanged; area ratings are averaged over
/// the four areas. Other shapes are rejected at load time by
/// [`crate::migrate::validate_activity`].
pub fn normalize_knowledge(activity: &Activity) -> f64 {
    activity.difficulty.knowledge.normalized()
}

impl Knowledge {
    pub fn normalized(&self) -> f64 {
        match self {
            Knowledge::Scalar(value) => f64::from(*value),
            Knowledge::Areas(areas) => {
                let sum: f64 = areas.iter().map(|v| f64::from(*v)).sum();
                sum / KNOWLEDGE_AREAS as f64
            }
        }
    }
}

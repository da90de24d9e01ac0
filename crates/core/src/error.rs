use std::path::PathBuf;

/// A catalogue loading or validation error.
///
/// Every variant is fatal: a catalogue that fails to load is never scored.
/// Data-quality issues that do not break scoring (duplicate names, dangling
/// dependencies) are reported as [`crate::Finding`]s instead.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    /// The catalogue source could not be read.
    #[error("cannot read catalogue '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalogue source is not valid YAML.
    #[error("invalid YAML in '{}': {message}", .path.display())]
    Yaml { path: PathBuf, message: String },

    /// The file parsed, but its documents are not laid out as
    /// `[meta document,] dimension document`.
    #[error("unexpected document layout in '{}': {message}", .path.display())]
    Layout { path: PathBuf, message: String },

    /// The dimension / sub-dimension / activity nesting is broken.
    #[error("invalid catalogue structure: {0}")]
    Structure(String),

    /// An activity record is missing a field or has an ill-typed one.
    #[error("invalid activity '{activity}' in {dimension} / {sub_dimension}: {message}")]
    InvalidActivity {
        dimension: String,
        sub_dimension: String,
        activity: String,
        message: String,
    },

    /// A `knowledge` rating that is neither a scalar nor four area ratings.
    #[error(
        "malformed knowledge rating for activity '{activity}': expected a number or 4 area ratings, found {found}"
    )]
    MalformedKnowledge { activity: String, found: usize },

    /// A rating outside its permitted range.
    #[error("{field} of activity '{activity}' is {value}, expected {min}..={max}")]
    OutOfRange {
        activity: String,
        field: &'static str,
        value: f64,
        min: u8,
        max: u8,
    },
}

/// A `dependsOn` chain that leads back to an activity already being scored.
///
/// `path` lists the activity names in traversal order, starting and ending
/// with the repeated activity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("dependency cycle detected: {}", .path.join(" \u{2192} "))]
pub struct CyclicDependencyError {
    pub path: Vec<String>,
}

impl CyclicDependencyError {
    /// Activity names on the cycle, each listed once and rotated so the
    /// smallest name comes first. Two errors describing the same cycle
    /// entered from different activities have equal keys.
    pub fn cycle_key(&self) -> Vec<String> {
        let members = match self.path.split_last() {
            Some((_, rest)) if !rest.is_empty() => rest,
            _ => &self.path[..],
        };
        let start = members
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.cmp(b.1))
            .map(|(i, _)| i)
            .unwrap_or(0);
        members[start..]
            .iter()
            .chain(members[..start].iter())
            .cloned()
            .collect()
    }
}

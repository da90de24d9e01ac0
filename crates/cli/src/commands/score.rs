use std::process;

use maturity_core::{
    collect_difficulty_elements, compute_difficulty, format_score, ActivityIndex,
};
use serde_json::json;

use super::load_or_exit;
use crate::config::Settings;
use crate::{print_json, report_error, OutputFormat};

pub(crate) fn cmd_score(
    settings: &Settings,
    activity: &str,
    aggregated: bool,
    elements: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let loaded = load_or_exit(settings, output, quiet);
    let index = ActivityIndex::new(&loaded.catalogue);

    let Some(found) = index.get_element_by_name(activity) else {
        report_error(&format!("unknown activity '{}'", activity), output, quiet);
        process::exit(1);
    };
    let matches = index.find_all_by_name(activity).len();
    if matches > 1 {
        tracing::warn!(
            activity,
            matches,
            dimension = found.dimension,
            sub_dimension = found.sub_dimension,
            "ambiguous activity name, scoring the first match"
        );
    }

    let outcome = if elements {
        let mut values = Vec::new();
        collect_difficulty_elements(&index, Some(found), aggregated, &mut values)
            .map(|()| Outcome::Elements(values))
    } else {
        compute_difficulty(&index, Some(found), aggregated)
            .map(|score| Outcome::Score(score.unwrap_or_default()))
    };
    let outcome = match outcome {
        Ok(o) => o,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    if quiet {
        return;
    }
    match (output, outcome) {
        (OutputFormat::Json, Outcome::Score(score)) => print_json(&json!({
            "activity": activity,
            "aggregated": aggregated,
            "difficulty": score,
            "display": format_score(score),
        })),
        (OutputFormat::Json, Outcome::Elements(values)) => print_json(&json!({
            "activity": activity,
            "aggregated": aggregated,
            "elements": values,
        })),
        (OutputFormat::Text, Outcome::Score(score)) => println!("{}", format_score(score)),
        (OutputFormat::Text, Outcome::Elements(values)) => {
            let rendered: Vec<String> = values.into_iter().map(format_score).collect();
            println!("{}", rendered.join(" "));
        }
    }
}

enum Outcome {
    Score(f64),
    Elements(Vec<f64>),
}

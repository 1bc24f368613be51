use serde_json::{Map, Value};

use crate::entities::ContentRecord;
use crate::measures::{Explanation, ScoreResult, is_blank};

const KEYS: [&str; 2] = ["description", "title"];

/// Checks that the description and title metatags are not blank.
///
/// Only keys that are present but blank count as missing. A record without
/// a metatags blob scores 1.0, the same as a fully configured one.
pub fn measure(record: &ContentRecord) -> ScoreResult {
    let blank = match record.metatags_map() {
        Some(map) => blank_keys(&map),
        None => Vec::new(),
    };

    if blank.is_empty() {
        return ScoreResult::new(
            1.0,
            Explanation::Success {
                message: "Metatags are properly configured for this node.".to_string(),
            },
        );
    }

    let score = (KEYS.len() - blank.len()) as f64 / KEYS.len() as f64;
    ScoreResult::new(
        score,
        Explanation::Warning {
            message: format!(
                "Some metatags are missing for this node: {}. Please add metatags to improve SEO.",
                blank.join(", ")
            ),
            missing: blank,
        },
    )
}

fn blank_keys(map: &Map<String, Value>) -> Vec<String> {
    KEYS.iter()
        .filter(|key| match map.get(**key) {
            Some(Value::String(s)) => is_blank(s),
            _ => false,
        })
        .map(|key| key.to_string())
        .collect()
}

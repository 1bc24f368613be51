use serde_json::{Map, Value};

use crate::entities::ContentRecord;
use crate::measures::{Explanation, ScoreResult, is_blank};

const KEYS: [&str; 3] = [
    "schema_article_type",
    "schema_article_headline",
    "schema_article_date_published",
];

/// Checks the schema.org article keys in the metatags blob.
///
/// A key that is absent, null or blank counts as missing. A record with no
/// blob at all is not inspected and scores 1.0.
pub fn measure(record: &ContentRecord) -> ScoreResult {
    let missing = match record.metatags_map() {
        Some(map) => missing_keys(&map),
        None => Vec::new(),
    };

    if missing.is_empty() {
        return ScoreResult::new(
            1.0,
            Explanation::Success {
                message: "Schema.org tags are properly configured for this node.".to_string(),
            },
        );
    }

    let score = (KEYS.len() - missing.len()) as f64 / KEYS.len() as f64;
    ScoreResult::new(
        score,
        Explanation::Warning {
            message: format!(
                "Some schema.org are missing for this node: {}. Please add schema.org to improve SEO.",
                missing.join(", ")
            ),
            missing,
        },
    )
}

fn missing_keys(map: &Map<String, Value>) -> Vec<String> {
    KEYS.iter()
        .filter(|key| match map.get(**key) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => is_blank(s),
            Some(_) => false,
        })
        .map(|key| key.to_string())
        .collect()
}

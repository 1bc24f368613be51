//! SEO measures: four rules that each score a record in `[0, 1]`, plus the
//! aggregate shown on the dashboard.
//!
//! The rule set is closed. [`MeasureKind`] names every rule and [`Measures`]
//! dispatches to the implementation, so there is no registration step.

pub mod backlinks;
pub mod metatags;
pub mod schema;
pub mod taxonomy;

pub use backlinks::{BACKLINK_LIMIT, BacklinksMeasure};
pub use taxonomy::TaxonomyMeasure;

use serde::Serialize;
use tracing::{error, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::ContentRecord;
use crate::extractor::ExtractionCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureKind {
    Metatags,
    Backlinks,
    Schema,
    Taxonomy,
}

impl MeasureKind {
    /// Every rule, in display order.
    pub const ALL: [MeasureKind; 4] = [
        MeasureKind::Metatags,
        MeasureKind::Backlinks,
        MeasureKind::Schema,
        MeasureKind::Taxonomy,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Metatags => "metatags_presence",
            Self::Backlinks => "possible_backlinks",
            Self::Schema => "schema_presence",
            Self::Taxonomy => "taxonomy_presence",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Metatags => "Meta Tags",
            Self::Backlinks => "Domain backlinks",
            Self::Schema => "Schema.org",
            Self::Taxonomy => "Tags",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

/// One linkable record inside a backlinks explanation.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LinkItem {
    pub id: Uuid,
    pub title: String,
    /// `"{title} (Score: {score})"`
    pub label: String,
    /// Similarity rounded to two decimals.
    pub score: f64,
    pub url: String,
}

/// What a rule has to say about its score.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Explanation {
    Success {
        message: String,
    },
    Warning {
        message: String,
        missing: Vec<String>,
    },
    Untagged {
        message: String,
        suggestions: Vec<String>,
    },
    Links {
        items: Vec<LinkItem>,
    },
    Notice {
        message: String,
    },
    Unavailable {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScoreResult {
    pub score: f64,
    pub explanation: Explanation,
}

impl ScoreResult {
    pub fn new(score: f64, explanation: Explanation) -> Self {
        Self { score, explanation }
    }

    /// Worst-case result for a rule that failed internally.
    pub fn unavailable() -> Self {
        Self::new(
            0.0,
            Explanation::Unavailable {
                message: "This measure could not be evaluated.".to_string(),
            },
        )
    }
}

/// A metatag value that carries nothing: empty after trimming, or `"0"`.
pub(crate) fn is_blank(value: &str) -> bool {
    matches!(value.trim(), "" | "0")
}

/// `round(100 * mean(scores))`, clamped to `0..=100`.
pub fn aggregate_score(scores: &[f64]) -> u8 {
    if scores.is_empty() {
        return 0;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    (100.0 * mean).round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MeasureOutcome {
    pub id: String,
    pub label: String,
    pub score: f64,
    pub explanation: Explanation,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MeasureReport {
    pub measures: Vec<MeasureOutcome>,
    pub aggregate_score: u8,
}

/// Dispatches each [`MeasureKind`] to its rule.
pub struct Measures {
    backlinks: BacklinksMeasure,
    taxonomy: TaxonomyMeasure,
}

impl Measures {
    pub fn new(backlinks: BacklinksMeasure, taxonomy: TaxonomyMeasure) -> Self {
        Self {
            backlinks,
            taxonomy,
        }
    }

    /// Scores one rule. A rule that fails is logged and reported as
    /// [`ScoreResult::unavailable`].
    #[instrument(skip_all, fields(record_id = %record.id, measure = kind.id()))]
    pub async fn evaluate(
        &self,
        kind: MeasureKind,
        record: &ContentRecord,
        cache: &ExtractionCache,
    ) -> ScoreResult {
        match kind {
            MeasureKind::Metatags => metatags::measure(record),
            MeasureKind::Schema => schema::measure(record),
            MeasureKind::Taxonomy => self.taxonomy.measure(record, cache).await,
            MeasureKind::Backlinks => match self.backlinks.measure(record, cache).await {
                Ok(result) => result,
                Err(e) => {
                    error!(error = %e, "measure failed");
                    ScoreResult::unavailable()
                }
            },
        }
    }

    /// All four rules in display order, one after another, and their aggregate.
    pub async fn evaluate_all(
        &self,
        record: &ContentRecord,
        cache: &ExtractionCache,
    ) -> MeasureReport {
        let mut measures = Vec::with_capacity(MeasureKind::ALL.len());
        for kind in MeasureKind::ALL {
            let result = self.evaluate(kind, record, cache).await;
            measures.push(MeasureOutcome {
                id: kind.id().to_string(),
                label: kind.label().to_string(),
                score: result.score,
                explanation: result.explanation,
            });
        }
        let scores: Vec<f64> = measures.iter().map(|m| m.score).collect();
        MeasureReport {
            aggregate_score: aggregate_score(&scores),
            measures,
        }
    }
}

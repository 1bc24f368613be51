use std::sync::Arc;

use crate::config::Config;
use crate::dashboard::DashboardAggregator;
use crate::extractor::{Renderer, TextExtractor};
use crate::links::LinkOpportunityFinder;
use crate::llm::ChatCompletion;
use crate::measures::{BacklinksMeasure, Measures, TaxonomyMeasure};
use crate::repositories::{ContentStore, VocabularyStore};
use crate::search::{SimilarityIndex, SimilaritySearchClient};
use crate::suggest::TagSuggester;

/// External services the application is built on.
pub struct Collaborators {
    pub content_store: Arc<dyn ContentStore>,
    pub vocabulary: Arc<dyn VocabularyStore>,
    pub index: Arc<dyn SimilarityIndex>,
    pub chat: Arc<dyn ChatCompletion>,
    pub renderer: Arc<dyn Renderer>,
}

#[derive(Clone)]
pub struct AppState {
    pub content_store: Arc<dyn ContentStore>,
    pub measures: Arc<Measures>,
    pub dashboard: Arc<DashboardAggregator>,
    pub links: Arc<LinkOpportunityFinder>,
    pub suggester: Arc<TagSuggester>,
    pub content_type: String,
}

impl AppState {
    pub fn new(collaborators: Collaborators, config: &Config) -> Self {
        let Collaborators {
            content_store,
            vocabulary,
            index,
            chat,
            renderer,
        } = collaborators;

        let extractor = Arc::new(TextExtractor::new(renderer));
        let links = Arc::new(LinkOpportunityFinder::new(
            extractor.clone(),
            SimilaritySearchClient::new(index),
        ));
        let suggester = Arc::new(TagSuggester::new(
            vocabulary,
            chat,
            extractor,
            config.tag_vocabulary(),
            config.chat_provider(),
            config.chat_model(),
        ));
        let measures = Arc::new(Measures::new(
            BacklinksMeasure::new(links.clone()),
            TaxonomyMeasure::new(suggester.clone()),
        ));
        let dashboard = Arc::new(DashboardAggregator::new(
            measures.clone(),
            config.public_base_url().clone(),
        ));

        Self {
            content_store,
            measures,
            dashboard,
            links,
            suggester,
            content_type: config.content_type().to_string(),
        }
    }
}

//! In-process similarity index backed by tantivy.
//!
//! Ranks with BM25 over title and body text. Meant for development and tests
//! where no external search service runs; production points at
//! [`crate::search::HttpSimilarityIndex`].

use std::sync::Mutex;

use async_trait::async_trait;
use tantivy::{
    Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term,
    collector::TopDocs,
    doc,
    query::QueryParser,
    schema::{Field, STORED, STRING, Schema, TEXT, Value},
};
use tracing::debug;
use uuid::Uuid;

use crate::search::{IndexHit, SearchError, SimilarityIndex};

const WRITER_MEMORY_BYTES: usize = 50_000_000;

#[derive(Clone, Copy)]
struct Fields {
    id: Field,
    title: Field,
    content_type: Field,
    body: Field,
}

pub struct LocalIndex {
    index: Index,
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
    fields: Fields,
}

impl LocalIndex {
    /// Empty in-memory index.
    pub fn new() -> Result<Self, SearchError> {
        let mut builder = Schema::builder();
        let fields = Fields {
            id: builder.add_text_field("id", STRING | STORED),
            title: builder.add_text_field("title", TEXT | STORED),
            content_type: builder.add_text_field("type", STRING | STORED),
            body: builder.add_text_field("body", TEXT),
        };
        let index = Index::create_in_ram(builder.build());
        let writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY_BYTES)?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            index,
            reader,
            writer: Mutex::new(writer),
            fields,
        })
    }

    /// Adds or replaces the document for `id` and makes it searchable.
    pub fn upsert(
        &self,
        id: Uuid,
        title: &str,
        content_type: &str,
        text: &str,
    ) -> Result<(), SearchError> {
        let id = id.to_string();
        let mut writer = self.writer.lock().map_err(|_| SearchError::WriterPoisoned)?;
        writer.delete_term(Term::from_field_text(self.fields.id, &id));
        writer.add_document(doc!(
            self.fields.id => id.as_str(),
            self.fields.title => title,
            self.fields.content_type => content_type,
            self.fields.body => text,
        ))?;
        writer.commit()?;
        self.reader.reload()?;
        Ok(())
    }

    pub fn len(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SimilarityIndex for LocalIndex {
    async fn query(
        &self,
        text: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<IndexHit>, SearchError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();
        let parser =
            QueryParser::for_index(&self.index, vec![self.fields.title, self.fields.body]);
        // Free text routinely contains query syntax; drop what does not parse.
        let (query, errors) = parser.parse_query_lenient(text);
        if !errors.is_empty() {
            debug!(errors = errors.len(), "ignored unparsable query fragments");
        }

        let top = searcher.search(&query, &TopDocs::with_limit(limit).and_offset(offset))?;

        let mut hits = Vec::with_capacity(top.len());
        for (score, address) in top {
            let document: TantivyDocument = searcher.doc(address)?;
            let field_text = |field: Field| {
                document
                    .get_first(field)
                    .and_then(|value| value.as_str())
                    .unwrap_or_default()
                    .to_string()
            };
            hits.push(IndexHit {
                id: field_text(self.fields.id),
                title: field_text(self.fields.title),
                content_type: field_text(self.fields.content_type),
                score: f64::from(score),
            });
        }
        Ok(hits)
    }
}

pub mod content;
pub mod vocabulary;

pub use content::{ContentStore, PgContentStore, SortDirection, SortField};
pub use vocabulary::{PgVocabularyStore, VocabularyStore};

//! Free-text search across streams, drops and assets.

mod error;
mod executor;
mod query;

pub use error::SearchError;
pub use executor::{search, SearchResult};
pub use query::{parse_query, SearchKind, SearchQuery};

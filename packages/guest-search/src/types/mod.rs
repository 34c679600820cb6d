//! Data types shared across the search pipeline.

pub mod candidate;
pub mod result;

pub use candidate::PersonCandidate;
pub use result::{SearchOptions, SearchResponse, SearchResult, StatusReport};

// Job filter & match engine: match scoring, stable filtering, facet derivation,
// cache freshness, and the job pool cache behind the Jobs API.

pub mod board;
pub mod cache;
pub mod filter;
pub mod freshness;
pub mod handlers;
pub mod matching;
pub mod source;

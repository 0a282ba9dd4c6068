//! Collaborator surface around the matching engine: configuration, corpus
//! loading and logging for the `atlas` binary.

mod config;
mod corpus;
mod observability;

pub use config::{AtlasConfig, ConfigError, MatchingConfig};
pub use corpus::{load_corpus, parse_csv, parse_json, CorpusError, REQUIRED_COLUMNS};
pub use observability::init_observability;

//! Candidate chain generation for the nine-word association puzzle.
//!
//! A chain is a sequence of nine distinct words in which every consecutive
//! pair is a phrase relationship from the corpus graph and no pair repeats a
//! relationship already used by a published puzzle, in either direction.

pub mod config;
pub mod emitter;
pub mod error;
pub mod graph;
pub mod registry;
pub mod search;
pub mod test_utils;
pub mod types;
pub mod validate;
pub mod walk;

// Re-export commonly used types
pub use emitter::{CandidateEmitter, EmitterOptions, RunMode, RunReport};
pub use error::{ChainError, Result};
pub use graph::PhraseGraph;
pub use registry::BigramRegistry;
pub use search::{find_relaxed, find_strict, ChainSearch, SearchOutcome};
pub use types::{Chain, DirectedEdge, Strictness, Word, CHAIN_LENGTH};
pub use validate::{inspect, validate_relaxed, validate_strict, ChainReport};
pub use walk::RandomWalkGenerator;

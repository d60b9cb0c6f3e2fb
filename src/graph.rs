//! Static phrase graph: which words may follow which.
//!
//! The graph file is produced by offline corpus tooling and looks like
//!
//! ```json
//! { "transitions": { "SNOW": ["FLAKE", "BALL"] }, "startWords": ["SNOW"] }
//! ```
//!
//! Successor order follows the corpus and is kept as a soft preference; the
//! exhaustive search tries successors in this order.

use log::{info, warn};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{ChainError, Result};
use crate::types::Word;

/// Graph description as stored on disk
#[derive(Debug, Clone, Deserialize)]
pub struct GraphFile {
    pub transitions: HashMap<Word, Vec<Word>>,
    #[serde(rename = "startWords", default)]
    pub start_words: Vec<Word>,
}

/// Directed graph of phrase relationships, read-only after load
#[derive(Debug, Clone, Default)]
pub struct PhraseGraph {
    transitions: HashMap<Word, Vec<Word>>,
    start_words: Vec<Word>,
}

impl PhraseGraph {
    /// Build a graph, collapsing duplicate successors and dropping start
    /// words that have no outgoing transitions entry.
    pub fn new(transitions: HashMap<Word, Vec<Word>>, start_words: Vec<Word>) -> Self {
        let transitions: HashMap<Word, Vec<Word>> = transitions
            .into_iter()
            .map(|(word, successors)| {
                let mut seen = HashSet::new();
                let successors = successors
                    .into_iter()
                    .filter(|s| seen.insert(s.clone()))
                    .collect();
                (word, successors)
            })
            .collect();

        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(start_words.len());
        for word in start_words {
            if !transitions.contains_key(&word) {
                warn!("Dropping start word '{}': no transitions entry", word);
                continue;
            }
            if seen.insert(word.clone()) {
                kept.push(word);
            }
        }

        Self {
            transitions,
            start_words: kept,
        }
    }

    /// Build a graph from literal `(from, to)` pairs, in insertion order
    pub fn from_pairs(pairs: &[(&str, &str)], start_words: &[&str]) -> Self {
        let mut transitions: HashMap<Word, Vec<Word>> = HashMap::new();
        for (from, to) in pairs {
            transitions
                .entry(Word::new(from))
                .or_insert_with(Vec::new)
                .push(Word::new(to));
        }
        Self::new(transitions, start_words.iter().map(|w| Word::new(w)).collect())
    }

    /// Parse a graph description from JSON text. `path` is only used for diagnostics.
    pub fn from_json(json: &str, path: &Path) -> Result<Self> {
        let file: GraphFile = serde_json::from_str(json).map_err(|source| ChainError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        for (word, successors) in &file.transitions {
            if word.is_empty() || successors.iter().any(Word::is_empty) {
                return Err(ChainError::malformed(
                    path,
                    0,
                    format!("empty word in transitions of '{}'", word),
                ));
            }
        }
        if file.start_words.iter().any(Word::is_empty) {
            return Err(ChainError::malformed(path, 0, "empty word in startWords"));
        }

        Ok(Self::new(file.transitions, file.start_words))
    }

    /// Load the graph description from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ChainError::from_io(path, e))?;
        let graph = Self::from_json(&content, path)?;
        info!(
            "Loaded phrase graph from {:?}: {} words with successors, {} edges, {} start words",
            path,
            graph.transitions.len(),
            graph.edge_count(),
            graph.start_words.len()
        );
        Ok(graph)
    }

    /// Successors of `word` in corpus order (empty if the word has none)
    pub fn successors(&self, word: &str) -> &[Word] {
        self.transitions
            .get(word)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn start_words(&self) -> &[Word] {
        &self.start_words
    }

    /// Iterate over every `(from, successors)` entry
    pub fn iter(&self) -> impl Iterator<Item = (&Word, &[Word])> {
        self.transitions.iter().map(|(w, s)| (w, s.as_slice()))
    }

    pub fn edge_count(&self) -> usize {
        self.transitions.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_normalizes_and_dedups() {
        let json = r#"{
            "transitions": { "snow": ["flake", "ball", "FLAKE"], "ball": ["game"] },
            "startWords": ["Snow", "ball", "snow"]
        }"#;
        let graph = PhraseGraph::from_json(json, Path::new("graph.json")).unwrap();

        assert_eq!(graph.successors("SNOW"), &[Word::new("FLAKE"), Word::new("BALL")]);
        assert_eq!(graph.start_words(), &[Word::new("SNOW"), Word::new("BALL")]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_start_words_without_transitions_are_dropped() {
        let graph = PhraseGraph::from_pairs(&[("SNOW", "FLAKE")], &["SNOW", "FLAKE", "GHOST"]);
        assert_eq!(graph.start_words(), &[Word::new("SNOW")]);
    }

    #[test]
    fn test_missing_start_words_defaults_empty() {
        let graph =
            PhraseGraph::from_json(r#"{"transitions": {"A": ["B"]}}"#, Path::new("g.json")).unwrap();
        assert!(graph.start_words().is_empty());
        assert_eq!(graph.successors("A"), &[Word::new("B")]);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = PhraseGraph::from_json(r#"{"startWords": []}"#, Path::new("g.json")).unwrap_err();
        assert!(matches!(err, ChainError::Json { .. }));

        let err =
            PhraseGraph::from_json(r#"{"transitions": {"A": [" "]}}"#, Path::new("g.json")).unwrap_err();
        assert!(matches!(err, ChainError::Malformed { .. }));
    }

    #[test]
    fn test_unknown_word_has_no_successors() {
        let graph = PhraseGraph::from_pairs(&[("A", "B")], &["A"]);
        assert!(graph.successors("Z").is_empty());
        assert!(graph.successors("B").is_empty());
    }
}

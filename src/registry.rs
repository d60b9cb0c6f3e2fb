//! Registry of word pairs already consumed by published puzzles.
//!
//! Keys are directed, but every exclusion check in this crate goes through
//! [`BigramRegistry::is_available`], which tests both directions.

use log::{debug, info};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{ChainError, Result};
use crate::types::{DirectedEdge, Word};

const ARROWS: [&str; 2] = ["→", "->"];

#[derive(Debug, Clone, Default)]
pub struct BigramRegistry {
    edges: HashSet<DirectedEdge>,
}

impl BigramRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        pairs
            .iter()
            .map(|(from, to)| DirectedEdge::new(Word::new(from), Word::new(to)))
            .collect()
    }

    /// Parse a newline-delimited `FROM→TO` edge list. `path` is only used for diagnostics.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let mut edges = HashSet::new();
        let mut skipped = 0usize;

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                skipped += 1;
                continue;
            }
            let edge = parse_edge(line).ok_or_else(|| {
                ChainError::malformed(path, idx + 1, format!("expected FROM→TO, got '{}'", line))
            })?;
            edges.insert(edge);
        }

        debug!("Skipped {} blank/comment lines in {:?}", skipped, path);
        Ok(Self { edges })
    }

    /// Load the edge list from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ChainError::from_io(path, e))?;
        let registry = Self::parse(&content, path)?;
        info!("Loaded {} used bigrams from {:?}", registry.len(), path);
        Ok(registry)
    }

    /// Is the directed pair `from → to` registered (this direction only)?
    pub fn contains(&self, from: &Word, to: &Word) -> bool {
        self.edges
            .contains(&DirectedEdge::new(from.clone(), to.clone()))
    }

    /// An edge is available when neither direction is registered
    pub fn is_available(&self, a: &Word, b: &Word) -> bool {
        !self.contains(a, b) && !self.contains(b, a)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DirectedEdge> {
        self.edges.iter()
    }
}

impl FromIterator<DirectedEdge> for BigramRegistry {
    fn from_iter<I: IntoIterator<Item = DirectedEdge>>(iter: I) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

fn parse_edge(line: &str) -> Option<DirectedEdge> {
    let (from, to) = ARROWS.iter().find_map(|arrow| line.split_once(arrow))?;
    let from = Word::new(from);
    let to = Word::new(to);
    let stray_arrow = ARROWS
        .iter()
        .any(|a| from.as_str().contains(a) || to.as_str().contains(a));
    if from.is_empty() || to.is_empty() || stray_arrow {
        return None;
    }
    Some(DirectedEdge::new(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: &str) -> Word {
        Word::new(s)
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let content = "# used edges\n\nSNOW→FLAKE\n  ball -> game  \n# trailing\n";
        let registry = BigramRegistry::parse(content, Path::new("used.txt")).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&w("SNOW"), &w("FLAKE")));
        assert!(registry.contains(&w("BALL"), &w("GAME")));
    }

    #[test]
    fn test_parse_reports_line_number() {
        let content = "SNOW→FLAKE\nnot an edge\n";
        match BigramRegistry::parse(content, Path::new("used.txt")) {
            Err(ChainError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed error, got {:?}", other),
        }

        assert!(BigramRegistry::parse("→FLAKE", Path::new("used.txt")).is_err());
        assert!(BigramRegistry::parse("A→B→C", Path::new("used.txt")).is_err());
    }

    #[test]
    fn test_direction_agnostic_availability() {
        let registry = BigramRegistry::from_pairs(&[("SNOW", "FLAKE")]);

        assert!(registry.contains(&w("SNOW"), &w("FLAKE")));
        assert!(!registry.contains(&w("FLAKE"), &w("SNOW")));

        assert!(!registry.is_available(&w("SNOW"), &w("FLAKE")));
        assert!(!registry.is_available(&w("FLAKE"), &w("SNOW")));
        assert!(registry.is_available(&w("SNOW"), &w("BALL")));
    }

    #[test]
    fn test_empty_registry_allows_everything() {
        let registry = BigramRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.is_available(&w("A"), &w("B")));
    }
}

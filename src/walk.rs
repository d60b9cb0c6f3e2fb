//! Randomized, non-backtracking chain producer.
//!
//! Each call makes exactly one walk attempt. A dead end ends the attempt and
//! the caller retries; walks never back up, which keeps the distribution of
//! produced chains tied to the local branching of the graph.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::graph::PhraseGraph;
use crate::registry::BigramRegistry;
use crate::types::{Chain, Strictness, Word, CHAIN_LENGTH};

/// Start words that have at least one outgoing edge unused in both directions.
///
/// With `restrict`, only start words also listed there are kept.
pub fn start_pool(
    graph: &PhraseGraph,
    registry: &BigramRegistry,
    restrict: Option<&[Word]>,
) -> Vec<Word> {
    graph
        .start_words()
        .iter()
        .filter(|w| restrict.map_or(true, |r| r.contains(w)))
        .filter(|w| {
            graph
                .successors(w.as_str())
                .iter()
                .any(|s| registry.is_available(w, s))
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone)]
pub struct RandomWalkGenerator<'a> {
    graph: &'a PhraseGraph,
    registry: &'a BigramRegistry,
    mode: Strictness,
    pool: Vec<Word>,
}

impl<'a> RandomWalkGenerator<'a> {
    pub fn new(graph: &'a PhraseGraph, registry: &'a BigramRegistry, mode: Strictness) -> Self {
        Self {
            graph,
            registry,
            mode,
            pool: start_pool(graph, registry, None),
        }
    }

    /// Replace the default start pool
    pub fn with_start_pool(mut self, pool: Vec<Word>) -> Self {
        self.pool = pool;
        self
    }

    pub fn start_pool(&self) -> &[Word] {
        &self.pool
    }

    /// One walk attempt. Returns `None` on a dead end or an empty start pool.
    ///
    /// In strict mode successors whose edge is registered in either direction
    /// are never taken. In relaxed mode only revisits are excluded here and
    /// the caller's validator decides acceptance.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Option<Chain> {
        let start = self.pool.choose(rng)?;
        let mut chain: Chain = Vec::with_capacity(CHAIN_LENGTH);
        let mut visited: HashSet<&Word> = HashSet::with_capacity(CHAIN_LENGTH);
        chain.push(start.clone());
        visited.insert(start);

        let mut current = start;
        while chain.len() < CHAIN_LENGTH {
            let candidates: Vec<&Word> = self
                .graph
                .successors(current.as_str())
                .iter()
                .filter(|s| !visited.contains(s))
                .filter(|s| self.mode == Strictness::Relaxed || self.registry.is_available(current, s))
                .collect();

            let Some(next) = candidates.choose(rng).copied() else {
                debug!("Walk from {} died at {} after {} words", start, current, chain.len());
                return None;
            };
            chain.push(next.clone());
            visited.insert(next);
            current = next;
        }

        Some(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::chain_of;
    use crate::validate::validate_strict;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TEST_SEED: u64 = 42;

    const PATH: [&str; 9] = ["A", "B", "C", "D", "E", "F", "G", "H", "I"];

    fn path_pairs() -> Vec<(&'static str, &'static str)> {
        PATH.windows(2).map(|p| (p[0], p[1])).collect()
    }

    #[test]
    fn test_unbranching_path_is_always_found() {
        let graph = PhraseGraph::from_pairs(&path_pairs(), &["A"]);
        let registry = BigramRegistry::new();
        let generator = RandomWalkGenerator::new(&graph, &registry, Strictness::Strict);
        let mut rng = StdRng::seed_from_u64(TEST_SEED);

        for _ in 0..50 {
            assert_eq!(generator.generate(&mut rng), Some(chain_of(&PATH)));
        }
    }

    #[test]
    fn test_dead_end_returns_none() {
        // Eight words only: every walk must die
        let graph = PhraseGraph::from_pairs(&path_pairs()[..7], &["A"]);
        let registry = BigramRegistry::new();
        let generator = RandomWalkGenerator::new(&graph, &registry, Strictness::Strict);
        let mut rng = StdRng::seed_from_u64(TEST_SEED);
        assert_eq!(generator.generate(&mut rng), None);
    }

    #[test]
    fn test_cycle_back_to_start_is_a_dead_end() {
        let mut pairs = path_pairs()[..4].to_vec();
        pairs.push(("E", "A"));
        let graph = PhraseGraph::from_pairs(&pairs, &["A"]);
        let registry = BigramRegistry::new();
        let generator = RandomWalkGenerator::new(&graph, &registry, Strictness::Strict);
        let mut rng = StdRng::seed_from_u64(TEST_SEED);
        assert_eq!(generator.generate(&mut rng), None);
    }

    #[test]
    fn test_strict_walk_skips_registered_edges_both_directions() {
        // Two routes from A: via X (registered in reverse) or via B
        let mut pairs = path_pairs();
        pairs.insert(0, ("A", "X"));
        pairs.push(("X", "C"));
        let graph = PhraseGraph::from_pairs(&pairs, &["A"]);
        let registry = BigramRegistry::from_pairs(&[("X", "A")]);
        let generator = RandomWalkGenerator::new(&graph, &registry, Strictness::Strict);
        let mut rng = StdRng::seed_from_u64(TEST_SEED);

        for _ in 0..50 {
            let chain = generator.generate(&mut rng).expect("path via B is always open");
            assert_eq!(chain, chain_of(&PATH));
            assert!(validate_strict(&chain, &registry));
        }
    }

    #[test]
    fn test_relaxed_walk_may_take_registered_edge() {
        let graph = PhraseGraph::from_pairs(&path_pairs(), &["A"]);
        let registry = BigramRegistry::from_pairs(&[("C", "D")]);
        let mut rng = StdRng::seed_from_u64(TEST_SEED);

        let strict = RandomWalkGenerator::new(&graph, &registry, Strictness::Strict);
        assert_eq!(strict.generate(&mut rng), None);

        let relaxed = RandomWalkGenerator::new(&graph, &registry, Strictness::Relaxed);
        assert_eq!(relaxed.generate(&mut rng), Some(chain_of(&PATH)));
    }

    #[test]
    fn test_start_pool_filters_blocked_starts() {
        let graph = PhraseGraph::from_pairs(&[("A", "B"), ("C", "D"), ("E", "F")], &["A", "C", "E"]);
        let registry = BigramRegistry::from_pairs(&[("D", "C")]);

        let pool = start_pool(&graph, &registry, None);
        assert_eq!(pool, chain_of(&["A", "E"]));

        let only_e = chain_of(&["E", "Z"]);
        assert_eq!(start_pool(&graph, &registry, Some(only_e.as_slice())), chain_of(&["E"]));
    }

    #[test]
    fn test_empty_pool_yields_nothing() {
        let graph = PhraseGraph::from_pairs(&path_pairs(), &["A"]);
        let registry = BigramRegistry::from_pairs(&[("A", "B")]);
        let generator = RandomWalkGenerator::new(&graph, &registry, Strictness::Strict);
        assert!(generator.start_pool().is_empty());
        assert_eq!(generator.generate(&mut StdRng::seed_from_u64(TEST_SEED)), None);
    }
}

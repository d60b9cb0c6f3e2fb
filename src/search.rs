//! Deterministic depth-first chain search.
//!
//! Strict search runs over the subgraph of available edges (unused in both
//! directions) and is complete there: if a simple 9-word path exists from one
//! of the given starts, it is found. Relaxed search runs over the full graph
//! and lets each path spend one forward-registered edge; reverse-registered
//! edges are never taken.
//!
//! No iteration cap is applied. Real corpora have a low branching factor and
//! the search runs until the limit is met or every branch is exhausted.

use log::{debug, info};
use std::collections::{HashMap, HashSet};

use crate::graph::PhraseGraph;
use crate::registry::BigramRegistry;
use crate::types::{Chain, Strictness, Word, CHAIN_LENGTH};

#[derive(Debug, Clone, Copy)]
struct Step<'a> {
    word: &'a Word,
    /// Taking this edge spends one unit of the reuse budget
    reuse: bool,
}

/// One level of the DFS: the next successor index to try, and whether the
/// edge into this level spent budget.
#[derive(Debug, Clone, Copy)]
struct Frame {
    next: usize,
    reused: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub chains: Vec<Chain>,
    /// Every branch from every start was explored before the limit was reached
    pub exhausted: bool,
}

#[derive(Debug, Clone)]
pub struct ChainSearch<'a> {
    adjacency: HashMap<&'a Word, Vec<Step<'a>>>,
    budget: usize,
    mode: Strictness,
}

impl<'a> ChainSearch<'a> {
    /// Precompute per-word successor lists for the given mode
    pub fn new(graph: &'a PhraseGraph, registry: &'a BigramRegistry, mode: Strictness) -> Self {
        let mut adjacency = HashMap::new();
        let mut kept = 0usize;

        for (from, successors) in graph.iter() {
            let steps: Vec<Step<'a>> = successors
                .iter()
                .filter_map(|to| match mode {
                    Strictness::Strict => registry
                        .is_available(from, to)
                        .then_some(Step { word: to, reuse: false }),
                    Strictness::Relaxed => (!registry.contains(to, from)).then(|| Step {
                        word: to,
                        reuse: registry.contains(from, to),
                    }),
                })
                .collect();
            kept += steps.len();
            if !steps.is_empty() {
                adjacency.insert(from, steps);
            }
        }

        debug!(
            "{} search graph: {} of {} edges usable",
            mode,
            kept,
            graph.edge_count()
        );

        Self {
            adjacency,
            budget: mode.reuse_budget(),
            mode,
        }
    }

    pub fn strict(graph: &'a PhraseGraph, registry: &'a BigramRegistry) -> Self {
        Self::new(graph, registry, Strictness::Strict)
    }

    pub fn relaxed(graph: &'a PhraseGraph, registry: &'a BigramRegistry) -> Self {
        Self::new(graph, registry, Strictness::Relaxed)
    }

    /// Collect up to `limit` chains, trying `starts` in order and each
    /// word's successors in corpus order.
    pub fn find(&self, starts: &[Word], limit: usize) -> SearchOutcome {
        let mut chains = Vec::new();
        if limit == 0 {
            return SearchOutcome {
                chains,
                exhausted: false,
            };
        }

        for start in starts {
            self.search_from(start, limit, &mut chains);
            if chains.len() >= limit {
                info!("{} search reached limit of {} chains", self.mode, limit);
                return SearchOutcome {
                    chains,
                    exhausted: false,
                };
            }
        }

        info!(
            "{} search exhausted {} starts with {} chains",
            self.mode,
            starts.len(),
            chains.len()
        );
        SearchOutcome {
            chains,
            exhausted: true,
        }
    }

    fn search_from<'s>(&'s self, start: &'s Word, limit: usize, found: &mut Vec<Chain>) {
        let mut path: Vec<&'s Word> = vec![start];
        let mut visited: HashSet<&'s Word> = HashSet::from([start]);
        let mut frames = vec![Frame {
            next: 0,
            reused: false,
        }];
        let mut spent = 0usize;
        let before = found.len();

        while !path.is_empty() {
            if path.len() == CHAIN_LENGTH {
                found.push(path.iter().map(|w| (*w).clone()).collect());
                if found.len() >= limit {
                    return;
                }
                self.backtrack(&mut path, &mut visited, &mut frames, &mut spent);
                continue;
            }

            let current = path[path.len() - 1];
            let steps = self.adjacency.get(current).map(Vec::as_slice).unwrap_or(&[]);
            let Some(frame) = frames.last_mut() else {
                break;
            };

            let mut chosen = None;
            while frame.next < steps.len() {
                let step = steps[frame.next];
                frame.next += 1;
                if visited.contains(step.word) {
                    continue;
                }
                if step.reuse && spent >= self.budget {
                    continue;
                }
                chosen = Some(step);
                break;
            }

            match chosen {
                Some(step) => {
                    if step.reuse {
                        spent += 1;
                    }
                    path.push(step.word);
                    visited.insert(step.word);
                    frames.push(Frame {
                        next: 0,
                        reused: step.reuse,
                    });
                }
                None => self.backtrack(&mut path, &mut visited, &mut frames, &mut spent),
            }
        }

        debug!("Start {} yielded {} chains", start, found.len() - before);
    }

    fn backtrack<'s>(
        &self,
        path: &mut Vec<&'s Word>,
        visited: &mut HashSet<&'s Word>,
        frames: &mut Vec<Frame>,
        spent: &mut usize,
    ) {
        if let Some(word) = path.pop() {
            visited.remove(word);
        }
        if let Some(frame) = frames.pop() {
            if frame.reused {
                *spent -= 1;
            }
        }
    }
}

/// Strict exhaustive search over the available-edge subgraph
pub fn find_strict(
    graph: &PhraseGraph,
    registry: &BigramRegistry,
    starts: &[Word],
    limit: usize,
) -> SearchOutcome {
    ChainSearch::strict(graph, registry).find(starts, limit)
}

/// Exhaustive search tolerating one forward-registered edge per chain
pub fn find_relaxed(
    graph: &PhraseGraph,
    registry: &BigramRegistry,
    starts: &[Word],
    limit: usize,
) -> SearchOutcome {
    ChainSearch::relaxed(graph, registry).find(starts, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::chain_of;
    use crate::validate::{validate_relaxed, validate_strict};

    const PATH: [&str; 9] = ["A", "B", "C", "D", "E", "F", "G", "H", "I"];

    fn path_pairs() -> Vec<(&'static str, &'static str)> {
        PATH.windows(2).map(|p| (p[0], p[1])).collect()
    }

    #[test]
    fn test_unbranching_path() {
        let graph = PhraseGraph::from_pairs(&path_pairs(), &["A"]);
        let registry = BigramRegistry::new();
        let outcome = find_strict(&graph, &registry, graph.start_words(), 5);
        assert_eq!(outcome.chains, vec![chain_of(&PATH)]);
        assert!(outcome.exhausted);
    }

    #[test]
    fn test_backtracks_past_dead_end() {
        // B's first successor leads nowhere; the search must back out of it
        let mut pairs = vec![("B", "DEAD"), ("DEAD", "END")];
        pairs.extend(path_pairs());
        let graph = PhraseGraph::from_pairs(&pairs, &["A"]);
        let registry = BigramRegistry::new();
        let outcome = find_strict(&graph, &registry, graph.start_words(), 1);
        assert_eq!(outcome.chains, vec![chain_of(&PATH)]);
    }

    #[test]
    fn test_snow_flake_avoided_in_both_orders() {
        let mut pairs = vec![("SNOW", "FLAKE"), ("FLAKE", "B")];
        pairs.push(("SNOW", "A"));
        pairs.extend(path_pairs());
        let graph = PhraseGraph::from_pairs(&pairs, &["SNOW"]);
        let registry = BigramRegistry::from_pairs(&[("SNOW", "FLAKE")]);

        let outcome = find_strict(&graph, &registry, graph.start_words(), 10);
        assert!(!outcome.chains.is_empty());
        for chain in &outcome.chains {
            assert!(validate_strict(chain, &registry));
            for pair in chain.windows(2) {
                let pair = (pair[0].as_str(), pair[1].as_str());
                assert_ne!(pair, ("SNOW", "FLAKE"));
                assert_ne!(pair, ("FLAKE", "SNOW"));
            }
        }
    }

    #[test]
    fn test_enumerates_every_chain_then_reports_exhaustion() {
        // A fork at D gives exactly two chains
        let mut pairs = path_pairs();
        pairs.push(("D", "X"));
        pairs.push(("X", "F"));
        let graph = PhraseGraph::from_pairs(&pairs, &["A"]);
        let registry = BigramRegistry::new();

        let outcome = find_strict(&graph, &registry, graph.start_words(), 5);
        assert_eq!(outcome.chains.len(), 2);
        assert!(outcome.exhausted);
        assert_ne!(outcome.chains[0], outcome.chains[1]);

        let limited = find_strict(&graph, &registry, graph.start_words(), 1);
        assert_eq!(limited.chains.len(), 1);
        assert!(!limited.exhausted);
    }

    #[test]
    fn test_zero_limit_finds_nothing() {
        let graph = PhraseGraph::from_pairs(&path_pairs(), &["A"]);
        let outcome = find_strict(&graph, &BigramRegistry::new(), graph.start_words(), 0);
        assert!(outcome.chains.is_empty());
    }

    #[test]
    fn test_relaxed_spends_one_forward_reuse() {
        let graph = PhraseGraph::from_pairs(&path_pairs(), &["A"]);
        let registry = BigramRegistry::from_pairs(&[("C", "D")]);

        assert!(find_strict(&graph, &registry, graph.start_words(), 1).chains.is_empty());

        let outcome = find_relaxed(&graph, &registry, graph.start_words(), 1);
        assert_eq!(outcome.chains, vec![chain_of(&PATH)]);
        assert!(validate_relaxed(&outcome.chains[0], &registry));
    }

    #[test]
    fn test_relaxed_budget_is_one() {
        let graph = PhraseGraph::from_pairs(&path_pairs(), &["A"]);
        let registry = BigramRegistry::from_pairs(&[("C", "D"), ("F", "G")]);
        assert!(find_relaxed(&graph, &registry, graph.start_words(), 1).chains.is_empty());
    }

    #[test]
    fn test_relaxed_budget_restored_on_backtrack() {
        // First branch spends the reuse on B→X then dies; second branch needs it at F→G
        let mut pairs = vec![("B", "X"), ("X", "Y")];
        pairs.extend(path_pairs());
        let graph = PhraseGraph::from_pairs(&pairs, &["A"]);
        let registry = BigramRegistry::from_pairs(&[("B", "X"), ("F", "G")]);

        let outcome = find_relaxed(&graph, &registry, graph.start_words(), 1);
        assert_eq!(outcome.chains, vec![chain_of(&PATH)]);
    }

    #[test]
    fn test_relaxed_rejects_reverse_matches() {
        let graph = PhraseGraph::from_pairs(&path_pairs(), &["A"]);
        let registry = BigramRegistry::from_pairs(&[("D", "C")]);
        assert!(find_relaxed(&graph, &registry, graph.start_words(), 1).chains.is_empty());
    }

    #[test]
    fn test_starts_tried_in_order() {
        let mut pairs = path_pairs();
        pairs.push(("Z", "A"));
        let graph = PhraseGraph::from_pairs(&pairs, &["Z", "A"]);
        let registry = BigramRegistry::new();
        let outcome = find_strict(&graph, &registry, graph.start_words(), 10);
        assert_eq!(
            outcome.chains,
            vec![
                chain_of(&["Z", "A", "B", "C", "D", "E", "F", "G", "H"]),
                chain_of(&PATH),
            ]
        );
    }
}

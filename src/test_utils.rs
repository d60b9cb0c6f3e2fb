use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use crate::graph::PhraseGraph;
use crate::registry::BigramRegistry;
use crate::types::{DirectedEdge, Word};

/// Word labels used by the generated graphs
pub fn word_labels(count: usize) -> Vec<Word> {
    (0..count).map(|i| Word::new(&format!("W{:02}", i))).collect()
}

/// A single unbranching directed path through `words`, starting at the first
pub fn path_graph(words: &[&str]) -> PhraseGraph {
    let pairs: Vec<(&str, &str)> = words.windows(2).map(|p| (p[0], p[1])).collect();
    PhraseGraph::from_pairs(&pairs, &words[..1.min(words.len())])
}

/// Generate a random graph with `word_count` words and up to `max_degree`
/// successors per word. Roughly half the words are start words.
pub fn generate_random_graph_with_rng(
    rng: &mut impl Rng,
    word_count: usize,
    max_degree: usize,
) -> PhraseGraph {
    let words = word_labels(word_count);
    let mut transitions: HashMap<Word, Vec<Word>> = HashMap::new();

    for word in &words {
        let degree = rng.gen_range(0..=max_degree);
        let successors: Vec<Word> = words
            .choose_multiple(rng, degree)
            .filter(|w| *w != word)
            .cloned()
            .collect();
        transitions.insert(word.clone(), successors);
    }

    let start_words: Vec<Word> = words.iter().filter(|_| rng.gen_bool(0.5)).cloned().collect();
    PhraseGraph::new(transitions, start_words)
}

pub fn generate_random_graph_with_seed(seed: u64, word_count: usize, max_degree: usize) -> PhraseGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_random_graph_with_rng(&mut rng, word_count, max_degree)
}

/// Register roughly `fraction` of the graph's edges, some of them reversed
pub fn generate_random_registry_with_rng(
    rng: &mut impl Rng,
    graph: &PhraseGraph,
    fraction: f64,
) -> BigramRegistry {
    let mut entries: Vec<(&Word, &[Word])> = graph.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut edges: Vec<DirectedEdge> = Vec::new();
    for (from, successors) in entries {
        for to in successors {
            if rng.gen_bool(fraction) {
                let edge = DirectedEdge::new(from.clone(), to.clone());
                edges.push(if rng.gen_bool(0.5) { edge.reversed() } else { edge });
            }
        }
    }
    edges.into_iter().collect()
}

pub fn generate_random_registry_with_seed(seed: u64, graph: &PhraseGraph, fraction: f64) -> BigramRegistry {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_random_registry_with_rng(&mut rng, graph, fraction)
}

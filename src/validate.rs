//! Acceptance predicates for candidate chains.
//!
//! These are pure and independent of how a chain was produced, so they double
//! as the oracle the generators are tested against.

use std::collections::HashSet;

use crate::registry::BigramRegistry;
use crate::types::{Strictness, Word, CHAIN_LENGTH};

/// Breakdown of how a chain fares against the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainReport {
    pub length_ok: bool,
    pub distinct: bool,
    /// Consecutive pairs registered in chain order
    pub forward_matches: usize,
    /// Consecutive pairs registered in the opposite order
    pub reverse_matches: usize,
}

impl ChainReport {
    pub fn is_strict(&self) -> bool {
        self.length_ok && self.distinct && self.forward_matches == 0 && self.reverse_matches == 0
    }

    pub fn is_relaxed(&self) -> bool {
        self.length_ok && self.distinct && self.reverse_matches == 0 && self.forward_matches <= 1
    }

    pub fn satisfies(&self, mode: Strictness) -> bool {
        match mode {
            Strictness::Strict => self.is_strict(),
            Strictness::Relaxed => self.is_relaxed(),
        }
    }

    /// Strongest mode the chain passes, if any
    pub fn verdict(&self) -> Option<Strictness> {
        if self.is_strict() {
            Some(Strictness::Strict)
        } else if self.is_relaxed() {
            Some(Strictness::Relaxed)
        } else {
            None
        }
    }
}

pub fn inspect(chain: &[Word], registry: &BigramRegistry) -> ChainReport {
    let unique: HashSet<&Word> = chain.iter().collect();
    let mut forward_matches = 0;
    let mut reverse_matches = 0;

    for pair in chain.windows(2) {
        if registry.contains(&pair[0], &pair[1]) {
            forward_matches += 1;
        }
        if registry.contains(&pair[1], &pair[0]) {
            reverse_matches += 1;
        }
    }

    ChainReport {
        length_ok: chain.len() == CHAIN_LENGTH,
        distinct: unique.len() == chain.len(),
        forward_matches,
        reverse_matches,
    }
}

/// Length 9, all words distinct, and no consecutive pair registered in either direction
pub fn validate_strict(chain: &[Word], registry: &BigramRegistry) -> bool {
    inspect(chain, registry).is_strict()
}

/// Length 9, all words distinct, no reverse match, at most one forward match
pub fn validate_relaxed(chain: &[Word], registry: &BigramRegistry) -> bool {
    inspect(chain, registry).is_relaxed()
}

pub fn validate(chain: &[Word], registry: &BigramRegistry, mode: Strictness) -> bool {
    inspect(chain, registry).satisfies(mode)
}

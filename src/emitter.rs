use log::{debug, error, info, warn};
use rand::Rng;
use std::collections::HashSet;

use crate::error::{ChainError, Result};
use crate::graph::PhraseGraph;
use crate::registry::BigramRegistry;
use crate::search::ChainSearch;
use crate::types::{Chain, Strictness, Word};
use crate::validate::validate;
use crate::walk::{start_pool, RandomWalkGenerator};

/// Default random-walk attempt budget per run
pub const DEFAULT_MAX_ATTEMPTS: usize = 100_000;

/// How chains are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Repeated strict random walks
    Random,
    /// Repeated unfiltered random walks, accepted under relaxed rules
    RandomRelaxed,
    /// Strict depth-first search stopping after `limit` chains
    Exhaustive { limit: usize },
    /// Relaxed depth-first search stopping after `limit` chains
    ExhaustiveRelaxed { limit: usize },
}

impl RunMode {
    pub fn strictness(&self) -> Strictness {
        match self {
            RunMode::Random | RunMode::Exhaustive { .. } => Strictness::Strict,
            RunMode::RandomRelaxed | RunMode::ExhaustiveRelaxed { .. } => Strictness::Relaxed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmitterOptions {
    pub mode: RunMode,
    /// Target chain count for the random modes
    pub count: usize,
    pub max_attempts: usize,
    /// When false every edge is treated as available
    pub unique_check: bool,
    /// Restrict the start pool to these words
    pub start_words: Option<Vec<Word>>,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self {
            mode: RunMode::Random,
            count: 10,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            unique_check: true,
            start_words: None,
        }
    }
}

/// Result of one emitter run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: RunMode,
    pub chains: Vec<Chain>,
    pub requested: usize,
    /// Random-walk attempts made (0 for exhaustive modes)
    pub attempts: usize,
    /// The search space ran out, as opposed to the attempt budget
    pub exhausted: bool,
}

impl RunReport {
    pub fn deficit(&self) -> usize {
        self.requested.saturating_sub(self.chains.len())
    }
}

/// Drives the generators for one run and collects distinct accepted chains.
///
/// The registry is never updated here: two chains from the same run may
/// share an unregistered edge. Only identical word sequences are collapsed.
pub struct CandidateEmitter<'a> {
    graph: &'a PhraseGraph,
    registry: &'a BigramRegistry,
    options: EmitterOptions,
}

impl<'a> CandidateEmitter<'a> {
    pub fn new(graph: &'a PhraseGraph, registry: &'a BigramRegistry, options: EmitterOptions) -> Self {
        Self {
            graph,
            registry,
            options,
        }
    }

    pub fn run<R: Rng>(&self, rng: &mut R) -> Result<RunReport> {
        let unchecked = BigramRegistry::new();
        let registry = if self.options.unique_check {
            self.registry
        } else {
            warn!("Uniqueness checks disabled: every edge is treated as available");
            &unchecked
        };

        let report = match self.options.mode {
            RunMode::Random | RunMode::RandomRelaxed => self.run_random(registry, rng),
            RunMode::Exhaustive { limit } | RunMode::ExhaustiveRelaxed { limit } => {
                self.run_exhaustive(registry, limit)?
            }
        };

        if report.deficit() > 0 {
            warn!(
                "Found {} of {} requested chains (deficit {}, {})",
                report.chains.len(),
                report.requested,
                report.deficit(),
                if report.exhausted {
                    "search space exhausted"
                } else {
                    "attempt budget exhausted"
                }
            );
        } else {
            info!("Collected {} chains", report.chains.len());
        }
        Ok(report)
    }

    fn run_random<R: Rng>(&self, registry: &BigramRegistry, rng: &mut R) -> RunReport {
        let mode = self.options.mode;
        let strictness = mode.strictness();
        let pool = start_pool(self.graph, registry, self.options.start_words.as_deref());
        info!("Random walks ({}) from a pool of {} start words", strictness, pool.len());

        let generator = RandomWalkGenerator::new(self.graph, registry, strictness).with_start_pool(pool);
        let mut collector = Collector::new(registry, strictness);
        let mut attempts = 0;

        if generator.start_pool().is_empty() {
            return collector.into_report(mode, self.options.count, attempts, true);
        }

        while collector.len() < self.options.count && attempts < self.options.max_attempts {
            attempts += 1;
            let Some(chain) = generator.generate(rng) else {
                continue;
            };
            match strictness {
                // Strict walks are valid by construction
                Strictness::Strict => collector.accept_checked(chain),
                Strictness::Relaxed => collector.accept_if_valid(chain),
            };
        }

        debug!("{} walk attempts for {} chains", attempts, collector.len());
        collector.into_report(mode, self.options.count, attempts, false)
    }

    fn run_exhaustive(&self, registry: &BigramRegistry, limit: usize) -> Result<RunReport> {
        let mode = self.options.mode;
        let strictness = mode.strictness();
        let restrict = self.options.start_words.as_deref();
        let starts = match strictness {
            Strictness::Strict => start_pool(self.graph, registry, restrict),
            // A relaxed chain may open on a reused edge
            Strictness::Relaxed => self
                .graph
                .start_words()
                .iter()
                .filter(|w| restrict.map_or(true, |r| r.contains(w)))
                .cloned()
                .collect(),
        };
        info!("Exhaustive {} search over {} start words", strictness, starts.len());

        let outcome = ChainSearch::new(self.graph, registry, strictness).find(&starts, limit);
        let mut collector = Collector::new(registry, strictness);
        for chain in outcome.chains {
            collector.accept_checked(chain);
        }

        if matches!(mode, RunMode::Exhaustive { .. }) && limit > 0 && collector.is_empty() {
            return Err(ChainError::NoSolution { limit });
        }
        Ok(collector.into_report(mode, limit, 0, outcome.exhausted))
    }
}

/// Accepted chains in discovery order, deduplicated by word sequence
struct Collector<'r> {
    registry: &'r BigramRegistry,
    strictness: Strictness,
    seen: HashSet<Chain>,
    chains: Vec<Chain>,
}

impl<'r> Collector<'r> {
    fn new(registry: &'r BigramRegistry, strictness: Strictness) -> Self {
        Self {
            registry,
            strictness,
            seen: HashSet::new(),
            chains: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.chains.len()
    }

    fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Accept a chain that its generator guarantees to be valid
    fn accept_checked(&mut self, chain: Chain) -> bool {
        if !validate(&chain, self.registry, self.strictness) {
            let err = ChainError::ValidationMismatch {
                chain,
                mode: self.strictness,
            };
            error!("{}", err);
            if cfg!(debug_assertions) {
                panic!("{}", err);
            }
            return false;
        }
        self.insert(chain)
    }

    fn accept_if_valid(&mut self, chain: Chain) -> bool {
        validate(&chain, self.registry, self.strictness) && self.insert(chain)
    }

    fn insert(&mut self, chain: Chain) -> bool {
        if !self.seen.insert(chain.clone()) {
            debug!("Skipping duplicate chain starting at {}", chain[0]);
            return false;
        }
        debug!("Accepted chain starting at {}", chain[0]);
        self.chains.push(chain);
        true
    }

    fn into_report(self, mode: RunMode, requested: usize, attempts: usize, exhausted: bool) -> RunReport {
        RunReport {
            mode,
            chains: self.chains,
            requested,
            attempts,
            exhausted,
        }
    }
}

use clap::Parser;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::emitter::{EmitterOptions, RunMode, DEFAULT_MAX_ATTEMPTS};
use crate::error::{ChainError, Result};
use crate::graph::PhraseGraph;
use crate::registry::BigramRegistry;
use crate::types::{Chain, Word, CHAIN_LENGTH};
use crate::validate::{inspect, ChainReport};

/// Configuration for the chain generator
#[derive(Debug, Clone, Parser)]
#[command(name = "chain-gen")]
#[command(about = "Generate candidate nine-word chains for the word-association puzzle")]
pub struct Config {
    /// Path to the phrase graph JSON ({ transitions, startWords })
    #[arg(long, default_value = "data/graph.json")]
    pub graph: PathBuf,

    /// Path to the used-bigram list (one FROM→TO per line)
    #[arg(long, default_value = "data/used_bigrams.txt")]
    pub used: PathBuf,

    /// Number of chains to generate in random mode (default: 10)
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,

    /// Write chains to this file as JSON instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Treat every edge as available (diagnostics only)
    #[arg(long)]
    pub no_unique_check: bool,

    /// Strict exhaustive search, stopping after N chains
    #[arg(long, value_name = "N", conflicts_with_all = ["allow_one_reuse", "find_one_reuse"])]
    pub find: Option<usize>,

    /// Random mode, accepting chains that reuse one used bigram
    #[arg(long, conflicts_with = "find_one_reuse")]
    pub allow_one_reuse: bool,

    /// Relaxed exhaustive search (one reuse allowed), stopping after N chains
    #[arg(long, value_name = "N")]
    pub find_one_reuse: Option<usize>,

    /// Random-walk attempts before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Seed for the random number generator (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only start chains from these words (repeatable)
    #[arg(long = "start", value_name = "WORD")]
    pub start: Vec<String>,

    /// Validate the chains in this JSON file against the registry and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["find", "allow_one_reuse", "find_one_reuse", "output"])]
    pub check: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Also write log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn mode(&self) -> RunMode {
        if let Some(limit) = self.find {
            RunMode::Exhaustive { limit }
        } else if let Some(limit) = self.find_one_reuse {
            RunMode::ExhaustiveRelaxed { limit }
        } else if self.allow_one_reuse {
            RunMode::RandomRelaxed
        } else {
            RunMode::Random
        }
    }

    pub fn emitter_options(&self) -> EmitterOptions {
        EmitterOptions {
            mode: self.mode(),
            count: self.count,
            max_attempts: self.max_attempts,
            unique_check: !self.no_unique_check,
            start_words: if self.start.is_empty() {
                None
            } else {
                Some(self.start.iter().map(|w| Word::new(w)).collect())
            },
        }
    }
}

/// Load the phrase graph and the used-bigram list named by `config`.
///
/// Both files must exist in every mode. With `--no-unique-check` the list is
/// still read but the emitter ignores it.
pub fn load_inputs(config: &Config) -> Result<(PhraseGraph, BigramRegistry)> {
    let graph = PhraseGraph::load(&config.graph)?;
    let registry = BigramRegistry::load(&config.used)?;
    if config.no_unique_check && config.check.is_none() {
        info!("Uniqueness checks disabled: ignoring {} used bigrams", registry.len());
    }
    Ok((graph, registry))
}

/// Inspect every chain against the registry, returning each chain with its
/// report and the number of chains that are neither strict nor relaxed.
pub fn check_chains(
    chains: &[Chain],
    registry: &BigramRegistry,
) -> (Vec<(Chain, ChainReport)>, usize) {
    let reports: Vec<(Chain, ChainReport)> = chains
        .iter()
        .map(|chain| (chain.clone(), inspect(chain, registry)))
        .collect();
    let invalid = reports.iter().filter(|(_, r)| r.verdict().is_none()).count();

    if invalid > 0 {
        warn!("{} of {} chains are invalid", invalid, chains.len());
    } else {
        info!("All {} chains are valid", chains.len());
    }
    (reports, invalid)
}

/// Chains file: a JSON array of nine-word arrays
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainsFile {
    pub chains: Vec<Chain>,
}

pub fn chains_to_json(chains: &[Chain]) -> Result<String> {
    serde_json::to_string_pretty(chains).map_err(|source| ChainError::Json {
        path: PathBuf::from("<output>"),
        source,
    })
}

/// Write chains to a JSON file
pub fn write_chains_to_file(chains: &[Chain], path: &Path) -> Result<()> {
    let json = chains_to_json(chains)?;
    std::fs::write(path, json).map_err(|source| ChainError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load chains from a JSON file. Every entry must have nine words.
pub fn load_chains(path: &Path) -> Result<Vec<Chain>> {
    let content = std::fs::read_to_string(path).map_err(|e| ChainError::from_io(path, e))?;
    let file: ChainsFile = serde_json::from_str(&content).map_err(|source| ChainError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    for (idx, chain) in file.chains.iter().enumerate() {
        if chain.len() != CHAIN_LENGTH {
            return Err(ChainError::malformed(
                path,
                idx + 1,
                format!("chain has {} words, expected {}", chain.len(), CHAIN_LENGTH),
            ));
        }
    }
    Ok(file.chains)
}

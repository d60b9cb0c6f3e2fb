use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Number of words in a puzzle chain
pub const CHAIN_LENGTH: usize = 9;

/// A normalized (trimmed, uppercase) token acting as a graph node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Word(String);

impl Word {
    pub fn new(raw: &str) -> Self {
        Word(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Word {
    fn from(raw: String) -> Self {
        Word::new(&raw)
    }
}

impl From<&str> for Word {
    fn from(raw: &str) -> Self {
        Word::new(raw)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.0
    }
}

impl Borrow<str> for Word {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A directed word-pair relationship. `(a, b)` and `(b, a)` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectedEdge {
    pub from: Word,
    pub to: Word,
}

impl DirectedEdge {
    pub fn new(from: Word, to: Word) -> Self {
        Self { from, to }
    }

    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }
}

impl fmt::Display for DirectedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.from, self.to)
    }
}

/// A candidate puzzle sequence
pub type Chain = Vec<Word>;

/// Build a chain from string literals (mostly for tests and fixtures)
pub fn chain_of(words: &[&str]) -> Chain {
    words.iter().map(|w| Word::new(w)).collect()
}

/// Which acceptance rules a chain is held to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// No consecutive pair may be registered in either direction
    Strict,
    /// No reverse matches, at most one forward match
    Relaxed,
}

impl Strictness {
    /// How many forward-registered edges a chain may use
    pub fn reuse_budget(self) -> usize {
        match self {
            Strictness::Strict => 0,
            Strictness::Relaxed => 1,
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strictness::Strict => f.write_str("strict"),
            Strictness::Relaxed => f.write_str("relaxed"),
        }
    }
}

//! Reel-set datasets: named collections of symbol sequences.
//!
//! A reel-set file is a JSON object mapping category names (`default`,
//! `default_boost`, `bonus`, ...) to arrays of reels. Each reel is either an
//! array of symbol ids (`["2", "1", "7"]`) or a packed string where every
//! character is one symbol (`"217"`).
//!
//! The calibration core only ever sees a [`Dataset`]; loading lives here so
//! the numerical modules stay free of I/O.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CalibrationError, CalibrationResult};

/// Symbol id of the scatter in the shipped reel sets.
pub const DEFAULT_HIT_SYMBOL: &str = "1";

/// Category calibrated when none is requested.
pub const DEFAULT_CATEGORY: &str = "default";

// ---------------------------------------------------------------------------
// Sequence / Dataset
// ---------------------------------------------------------------------------

/// One reel strip: an ordered run of symbol ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Sequence {
    symbols: Vec<String>,
}

impl Sequence {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a packed string into one symbol per character.
    pub fn from_packed(packed: &str) -> Self {
        Self {
            symbols: packed.chars().map(String::from).collect(),
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of positions holding `hit_symbol`.
    pub fn hit_count(&self, hit_symbol: &str) -> usize {
        self.symbols.iter().filter(|s| s.as_str() == hit_symbol).count()
    }
}

impl<'de> Deserialize<'de> for Sequence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawSequence {
            Symbols(Vec<String>),
            Packed(String),
        }

        Ok(match RawSequence::deserialize(deserializer)? {
            RawSequence::Symbols(symbols) => Sequence { symbols },
            RawSequence::Packed(packed) => Sequence::from_packed(&packed),
        })
    }
}

/// The sequences of a single category, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub category: String,
    pub sequences: Vec<Sequence>,
}

impl Dataset {
    pub fn new(category: impl Into<String>, sequences: Vec<Sequence>) -> Self {
        Self {
            category: category.into(),
            sequences,
        }
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Sum of all sequence lengths.
    pub fn total_elements(&self) -> u64 {
        self.sequences.iter().map(|s| s.len() as u64).sum()
    }
}

// ---------------------------------------------------------------------------
// Reel-set file
// ---------------------------------------------------------------------------

/// A parsed reel-set document holding every category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ReelSetFile {
    categories: BTreeMap<String, Vec<Sequence>>,
}

impl ReelSetFile {
    /// Parse a reel-set document. `origin` names the input in error messages.
    pub fn parse(origin: &str, raw: &str) -> CalibrationResult<Self> {
        serde_json::from_str(raw).map_err(|source| CalibrationError::Json {
            origin: origin.to_string(),
            source,
        })
    }

    /// Read and parse a reel-set document from disk.
    pub fn load_from_path(path: &Path) -> CalibrationResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| CalibrationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::parse(&path.display().to_string(), &raw)?;
        log::debug!(
            "loaded {} categor(ies) from {}",
            file.categories.len(),
            path.display()
        );
        Ok(file)
    }

    /// Category names in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Extract one category as a [`Dataset`].
    pub fn dataset(&self, category: &str) -> CalibrationResult<Dataset> {
        match self.categories.get(category) {
            Some(sequences) => Ok(Dataset::new(category, sequences.clone())),
            None => Err(CalibrationError::UnknownCategory {
                category: category.to_string(),
                available: self.categories().map(str::to_string).collect(),
            }),
        }
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The fuzzy index: a frozen corpus plus its derived gram structures.
//!
//! Construction does all the work once - per-entry gram tables, the
//! inverted gram index, and the self-score cache - and the result is
//! read-only for its lifetime. Ranking walks the inverted-index buckets for
//! the pattern's grams, so an entry sharing no gram with the pattern is
//! never touched: cost scales with (pattern-gram, matching-entry) pairs
//! rather than corpus size.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **FROZEN**: no field is mutated after construction
//! 2. **ALIGNED**: `entries`, `tables`, and `self_scores` have equal length
//!    and index `i` refers to the same entry in all three
//! 3. **BUCKET_ORDER**: every inverted-index bucket is sorted by ascending
//!    entry index (each entry contributes at most one pair per gram)
//! 4. **TIE_BREAK**: ranked output is sorted by descending score, then
//!    ascending entry index

use crate::grams::{normalized_score, GramTable, MAX_GRAM_LEN};
use crate::normalize::Normalization;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

/// Error type for bounds-checked entry access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// The requested entry index is outside the corpus.
    EntryOutOfBounds { index: usize, len: usize },
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::EntryOutOfBounds { index, len } => {
                write!(f, "entry index {} out of bounds for corpus of {}", index, len)
            }
        }
    }
}

impl Error for IndexError {}

/// Construction knobs for [`FuzzyIndex`].
///
/// The gram length is fixed per index; changing it means building a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexOptions {
    /// Strip diacritics before gram extraction.
    pub ignore_accents: bool,
    /// Lowercase before gram extraction.
    pub ignore_case: bool,
    /// Maximum gram length K.
    pub max_gram_len: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            ignore_accents: true,
            ignore_case: true,
            max_gram_len: MAX_GRAM_LEN,
        }
    }
}

/// An immutable n-gram index over a fixed corpus of strings.
///
/// Ranks corpus members by weighted n-gram overlap with a query pattern.
/// Entry indices are insertion positions and double as the deterministic
/// tie-break key in ranked output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyIndex {
    entries: Vec<String>,
    normalization: Normalization,
    max_gram_len: usize,
    tables: Vec<GramTable>,
    inverted: HashMap<String, Vec<(usize, u64)>>,
    self_scores: Vec<u64>,
}

impl FuzzyIndex {
    /// Build an index with the default options (strip accents, lowercase,
    /// grams up to length 5).
    pub fn new(entries: Vec<String>) -> Self {
        Self::with_options(entries, IndexOptions::default())
    }

    /// Build an index with explicit options.
    pub fn with_options(entries: Vec<String>, options: IndexOptions) -> Self {
        let normalization =
            Normalization::from_flags(options.ignore_accents, options.ignore_case);
        let max_gram_len = options.max_gram_len;

        let tables: Vec<GramTable> = entries
            .iter()
            .map(|entry| GramTable::build(&normalization.apply(entry), max_gram_len))
            .collect();

        // INVARIANT: BUCKET_ORDER
        // The outer loop runs in ascending entry order and each entry's table
        // holds one weight per distinct gram, so buckets come out sorted.
        let mut inverted: HashMap<String, Vec<(usize, u64)>> = HashMap::new();
        for (index, table) in tables.iter().enumerate() {
            for (gram, weight) in table.iter() {
                inverted
                    .entry(gram.to_string())
                    .or_default()
                    .push((index, weight));
            }
        }

        let self_scores: Vec<u64> = tables.iter().map(GramTable::self_score).collect();

        Self {
            entries,
            normalization,
            max_gram_len,
            tables,
            inverted,
            self_scores,
        }
    }

    /// Number of corpus entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for an empty corpus.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The corpus, in insertion order, as originally supplied.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The original (pre-normalization) string at `index`.
    pub fn entry(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Raw gram-overlap score between two standalone strings.
    ///
    /// Stateless: no corpus, no normalization, default gram length. Both
    /// tables are recomputed on every call.
    pub fn compare(pattern: &str, target: &str) -> u64 {
        let p = GramTable::build(pattern, MAX_GRAM_LEN);
        let t = GramTable::build(target, MAX_GRAM_LEN);
        p.dot(&t)
    }

    /// Normalized [0, 1] overlap coefficient between two standalone strings.
    ///
    /// Symmetric, 1.0 for identical non-empty strings, 0.0 when the strings
    /// share no gram (including when both are empty).
    pub fn weighted_compare(pattern: &str, target: &str) -> f64 {
        let p = GramTable::build(pattern, MAX_GRAM_LEN);
        let t = GramTable::build(target, MAX_GRAM_LEN);
        normalized_score(p.dot(&t), p.self_score(), t.self_score())
    }

    /// Raw score of `pattern` against the entry at `index`.
    ///
    /// The pattern is gram-extracted verbatim (no normalization), matching
    /// the stateless [`compare`](Self::compare); the entry side uses its
    /// precomputed table over the normalized entry.
    pub fn compare_to_entry(&self, pattern: &str, index: usize) -> Result<u64, IndexError> {
        let table = self.entry_table(index)?;
        let p = GramTable::build(pattern, self.max_gram_len);
        Ok(p.dot(table))
    }

    /// Normalized [0, 1] score of `pattern` against the entry at `index`,
    /// using the entry's cached self-score as its denominator term.
    pub fn weighted_compare_to_entry(
        &self,
        pattern: &str,
        index: usize,
    ) -> Result<f64, IndexError> {
        let table = self.entry_table(index)?;
        let p = GramTable::build(pattern, self.max_gram_len);
        Ok(normalized_score(
            p.dot(table),
            p.self_score(),
            self.self_scores[index],
        ))
    }

    /// Rank every entry sharing at least one gram with `pattern` by raw
    /// score, descending; ties resolve by ascending entry index.
    ///
    /// Entries with no shared gram are absent, not present with score 0.
    /// An empty pattern yields an empty result.
    pub fn rank_all(&self, pattern: &str) -> Vec<(usize, u64)> {
        let table = self.pattern_table(pattern);
        let mut ranked: Vec<(usize, u64)> = self.accumulate(&table).into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// As [`rank_all`](Self::rank_all), but scores are the normalized [0, 1]
    /// overlap coefficient against each matching entry.
    pub fn weighted_rank_all(&self, pattern: &str) -> Vec<(usize, f64)> {
        let table = self.pattern_table(pattern);
        let pattern_self = table.self_score();
        let mut ranked: Vec<(usize, f64)> = self
            .accumulate(&table)
            .into_iter()
            .map(|(index, raw)| {
                (
                    index,
                    normalized_score(raw, pattern_self, self.self_scores[index]),
                )
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// As [`weighted_rank_all`](Self::weighted_rank_all), but pairs each
    /// score with the original corpus string instead of its index.
    ///
    /// When nothing matches, returns the single fallback pair `("", 0.0)`
    /// rather than an empty sequence.
    pub fn rank_all_as_values(&self, pattern: &str) -> Vec<(&str, f64)> {
        let ranked = self.weighted_rank_all(pattern);
        if ranked.is_empty() {
            return vec![("", 0.0)];
        }
        ranked
            .into_iter()
            .map(|(index, score)| (self.entries[index].as_str(), score))
            .collect()
    }

    /// Gram table of a query pattern, normalized the same way the corpus was.
    fn pattern_table(&self, pattern: &str) -> GramTable {
        GramTable::build(&self.normalization.apply(pattern), self.max_gram_len)
    }

    /// Accumulate raw scores for every entry sharing a gram with `pattern`
    /// by walking the inverted-index buckets.
    fn accumulate(&self, pattern: &GramTable) -> HashMap<usize, u64> {
        let mut scores: HashMap<usize, u64> = HashMap::new();
        for (gram, a) in pattern.iter() {
            if let Some(bucket) = self.inverted.get(gram) {
                for &(index, b) in bucket {
                    *scores.entry(index).or_insert(0) += a * b;
                }
            }
        }
        scores
    }

    fn entry_table(&self, index: usize) -> Result<&GramTable, IndexError> {
        self.tables.get(index).ok_or(IndexError::EntryOutOfBounds {
            index,
            len: self.entries.len(),
        })
    }
}

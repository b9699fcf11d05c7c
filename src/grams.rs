// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Weighted n-gram extraction and sparse scoring.
//!
//! A gram is a contiguous substring of 1..=K characters. Every gram carries
//! weight `start_bonus + length`, where the start bonus is 1 when the gram
//! begins the string or immediately follows a separator. Longer grams and
//! grams at token boundaries score higher, biasing matches toward meaningful
//! word prefixes and long shared substrings rather than arbitrary short
//! overlaps.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **CHAR_INDEXED**: positions and lengths are Unicode scalar values,
//!    never bytes - a gram cannot split a codepoint
//! 2. **ACCUMULATED**: repeated occurrences of a gram sum their weights
//! 3. **POSITIVE**: every stored weight is >= 1 (zero-weight grams are
//!    never inserted)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default maximum gram length.
pub const MAX_GRAM_LEN: usize = 5;

/// Characters that start a new token for the gram start bonus.
const SEPARATORS: [char; 4] = [' ', '-', '_', ':'];

/// Is this character a token separator?
#[inline]
fn is_separator(c: char) -> bool {
    SEPARATORS.contains(&c)
}

/// Accumulated gram weights for one string.
///
/// Behaves as a sparse non-negative vector indexed by gram; absent grams
/// have weight zero. Built once, never mutated afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GramTable {
    weights: HashMap<String, u64>,
}

impl GramTable {
    /// Extract every gram of length 1..=`max_gram_len` from `text` and
    /// accumulate its weights.
    ///
    /// For each start position `i`:
    /// - start bonus is 1 if `i == 0` or the previous char is a separator
    /// - each gram `text[i..j]` (in chars) contributes `bonus + (j - i)`
    ///
    /// The table holds at most `max_gram_len * text.chars().count()` keys.
    pub fn build(text: &str, max_gram_len: usize) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let n = chars.len();
        let mut weights: HashMap<String, u64> = HashMap::new();

        for i in 0..n {
            let start_bonus = u64::from(i == 0 || is_separator(chars[i - 1]));
            let mut gram = String::new();
            for (len, &c) in chars[i..n.min(i + max_gram_len)].iter().enumerate() {
                gram.push(c);
                *weights.entry(gram.clone()).or_insert(0) += start_bonus + len as u64 + 1;
            }
        }

        GramTable { weights }
    }

    /// Weight of `gram`, zero if absent.
    #[inline]
    pub fn weight(&self, gram: &str) -> u64 {
        self.weights.get(gram).copied().unwrap_or(0)
    }

    /// Sparse dot product over shared grams.
    ///
    /// Iterates the smaller table and probes the larger, so the cost is
    /// proportional to the smaller operand.
    pub fn dot(&self, other: &GramTable) -> u64 {
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .map(|(gram, weight)| weight * large.weight(gram))
            .sum()
    }

    /// Score of this table against itself: the squared norm of the weight
    /// vector. Used as the normalization denominator.
    pub fn self_score(&self) -> u64 {
        self.weights.values().map(|weight| weight * weight).sum()
    }

    /// Number of distinct grams.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True when the source string was empty.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate over (gram, weight) pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.weights
            .iter()
            .map(|(gram, &weight)| (gram.as_str(), weight))
    }
}

/// Dice-style overlap coefficient: `2 * raw / (self_a + self_b)`.
///
/// Bounded in [0, 1] for non-negative weights, symmetric, and exactly 1.0
/// for identical tables. A zero denominator (both strings empty) yields 0.0
/// rather than dividing.
pub(crate) fn normalized_score(raw: u64, self_a: u64, self_b: u64) -> f64 {
    let denom = self_a + self_b;
    if denom == 0 {
        return 0.0;
    }
    2.0 * raw as f64 / denom as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_has_empty_table() {
        let table = GramTable::build("", MAX_GRAM_LEN);
        assert!(table.is_empty());
        assert_eq!(table.self_score(), 0);
    }

    #[test]
    fn test_single_char_weights() {
        // "a" at position 0: start bonus 1 + length 1 = 2
        let table = GramTable::build("a", MAX_GRAM_LEN);
        assert_eq!(table.len(), 1);
        assert_eq!(table.weight("a"), 2);
    }

    #[test]
    fn test_start_bonus_after_separator() {
        // "b" follows a dash, so its 1-gram gets the start bonus
        let table = GramTable::build("a-b", MAX_GRAM_LEN);
        assert_eq!(table.weight("b"), 2);
        // the dash itself is mid-string: weight 1
        assert_eq!(table.weight("-"), 1);
    }

    #[test]
    fn test_no_bonus_mid_token() {
        // second char of "ab": no bonus, weight = length = 1
        let table = GramTable::build("ab", MAX_GRAM_LEN);
        assert_eq!(table.weight("b"), 1);
        // "ab" starts at 0: bonus 1 + length 2 = 3
        assert_eq!(table.weight("ab"), 3);
    }

    #[test]
    fn test_repeated_grams_accumulate() {
        // "aa": "a" occurs at 0 (bonus, weight 2) and at 1 (weight 1)
        let table = GramTable::build("aa", MAX_GRAM_LEN);
        assert_eq!(table.weight("a"), 3);
    }

    #[test]
    fn test_gram_length_capped() {
        let table = GramTable::build("abcdef", 3);
        assert_eq!(table.weight("abc"), 4);
        assert_eq!(table.weight("abcd"), 0);
    }

    #[test]
    fn test_grams_are_char_based() {
        // é is multi-byte; grams must not split it
        let table = GramTable::build("éa", MAX_GRAM_LEN);
        assert_eq!(table.weight("é"), 2);
        assert_eq!(table.weight("éa"), 3);
        assert_eq!(table.weight("a"), 1);
    }

    #[test]
    fn test_dot_counts_only_shared_grams() {
        let a = GramTable::build("ab", MAX_GRAM_LEN);
        let b = GramTable::build("bc", MAX_GRAM_LEN);
        // only "b" is shared: a has weight 1, b has weight 2 (start of "bc")
        assert_eq!(a.dot(&b), 2);
    }

    #[test]
    fn test_dot_is_symmetric() {
        let a = GramTable::build("kitten", MAX_GRAM_LEN);
        let b = GramTable::build("sitting", MAX_GRAM_LEN);
        assert_eq!(a.dot(&b), b.dot(&a));
    }

    #[test]
    fn test_dot_with_self_matches_self_score() {
        let table = GramTable::build("hello world", MAX_GRAM_LEN);
        assert_eq!(table.dot(&table), table.self_score());
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        let a = GramTable::build("abc", MAX_GRAM_LEN);
        let b = GramTable::build("xyz", MAX_GRAM_LEN);
        assert_eq!(a.dot(&b), 0);
    }

    #[test]
    fn test_normalized_score_zero_denominator() {
        assert_eq!(normalized_score(0, 0, 0), 0.0);
    }

    #[test]
    fn test_normalized_self_match_is_one() {
        let table = GramTable::build("exact", MAX_GRAM_LEN);
        let s = table.self_score();
        assert_eq!(normalized_score(s, s, s), 1.0);
    }
}

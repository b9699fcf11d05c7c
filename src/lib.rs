// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Weighted n-gram fuzzy string matching and ranking.
//!
//! This crate ranks a fixed collection of strings by similarity to a query
//! pattern. At construction, [`FuzzyIndex`] extracts weighted n-grams from
//! every corpus entry and builds an inverted gram index; queries then score
//! only the entries that share at least one gram with the pattern.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌──────────────┐
//! │ normalize.rs │────▶│  grams.rs   │────▶│  index.rs    │
//! │(Normalization│     │ (GramTable, │     │ (FuzzyIndex, │
//! │  case/accent │     │  dot, self  │     │  rank_all,   │
//! │   folding)   │     │   score)    │     │  compare)    │
//! └──────────────┘     └─────────────┘     └──────────────┘
//! ```
//!
//! # Scoring
//!
//! A gram of length L starting at position 0 or after a separator
//! (space, dash, underscore, colon) weighs `L + 1`; elsewhere it weighs
//! `L`. Repeated occurrences accumulate. The raw score between two strings
//! is the sparse dot product of their gram-weight vectors; the weighted
//! score is the Dice-style coefficient `2 * raw / (selfA + selfB)`,
//! bounded in [0, 1] and exactly 1.0 for a self-match.
//!
//! # Usage
//!
//! ```
//! use gramdex::FuzzyIndex;
//!
//! let index = FuzzyIndex::new(vec![
//!     "apple".to_string(),
//!     "applesauce".to_string(),
//!     "banana".to_string(),
//! ]);
//!
//! let ranked = index.rank_all("appl");
//! assert_eq!(ranked.last().map(|&(i, _)| i), Some(2)); // banana ranks last
//!
//! let best = index.rank_all_as_values("aple");
//! assert_eq!(best[0].0, "apple");
//! ```

mod grams;
mod index;
mod normalize;

pub use grams::{GramTable, MAX_GRAM_LEN};
pub use index::{FuzzyIndex, IndexError, IndexOptions};
pub use normalize::Normalization;

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query and corpus normalization.
//!
//! The index decides once, at construction, how strings are folded before
//! gram extraction. The two boolean knobs (`ignore_accents`, `ignore_case`)
//! collapse into a closed enum so the hot path is a single match instead of
//! a stored closure.
//!
//! Accent stripping enables matching between ASCII and accented spellings:
//! - "café" → "cafe"
//! - "tummalachērla" → "tummalacherla"
//! - "naïve" → "naive"

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use serde::{Deserialize, Serialize};

/// How strings are folded before gram extraction.
///
/// Selected once per index from the `ignore_accents` / `ignore_case` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalization {
    /// Strings are used verbatim.
    None,
    /// Lowercase only.
    CaseOnly,
    /// Strip diacritics, preserve case.
    AccentsOnly,
    /// Strip diacritics, then lowercase. The default.
    CaseAndAccents,
}

impl Normalization {
    /// Map the two construction flags onto a variant.
    pub fn from_flags(ignore_accents: bool, ignore_case: bool) -> Self {
        match (ignore_accents, ignore_case) {
            (false, false) => Normalization::None,
            (false, true) => Normalization::CaseOnly,
            (true, false) => Normalization::AccentsOnly,
            (true, true) => Normalization::CaseAndAccents,
        }
    }

    /// Apply this normalization to a string.
    pub fn apply(self, value: &str) -> String {
        match self {
            Normalization::None => value.to_string(),
            Normalization::CaseOnly => value.to_lowercase(),
            Normalization::AccentsOnly => strip_accents(value),
            Normalization::CaseAndAccents => strip_accents(value).to_lowercase(),
        }
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Normalization::CaseAndAccents
    }
}

/// Strip diacritics and fold non-ASCII letters to ASCII.
///
/// # Algorithm (with unicode-normalization feature)
///
/// 1. NFKD normalize (decompose characters into base + combining marks)
/// 2. Drop combining marks (category Mn = Mark, Nonspacing)
/// 3. Fold the survivors that still aren't ASCII (ß → ss, ø → o, …)
///
/// Characters with no ASCII fold pass through unchanged; stripping is
/// best-effort, not a guarantee of ASCII output.
#[cfg(feature = "unicode-normalization")]
fn strip_accents(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.nfkd() {
        if is_combining_mark(c) {
            continue;
        }
        push_folded(&mut out, c);
    }
    out
}

/// Fallback without the unicode-normalization dependency: fold table only.
/// Precomposed accented characters (é, ñ, …) are left as-is.
#[cfg(not(feature = "unicode-normalization"))]
fn strip_accents(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        push_folded(&mut out, c);
    }
    out
}

fn push_folded(out: &mut String, c: char) {
    if c.is_ascii() {
        out.push(c);
    } else if let Some(folded) = ascii_fold(c) {
        out.push_str(folded);
    } else {
        out.push(c);
    }
}

/// ASCII folds for letters that NFKD does not decompose.
fn ascii_fold(c: char) -> Option<&'static str> {
    let folded = match c {
        'ß' => "ss",
        'ẞ' => "SS",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ø' => "o",
        'Ø' => "O",
        'đ' => "d",
        'Đ' => "D",
        'ð' => "d",
        'Ð' => "D",
        'þ' => "th",
        'Þ' => "TH",
        'ł' => "l",
        'Ł' => "L",
        'ħ' => "h",
        'Ħ' => "H",
        'ŋ' => "ng",
        'Ŋ' => "NG",
        'ı' => "i",
        'ĸ' => "k",
        'ſ' => "s",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags_covers_all_variants() {
        assert_eq!(Normalization::from_flags(false, false), Normalization::None);
        assert_eq!(
            Normalization::from_flags(false, true),
            Normalization::CaseOnly
        );
        assert_eq!(
            Normalization::from_flags(true, false),
            Normalization::AccentsOnly
        );
        assert_eq!(
            Normalization::from_flags(true, true),
            Normalization::CaseAndAccents
        );
    }

    #[test]
    fn test_none_is_identity() {
        assert_eq!(Normalization::None.apply("Café"), "Café");
    }

    #[test]
    fn test_case_only() {
        assert_eq!(Normalization::CaseOnly.apply("Hello World"), "hello world");
    }

    #[cfg(feature = "unicode-normalization")]
    #[test]
    fn test_accents_only_preserves_case() {
        assert_eq!(Normalization::AccentsOnly.apply("Café"), "Cafe");
        assert_eq!(Normalization::AccentsOnly.apply("naïve"), "naive");
    }

    #[cfg(feature = "unicode-normalization")]
    #[test]
    fn test_default_folds_everything() {
        assert_eq!(Normalization::CaseAndAccents.apply("Café"), "cafe");
        assert_eq!(
            Normalization::CaseAndAccents.apply("tummalachērla"),
            "tummalacherla"
        );
        assert_eq!(Normalization::CaseAndAccents.apply("RÉSUMÉ"), "resume");
    }

    #[test]
    fn test_fold_table() {
        // These letters have no NFKD decomposition; only the fold table
        // catches them, so this test passes with or without the feature.
        assert_eq!(Normalization::CaseAndAccents.apply("straße"), "strasse");
        assert_eq!(Normalization::CaseAndAccents.apply("Søren"), "soren");
    }

    #[cfg(feature = "unicode-normalization")]
    #[test]
    fn test_fold_and_decompose_combine() {
        // Ł needs the fold table, ó and ź need NFKD
        assert_eq!(Normalization::CaseAndAccents.apply("Łódź"), "lodz");
    }

    #[test]
    fn test_unfoldable_chars_pass_through() {
        // No ASCII fold for CJK; best-effort means leave them alone
        assert_eq!(Normalization::CaseAndAccents.apply("日本"), "日本");
    }
}

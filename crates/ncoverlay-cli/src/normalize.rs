//! Title normalization applied before parsing.
//!
//! Unifies full-width/half-width forms and symbol variants so the parser only
//! sees one spelling of each separator and digit.

use unicode_normalization::UnicodeNormalization;

/// NFKC-normalize a title and fold wave-dash variants to `~`.
pub fn normalize(s: &str) -> String {
    s.nfkc().map(fold_symbol).collect::<String>().trim().to_string()
}

/// Replace symbol variants NFKC leaves alone.
fn fold_symbol(c: char) -> char {
    match c {
        '\u{301C}' | '\u{FF5E}' | '\u{223C}' => '~', // 〜, ～, ∼
        '\u{2010}' | '\u{2012}' | '\u{2013}' | '\u{2212}' => '-', // hyphen, figure dash, en-dash, minus
        _ => c,
    }
}

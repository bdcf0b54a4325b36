//! Episode and season designator extraction.
//!
//! Each pattern is a [`Rule`]: a regex with named capture groups plus the
//! boundary guards that stand in for lookaround. Matches from every rule are
//! merged, sorted by position, and de-overlapped.

pub mod episode;
pub mod season;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::numeral;

pub use episode::episodes;
pub use season::seasons;

/// Regex fragment for an Arabic number.
pub(crate) const REGEXP_NUMBER: &str = "[0-9]{1,9}";

/// One designator match inside a text span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractResult {
    /// The matched substring.
    pub text: String,
    /// Resolved value of the (last) number.
    pub number: u32,
    /// Canonical kanji rendering, when one exists.
    pub kansuji: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// Start of a `第1~3話` style range.
    pub from_number: Option<u32>,
    pub from_kansuji: Option<String>,
    pub from_prefix: Option<String>,
    pub from_suffix: Option<String>,
    /// Inclusive `[start, end]` character offsets into the source span.
    pub range: (usize, usize),
}

/// Context a match must sit in, checked on the haystack around the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Guard {
    /// No constraint.
    Free,
    /// Not preceded by a Latin letter; followed by whitespace or end of span.
    Word,
    /// Preceded by `<non-space><space>`, followed by `<space><non-space>`.
    Between,
}

impl Guard {
    fn accepts(self, haystack: &str, start: usize, end: usize) -> bool {
        let before = haystack[..start].chars().rev();
        let after = haystack[end..].chars();
        match self {
            Guard::Free => true,
            Guard::Word => {
                let left = before.take(1).all(|c| !c.is_ascii_alphabetic());
                let right = after.take(1).all(char::is_whitespace);
                left && right
            }
            Guard::Between => {
                let mut before = before;
                let mut after = after;
                let left = matches!(
                    (before.next(), before.next()),
                    (Some(a), Some(b)) if a.is_whitespace() && !b.is_whitespace()
                );
                let right = matches!(
                    (after.next(), after.next()),
                    (Some(a), Some(b)) if a.is_whitespace() && !b.is_whitespace()
                );
                left && right
            }
        }
    }
}

/// A compiled pattern and the guard its matches must satisfy.
pub(crate) struct Rule {
    regex: Regex,
    guard: Guard,
}

impl Rule {
    pub(crate) fn new(pattern: &str, guard: Guard) -> Self {
        let regex = Regex::new(&format!("(?i){pattern}"))
            .unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"));
        Self { regex, guard }
    }

    /// All guarded matches, leftmost-first, scanning past rejected starts.
    fn captures<'h>(&self, haystack: &'h str) -> Vec<Captures<'h>> {
        let mut found = Vec::new();
        let mut at = 0;
        while at <= haystack.len() {
            let Some(caps) = self.regex.captures_at(haystack, at) else {
                break;
            };
            let Some(m) = caps.get(0) else {
                break;
            };
            if self.guard.accepts(haystack, m.start(), m.end()) && !m.is_empty() {
                at = m.end();
                found.push(caps);
            } else {
                at = m.start()
                    + haystack[m.start()..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
            }
        }
        found
    }
}

/// Run every rule over `text`, returning resolved matches in rule order.
pub(crate) fn run_rules(text: &str, rules: &[Rule]) -> Vec<ExtractResult> {
    rules
        .iter()
        .flat_map(|rule| rule.captures(text))
        .filter_map(|caps| to_result(text, &caps))
        .collect()
}

/// Sort by `(start, end)` and drop matches overlapping an earlier one.
///
/// The sort is stable, so on identical ranges the earlier rule wins.
pub(crate) fn sort_and_dedup(mut results: Vec<ExtractResult>) -> Vec<ExtractResult> {
    results.sort_by_key(|r| r.range);
    let mut kept: Vec<ExtractResult> = Vec::with_capacity(results.len());
    for result in results {
        if kept.last().is_some_and(|last| result.range.0 <= last.range.1) {
            continue;
        }
        kept.push(result);
    }
    kept
}

/// Resolve captured groups into an [`ExtractResult`].
/// Returns `None` when the main number does not resolve.
fn to_result(text: &str, caps: &Captures<'_>) -> Option<ExtractResult> {
    let m = caps.get(0)?;
    let group = |name: &str| {
        caps.name(name)
            .map(|g| g.as_str())
            .filter(|s| !s.is_empty())
    };

    let (number, kansuji) = resolve(group("number"), group("kansuji"))?;
    let (from_number, from_kansuji) =
        match resolve(group("from_number"), group("from_kansuji")) {
            Some((n, k)) => (Some(n), k),
            None => (None, None),
        };

    let start = text[..m.start()].chars().count();
    let len = m.as_str().chars().count();

    Some(ExtractResult {
        text: m.as_str().to_string(),
        number,
        kansuji,
        prefix: group("prefix").map(str::to_string),
        suffix: group("suffix").map(str::to_string),
        from_number,
        from_kansuji,
        from_prefix: group("from_prefix").map(str::to_string),
        from_suffix: group("from_suffix").map(str::to_string),
        range: (start, start + len - 1),
    })
}

/// Resolve an Arabic or kanji capture into `(number, kansuji)`.
///
/// A kanji rendering that cannot be produced leaves `kansuji` empty; a number
/// that cannot be resolved yields `None`.
fn resolve(arabic: Option<&str>, kanji: Option<&str>) -> Option<(u32, Option<String>)> {
    if let Some(digits) = arabic {
        let number = numeral::arabic_to_number(digits).ok()?;
        return Some((number, numeral::number_to_kanji(number).ok()));
    }
    let kanji = kanji?;
    let number = numeral::kanji_to_number(kanji).ok()?;
    Some((number, Some(kanji.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_guard() {
        assert!(Guard::Word.accepts("ep1", 0, 3));
        assert!(Guard::Word.accepts("x ep1 y", 2, 5));
        assert!(!Guard::Word.accepts("deep1", 2, 5));
        assert!(!Guard::Word.accepts("ep1x", 0, 3));
    }

    #[test]
    fn test_between_guard() {
        assert!(Guard::Between.accepts("a 12 b", 2, 4));
        assert!(!Guard::Between.accepts("12 b", 0, 2));
        assert!(!Guard::Between.accepts("a 12", 2, 4));
        assert!(!Guard::Between.accepts("a  12 b", 3, 5));
    }

    #[test]
    fn test_rule_scans_past_rejected_start() {
        let rule = Rule::new(r"(?P<number>[0-9]+)", Guard::Word);
        let caps = rule.captures("a1 b2 3");
        let texts: Vec<_> = caps.iter().map(|c| &c[0]).collect();
        assert_eq!(texts, vec!["3"]);
    }

    #[test]
    fn test_range_uses_char_offsets() {
        let rule = Rule::new(r"第(?P<number>[0-9]+)話", Guard::Free);
        let results = run_rules("「あ」第3話", &[rule]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].range, (3, 5));
        assert_eq!(results[0].kansuji.as_deref(), Some("三"));
    }

    #[test]
    fn test_unrepresentable_kanji_keeps_number() {
        let rule = Rule::new(r"#(?P<number>[0-9]+)", Guard::Free);
        let results = run_rules("#123456789", &[rule]);
        assert_eq!(results[0].number, 123_456_789);
        assert_eq!(results[0].kansuji, None);
    }

    #[test]
    fn test_dedup_prefers_earlier() {
        let a = Rule::new(r"第(?P<number>[0-9]+)話", Guard::Free);
        let b = Rule::new(r"(?P<number>[0-9]+)話", Guard::Free);
        let results = sort_and_dedup(run_rules("第3話", &[a, b]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "第3話");
    }
}

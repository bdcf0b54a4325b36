use regex::Regex;
use std::sync::LazyLock;

use super::{run_rules, sort_and_dedup, ExtractResult, Guard, Rule, REGEXP_NUMBER};
use crate::numeral::{DAIJI, KANSUJI};

// ── Strict patterns (tried in priority order) ───────────────────

static EPISODE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let kansuji = format!("[{KANSUJI}]{{1,12}}");
    let daiji = format!("[{DAIJI}]{{1,12}}");

    // 第1話, 第1~2話, 新第1話目
    let counter = |from: &str, number: &str, value: &str| {
        format!(
            "(?:(?P<from_prefix>新?第?)(?P<{from}>{value})(?P<from_suffix>話?目?)(?P<separator>[~&]))?\
             (?P<prefix>新?第?)(?P<{number}>{value})(?P<suffix>話目?)"
        )
    };

    vec![
        Rule::new(&counter("from_number", "number", REGEXP_NUMBER), Guard::Free),
        Rule::new(&counter("from_kansuji", "kansuji", &kansuji), Guard::Free),
        Rule::new(&counter("from_kansuji", "kansuji", &daiji), Guard::Free),
        // エピソード1
        Rule::new(&format!("(?P<prefix>エピソード)(?P<number>{REGEXP_NUMBER})"), Guard::Free),
        Rule::new(&format!("(?P<prefix>えぴそーど)(?P<number>{REGEXP_NUMBER})"), Guard::Free),
        // episode1, ep 1, episode.1, ep:01, episode|1
        Rule::new(
            &format!(r"(?P<prefix>(?:episode|ep)[\s.:|]?)(?P<number>{REGEXP_NUMBER})"),
            Guard::Word,
        ),
        // chapter1, chapter.1, chapter:1
        Rule::new(
            &format!(r"(?P<prefix>chapter[\s.:|]?)(?P<number>{REGEXP_NUMBER})"),
            Guard::Word,
        ),
        // #01
        Rule::new(&format!("(?P<prefix>#)(?P<number>{REGEXP_NUMBER})"), Guard::Free),
    ]
});

// ── Vague patterns (non-strict only) ────────────────────────────

static VAGUE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let kansuji = format!("[{KANSUJI}]{{1,12}}");
    let not_number = format!(r"[^\s0-9{KANSUJI}{DAIJI}]");

    vec![
        // <title> 一占 / 第一羽 / 第1憑目 / 喪1 <subtitle>
        Rule::new(
            &format!("(?P<prefix>{not_number}{{1,10}})(?P<number>{REGEXP_NUMBER})(?P<suffix>{not_number}{{0,3}})"),
            Guard::Between,
        ),
        Rule::new(
            &format!("(?P<prefix>{not_number}{{1,10}})(?P<kansuji>{kansuji})(?P<suffix>{not_number}{{0,3}})"),
            Guard::Between,
        ),
        Rule::new(
            &format!("(?P<prefix>{not_number}{{0,10}})(?P<number>{REGEXP_NUMBER})(?P<suffix>{not_number}{{1,3}})"),
            Guard::Between,
        ),
        Rule::new(
            &format!("(?P<prefix>{not_number}{{0,10}})(?P<kansuji>{kansuji})(?P<suffix>{not_number}{{1,3}})"),
            Guard::Between,
        ),
        // <title> Log 01 <subtitle>
        Rule::new(
            &format!(r"(?P<prefix>[a-z]{{2,6}}\s)(?P<number>{REGEXP_NUMBER})"),
            Guard::Between,
        ),
        // <title> 01 <subtitle>
        Rule::new("(?P<number>[1-9][0-9]{2}|0?[0-9]{2})", Guard::Between),
    ]
});

/// Word stems that make a vague match a non-episode designator.
static EXCLUDED_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:season|episode|ep|chapter|part)(?:\s|$)").unwrap()
});

/// Suffixes that mark a vague match as an ordinal or a season.
static EXCLUDED_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s?(?:期|シリーズ|シーズン|st|nd|rd|th)$").unwrap());

/// Find episode designators in `text`.
///
/// With `strict` unset, loosely shaped numbers sitting between two words are
/// matched as well, minus known season/ordinal false positives.
pub fn episodes(text: &str, strict: bool) -> Vec<ExtractResult> {
    let mut results = sort_and_dedup(run_rules(text, &EPISODE_RULES));
    if strict {
        return results;
    }

    // Vague matches only fill the gaps between strict ones.
    let vague = run_rules(text, &VAGUE_RULES).into_iter().filter(|r| {
        let prefix_ok = r
            .prefix
            .as_deref()
            .map_or(true, |p| !EXCLUDED_PREFIX.is_match(p));
        let suffix_ok = r
            .suffix
            .as_deref()
            .map_or(true, |s| !EXCLUDED_SUFFIX.is_match(s));
        let free = !results.iter().any(|k| overlaps(k.range, r.range));
        prefix_ok && suffix_ok && free
    });
    let vague = sort_and_dedup(vague.collect());

    results.extend(vague);
    results.sort_by_key(|r| r.range);
    results
}

fn overlaps(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

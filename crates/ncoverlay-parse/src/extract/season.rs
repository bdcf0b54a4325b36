use std::sync::LazyLock;

use super::{run_rules, sort_and_dedup, ExtractResult, Guard, Rule, REGEXP_NUMBER};
use crate::numeral::{DAIJI, KANSUJI};

static SEASON_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let kansuji = format!("[{KANSUJI}]{{1,12}}");
    let daiji = format!("[{DAIJI}]{{1,12}}");

    let mut rules = Vec::new();
    for (group, value) in [
        ("number", REGEXP_NUMBER),
        ("kansuji", kansuji.as_str()),
        ("kansuji", daiji.as_str()),
    ] {
        // 第2期, 2期, 第二期, 第弐期
        rules.push(Rule::new(
            &format!("(?P<prefix>第?)(?P<{group}>{value})(?P<suffix>期)"),
            Guard::Free,
        ));
        // 第2シリーズ, 第二シーズン
        rules.push(Rule::new(
            &format!("(?P<prefix>第)(?P<{group}>{value})(?P<suffix>シリーズ|シーズン)"),
            Guard::Free,
        ));
    }

    // 2nd season, 3rd Season
    rules.push(Rule::new(
        &format!(r"(?P<number>{REGEXP_NUMBER})(?P<suffix>(?:st|nd|rd|th)\s?season)"),
        Guard::Free,
    ));
    // season 2, Season2
    rules.push(Rule::new(
        &format!(r"(?P<prefix>season\s?)(?P<number>{REGEXP_NUMBER})"),
        Guard::Word,
    ));

    rules
});

/// Find season designators in `text`.
pub fn seasons(text: &str) -> Vec<ExtractResult> {
    sort_and_dedup(run_rules(text, &SEASON_RULES))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(text: &str) -> ExtractResult {
        seasons(text)
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("no season in {text:?}"))
    }

    #[test]
    fn test_japanese_season() {
        let m = first("第2期");
        assert_eq!(m.number, 2);
        assert_eq!(m.prefix.as_deref(), Some("第"));
        assert_eq!(m.suffix.as_deref(), Some("期"));

        let m = first("2期");
        assert_eq!(m.number, 2);
        assert_eq!(m.prefix, None);
    }

    #[test]
    fn test_kansuji_series() {
        let m = first("第二シリーズ");
        assert_eq!(m.number, 2);
        assert_eq!(m.kansuji.as_deref(), Some("二"));

        assert_eq!(first("第3シーズン").number, 3);
    }

    #[test]
    fn test_daiji_season() {
        assert_eq!(first("第弐期").number, 2);
        assert_eq!(first("第参シリーズ").number, 3);
    }

    #[test]
    fn test_ordinal_season() {
        let m = first("2nd season");
        assert_eq!(m.number, 2);
        assert_eq!(m.text, "2nd season");
        assert_eq!(first("3rd Season").number, 3);
        assert_eq!(first("4thseason").number, 4);
    }

    #[test]
    fn test_season_word() {
        let m = first("Season 2");
        assert_eq!(m.number, 2);
        assert_eq!(m.prefix.as_deref(), Some("Season "));
        assert!(seasons("preseason 2").is_empty());
    }

    #[test]
    fn test_no_season() {
        assert!(seasons("第3話").is_empty());
        assert!(seasons("2nd place").is_empty());
    }

    #[test]
    fn test_range_offsets() {
        let m = first("作品 第2期");
        assert_eq!(m.range, (3, 5));
    }
}

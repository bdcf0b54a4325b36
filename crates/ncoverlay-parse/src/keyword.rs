use phf::phf_map;

/// How a bracket pair frames its contents for the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketKind {
    /// 「」 and ｢｣: subtitle framing.
    Quote,
    /// 『』: work-title framing.
    KeyQuote,
    /// 【】: decoration such as channel or campaign tags.
    Lenticular,
    /// () and （）.
    Parenthesis,
    Other,
}

impl BracketKind {
    /// Opaque blocks keep their contents as one literal leaf.
    pub fn opaque(self) -> bool {
        matches!(self, BracketKind::Quote | BracketKind::KeyQuote)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    pub open: char,
    pub close: char,
    pub kind: BracketKind,
}

/// Registered bracket pairs, keyed by opening character.
static BRACKETS: phf::Map<char, Bracket> = phf_map! {
    '「' => Bracket { open: '「', close: '」', kind: BracketKind::Quote },
    '｢' => Bracket { open: '｢', close: '｣', kind: BracketKind::Quote },
    '『' => Bracket { open: '『', close: '』', kind: BracketKind::KeyQuote },
    '【' => Bracket { open: '【', close: '】', kind: BracketKind::Lenticular },
    '(' => Bracket { open: '(', close: ')', kind: BracketKind::Parenthesis },
    '（' => Bracket { open: '（', close: '）', kind: BracketKind::Parenthesis },
    '《' => Bracket { open: '《', close: '》', kind: BracketKind::Other },
    '〈' => Bracket { open: '〈', close: '〉', kind: BracketKind::Other },
    '"' => Bracket { open: '"', close: '"', kind: BracketKind::Other },
    '”' => Bracket { open: '”', close: '”', kind: BracketKind::Other },
    '〔' => Bracket { open: '〔', close: '〕', kind: BracketKind::Other },
    '[' => Bracket { open: '[', close: ']', kind: BracketKind::Other },
};

/// Look up the bracket pair opened by `c`.
pub fn opening_bracket(c: char) -> Option<Bracket> {
    BRACKETS.get(&c).copied()
}

/// Characters that always form a token of their own.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '"' | '『'
                | '』'
                | '【'
                | '】'
                | '('
                | ')'
                | '「'
                | '」'
                | '｢'
                | '｣'
                | '《'
                | '》'
                | '/'
                | '〈'
                | '〉'
                | '＜'
                | '＞'
                | '['
                | ']'
                | '〔'
                | '〕'
                | '|'
                | '｜'
                | '／'
                | '│'
                | '・'
                | '（'
                | '）'
                | '~'
                | '”'
                | '-'
        )
}

/// Whether `text` is non-empty and made only of separator characters.
pub fn is_separator_text(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_separator)
}

/// Marketing terms. A leaf containing any of them is a promo, not content.
pub const PROMO_KEYWORDS: &[&str] = &[
    "期間限定",
    "見逃し",
    "公式",
    "アニメ",
    "全話",
    "イッキ見",
    "更新",
    "無料",
    "映画",
    "特別公開",
    "周年",
    "フル",
    "full",
];

/// Words in a promo that announce the work title follows.
pub const ANIME_WORDS: &[&str] = &["アニメ", "あにめ"];

/// Words in a promo that mark an official upload.
pub const OFFICIAL_WORDS: &[&str] = &["公式"];

pub fn is_promo(text: &str) -> bool {
    contains_any(text, PROMO_KEYWORDS)
}

pub fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_lookup() {
        let b = opening_bracket('『').unwrap();
        assert_eq!(b.close, '』');
        assert_eq!(b.kind, BracketKind::KeyQuote);
        assert_eq!(opening_bracket('（').unwrap().kind, BracketKind::Parenthesis);
        assert_eq!(opening_bracket('｢').unwrap().kind, BracketKind::Quote);
        assert!(opening_bracket('」').is_none());
    }

    #[test]
    fn test_every_bracket_is_a_separator() {
        for b in BRACKETS.values() {
            assert!(is_separator(b.open), "{:?}", b.open);
            assert!(is_separator(b.close), "{:?}", b.close);
        }
    }

    #[test]
    fn test_opaque_kinds() {
        assert!(BracketKind::Quote.opaque());
        assert!(BracketKind::KeyQuote.opaque());
        assert!(!BracketKind::Lenticular.opaque());
        assert!(!BracketKind::Parenthesis.opaque());
    }

    #[test]
    fn test_separator_text() {
        assert!(is_separator_text(" "));
        assert!(is_separator_text("・ "));
        assert!(is_separator_text("\u{3000}"));
        assert!(!is_separator_text(""));
        assert!(!is_separator_text(" a"));
    }

    #[test]
    fn test_promo() {
        assert!(is_promo("期間限定配信"));
        assert!(is_promo("アニメ公式"));
        assert!(is_promo("full ver"));
        assert!(!is_promo("もう一つの世界"));
        assert!(contains_any("TVあにめ", ANIME_WORDS));
        assert!(!contains_any("無料", OFFICIAL_WORDS));
    }
}

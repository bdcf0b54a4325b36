//! Title, season, and episode assignment over a built tree.

use bitflags::bitflags;

use crate::ast::{AstElement, AstNode, ElementKind};
use crate::config::ParserConfig;
use crate::elements::{EvaluatedEpisode, EvaluatedMeta};
use crate::extract;
use crate::keyword::{self, BracketKind, ANIME_WORDS, OFFICIAL_WORDS};

bitflags! {
    /// Why a leaf might be a title or subtitle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MetaReasons: u8 {
        const AFTER_EPISODE = 0b0000_0001;
        /// Follows a promo naming the upload as anime (`アニメ`).
        const AFTER_ANIME_WORD = 0b0000_0010;
        /// Follows a promo naming the upload as official (`公式`).
        const AFTER_OFFICIAL_WORD = 0b0000_0100;
        /// Directly inside 「」 or ｢｣.
        const IN_QUOTE = 0b0000_1000;
        /// Directly inside 『』.
        const IN_KEY_QUOTE = 0b0001_0000;
        /// Directly inside 【】.
        const IN_LENTICULAR = 0b0010_0000;
        /// Directly inside () or （）.
        const IN_PARENTHESIS = 0b0100_0000;
    }
}

/// A leaf in document order with the reasons that apply to it.
#[derive(Debug, Clone, Copy)]
struct MetaContents<'a> {
    element: &'a AstElement,
    reasons: MetaReasons,
}

/// Evaluate a tree into title, season, and episodes.
pub fn evaluate(ast: &[AstNode], config: &ParserConfig) -> EvaluatedMeta {
    let mut contents = Vec::new();
    collect(ast, None, None, &mut contents);

    let mut meta = EvaluatedMeta::default();
    let mut range: Option<(u32, u32)> = None;
    let mut subtitles: Vec<&AstElement> = Vec::new();

    for MetaContents { element, reasons } in contents {
        match element.kind {
            ElementKind::Episode => {
                let Some(found) = extract::episodes(&element.content, true).into_iter().next()
                else {
                    tracing::debug!(content = %element.content, "episode leaf did not resolve");
                    continue;
                };
                let number = found.number;
                if let Some((_, to)) = range.filter(|&(_, to)| number < to) {
                    tracing::debug!(number, to, "dropping episode below current range");
                    continue;
                }
                let from = found.from_number.filter(|&f| f <= number).unwrap_or(number);
                range = Some((from, number));
            }
            ElementKind::Season => {
                if meta.season.is_none() {
                    meta.season = Some(element.content.clone());
                }
            }
            _ if element.content.is_empty() => {}
            _ => {
                if reasons.intersects(MetaReasons::AFTER_OFFICIAL_WORD | MetaReasons::AFTER_ANIME_WORD)
                {
                    meta.title = Some(element.to_string());
                } else if reasons.contains(MetaReasons::IN_KEY_QUOTE) && meta.title.is_none() {
                    meta.title = Some(element.to_string());
                } else if !reasons.contains(MetaReasons::IN_QUOTE) && meta.title.is_none() {
                    meta.title = Some(element.to_string());
                } else if reasons.contains(MetaReasons::IN_QUOTE)
                    || !reasons.intersects(MetaReasons::IN_LENTICULAR | MetaReasons::IN_PARENTHESIS)
                {
                    subtitles.push(element);
                }
            }
        }
    }

    if meta.title.is_none() && !subtitles.is_empty() {
        meta.title = Some(subtitles.remove(0).to_string());
    }

    match range {
        Some((from, to)) => {
            let span = (to - from).saturating_add(1);
            if span > config.max_episode_span {
                tracing::warn!(
                    from,
                    to,
                    max = config.max_episode_span,
                    "episode range truncated"
                );
            }
            let count = span.min(config.max_episode_span);
            meta.episodes = (0..count)
                .map(|k| EvaluatedEpisode {
                    number: from + k,
                    title: subtitles.get(k as usize).map(|e| e.content.clone()),
                })
                .collect();
        }
        None if meta.title.is_some() => {
            meta.episodes.push(EvaluatedEpisode {
                number: 0,
                title: subtitles.first().map(|e| e.content.clone()),
            });
        }
        None => {}
    }

    meta
}

/// Walk `nodes` depth-first, pushing candidate leaves onto `out`.
///
/// `previous` is the last non-separator leaf seen before `nodes`; the last one
/// seen after them is returned.
fn collect<'a>(
    nodes: &'a [AstNode],
    enclosing: Option<BracketKind>,
    mut previous: Option<&'a AstElement>,
    out: &mut Vec<MetaContents<'a>>,
) -> Option<&'a AstElement> {
    for node in nodes {
        let element = match node {
            AstNode::Block(block) => {
                previous = collect(&block.content, Some(block.kind()), previous, out);
                continue;
            }
            AstNode::Element(element) => element,
        };

        match element.kind {
            ElementKind::Episode | ElementKind::Season => out.push(MetaContents {
                element,
                reasons: MetaReasons::empty(),
            }),
            ElementKind::Constant | ElementKind::Unknown => out.push(MetaContents {
                element,
                reasons: reasons(previous, enclosing),
            }),
            _ => {}
        }

        if element.kind != ElementKind::Separator {
            previous = Some(element);
        }
    }
    previous
}

fn reasons(previous: Option<&AstElement>, enclosing: Option<BracketKind>) -> MetaReasons {
    let mut reasons = MetaReasons::empty();

    if let Some(prev) = previous {
        match prev.kind {
            ElementKind::Episode => reasons |= MetaReasons::AFTER_EPISODE,
            ElementKind::Promo => {
                reasons.set(
                    MetaReasons::AFTER_ANIME_WORD,
                    keyword::contains_any(&prev.content, ANIME_WORDS),
                );
                reasons.set(
                    MetaReasons::AFTER_OFFICIAL_WORD,
                    keyword::contains_any(&prev.content, OFFICIAL_WORDS),
                );
            }
            _ => {}
        }
    }

    match enclosing {
        Some(BracketKind::Quote) => reasons |= MetaReasons::IN_QUOTE,
        Some(BracketKind::KeyQuote) => reasons |= MetaReasons::IN_KEY_QUOTE,
        Some(BracketKind::Lenticular) => reasons |= MetaReasons::IN_LENTICULAR,
        Some(BracketKind::Parenthesis) => reasons |= MetaReasons::IN_PARENTHESIS,
        Some(BracketKind::Other) | None => {}
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast;
    use crate::tokenizer::tokenize;

    fn eval(input: &str) -> EvaluatedMeta {
        let config = ParserConfig::default();
        evaluate(&ast::build(&tokenize(input), &config), &config)
    }

    fn numbers(meta: &EvaluatedMeta) -> Vec<u32> {
        meta.episodes.iter().map(|e| e.number).collect()
    }

    fn tagged(input: &str) -> Vec<(String, MetaReasons)> {
        let ast = ast::build(&tokenize(input), &ParserConfig::default());
        let mut out = Vec::new();
        collect(&ast, None, None, &mut out);
        out.into_iter()
            .map(|m| (m.element.content.clone(), m.reasons))
            .collect()
    }

    #[test]
    fn test_reasons_for_brackets() {
        let tags = tagged("『A』「B」【C】(D)[E]");
        assert_eq!(
            tags,
            vec![
                ("A".to_string(), MetaReasons::IN_KEY_QUOTE),
                ("B".to_string(), MetaReasons::IN_QUOTE),
                ("C".to_string(), MetaReasons::IN_LENTICULAR),
                ("D".to_string(), MetaReasons::IN_PARENTHESIS),
                ("E".to_string(), MetaReasons::empty()),
            ]
        );
    }

    #[test]
    fn test_reasons_after_episode_and_promo() {
        let tags = tagged("第1話 A アニメ公式 B");
        assert_eq!(tags[0].1, MetaReasons::empty());
        assert_eq!(tags[1], ("A".to_string(), MetaReasons::AFTER_EPISODE));
        assert_eq!(
            tags[2],
            (
                "B".to_string(),
                MetaReasons::AFTER_ANIME_WORD | MetaReasons::AFTER_OFFICIAL_WORD
            )
        );
    }

    #[test]
    fn test_previous_carries_out_of_blocks() {
        let tags = tagged("【公式】作品名");
        assert_eq!(
            tags,
            vec![("作品名".to_string(), MetaReasons::AFTER_OFFICIAL_WORD)]
        );
    }

    #[test]
    fn test_previous_carries_into_blocks() {
        let tags = tagged("第2話「サブ」");
        assert_eq!(
            tags[1],
            (
                "サブ".to_string(),
                MetaReasons::AFTER_EPISODE | MetaReasons::IN_QUOTE
            )
        );
    }

    #[test]
    fn test_key_quote_title_and_quote_subtitle() {
        let meta = eval("『〇〇』第3話「もう一つの世界」");
        assert_eq!(meta.title.as_deref(), Some("〇〇"));
        assert_eq!(meta.season, None);
        assert_eq!(
            meta.episodes,
            vec![EvaluatedEpisode {
                number: 3,
                title: Some("もう一つの世界".to_string()),
            }]
        );
    }

    #[test]
    fn test_keyword_overwrites_title() {
        let meta = eval("『仮』 公式 本題");
        assert_eq!(meta.title.as_deref(), Some("本題"));
    }

    #[test]
    fn test_official_block_then_title() {
        let meta = eval("【アニメ公式】作品名 第1話");
        assert_eq!(meta.title.as_deref(), Some("作品名"));
        assert_eq!(numbers(&meta), vec![1]);
    }

    #[test]
    fn test_decoration_is_discarded() {
        let meta = eval("作品 (おまけ) 本文");
        assert_eq!(meta.title.as_deref(), Some("作品"));
        assert_eq!(
            meta.episodes,
            vec![EvaluatedEpisode {
                number: 0,
                title: Some("本文".to_string()),
            }]
        );
    }

    #[test]
    fn test_quote_only_is_promoted() {
        let meta = eval("「サブ」");
        assert_eq!(meta.title.as_deref(), Some("サブ"));
        assert_eq!(
            meta.episodes,
            vec![EvaluatedEpisode {
                number: 0,
                title: None,
            }]
        );
    }

    #[test]
    fn test_first_season_wins() {
        let meta = eval("作品 第2期 第3期");
        assert_eq!(meta.season.as_deref(), Some("第2期"));
    }

    #[test]
    fn test_range_law() {
        let meta = eval("作品 第1~3話");
        assert_eq!(numbers(&meta), vec![1, 2, 3]);
        assert!(meta.episodes.iter().all(|e| e.title.is_none()));
    }

    #[test]
    fn test_range_pairs_subtitles() {
        let meta = eval("作品 第1~2話「前編」「後編」");
        assert_eq!(
            meta.episodes,
            vec![
                EvaluatedEpisode {
                    number: 1,
                    title: Some("前編".to_string()),
                },
                EvaluatedEpisode {
                    number: 2,
                    title: Some("後編".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_monotonic_filter() {
        let meta = eval("作品 第3話 第1話");
        assert_eq!(numbers(&meta), vec![3]);
    }

    #[test]
    fn test_reversed_range_collapses() {
        let meta = eval("作品 第5~2話");
        assert_eq!(numbers(&meta), vec![2]);
    }

    #[test]
    fn test_span_cap() {
        let meta = eval("作品 第1~100000話");
        assert_eq!(meta.episodes.len(), 500);
        assert_eq!(meta.episodes[499].number, 500);

        let config = ParserConfig::default().with_max_episode_span(2);
        let ast = ast::build(&tokenize("作品 第1~3話"), &config);
        assert_eq!(numbers(&evaluate(&ast, &config)), vec![1, 2]);
    }

    #[test]
    fn test_span_cap_at_numeric_limit() {
        let meta = eval("作品 第〇~四二九四九六七二九五話");
        assert_eq!(meta.episodes.len(), 500);
        assert_eq!(meta.episodes[0].number, 0);
        assert_eq!(meta.episodes[499].number, 499);
    }

    #[test]
    fn test_adjunct_is_not_a_candidate() {
        let meta = eval("作品名第3話 サブ");
        assert_eq!(meta.title.as_deref(), Some("サブ"));
        assert_eq!(numbers(&meta), vec![3]);
    }

    #[test]
    fn test_empty_leaves_are_skipped() {
        let meta = eval("「」作品");
        assert_eq!(meta.title.as_deref(), Some("作品"));
    }

    #[test]
    fn test_nothing_to_evaluate() {
        let meta = eval(" ・ ");
        assert_eq!(meta, EvaluatedMeta::default());
    }
}

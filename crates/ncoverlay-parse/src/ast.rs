//! Bracket-aware syntax tree over title tokens.
//!
//! Brackets become [`AstBlock`]s; every other token run is classified into
//! [`AstElement`] leaves (episode and season markers, hashtags, promos, dates,
//! and leftover text).

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ParserConfig;
use crate::extract;
use crate::keyword::{self, Bracket, BracketKind};
use crate::tokenizer::{Token, TokenKind};

/// Classification of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Literal text from an opaque or flattened block.
    Constant,
    Episode,
    Season,
    Hashtag,
    Unknown,
    Promo,
    Date,
    Separator,
    /// Wording bound to a neighbouring episode marker.
    Adjunct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstElement {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl AstElement {
    pub fn new(content: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            content: content.into(),
            kind,
            prefix: None,
            suffix: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstBlock {
    /// Opening bracket.
    pub prefix: char,
    /// Closing bracket, `None` when the input ended first.
    pub suffix: Option<char>,
    pub content: Vec<AstNode>,
}

impl AstBlock {
    pub fn kind(&self) -> BracketKind {
        keyword::opening_bracket(self.prefix).map_or(BracketKind::Other, |b| b.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum AstNode {
    Element(AstElement),
    Block(AstBlock),
}

impl AstNode {
    /// The leaf, if this node is one.
    pub fn element(&self) -> Option<&AstElement> {
        match self {
            AstNode::Element(e) => Some(e),
            AstNode::Block(_) => None,
        }
    }

    fn is_kind(&self, kind: ElementKind) -> bool {
        self.element().is_some_and(|e| e.kind == kind)
    }
}

impl fmt::Display for AstElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            f.write_str(prefix)?;
        }
        f.write_str(&self.content)?;
        if let Some(suffix) = &self.suffix {
            f.write_str(suffix)?;
        }
        Ok(())
    }
}

impl fmt::Display for AstBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix)?;
        for node in &self.content {
            write!(f, "{node}")?;
        }
        if let Some(suffix) = self.suffix {
            write!(f, "{suffix}")?;
        }
        Ok(())
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNode::Element(e) => e.fmt(f),
            AstNode::Block(b) => b.fmt(f),
        }
    }
}

// ── Lexical patterns ────────────────────────────────────────────

/// `2nd`, `3RD`: joins with a following `season`.
static RE_ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[0-9]{1,9}(?:st|nd|rd|th)").unwrap());

static RE_SEASON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)season").unwrap());

/// A number ending the token: joins after `season`.
static RE_TRAILING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{1,9}$").unwrap());

/// `12月`, `2024年3月`, `/25`, `/25日`.
static RE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[0-9]{1,4}年|/)?[0-9]{1,2}月|/[0-9]{1,2}日?").unwrap()
});

/// `23:59まで`, `3時間30分まで`.
static RE_DEADLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{1,4}(?::|時間?)[0-9]{1,2}分?まで").unwrap()
});

const WEEKDAYS: &str = "日月火水木金土";

// ── Builder ─────────────────────────────────────────────────────

/// Build the syntax tree for a token sequence.
pub fn build(tokens: &[Token], config: &ParserConfig) -> Vec<AstNode> {
    build_level(tokens, 0, config.depth_limit())
}

fn build_level(tokens: &[Token], depth: usize, max_depth: usize) -> Vec<AstNode> {
    let mut nodes = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        if let Some(bracket) = tokens[i].as_separator().and_then(keyword::opening_bracket) {
            let (inner, closed, next) = consume_block(tokens, i + 1, bracket);
            let content = if bracket.kind.opaque() {
                vec![constant(inner)]
            } else if depth >= max_depth {
                tracing::debug!(
                    depth,
                    bracket = %bracket.open,
                    "bracket nesting too deep, flattening block"
                );
                vec![constant(inner)]
            } else {
                build_level(inner, depth + 1, max_depth)
            };
            nodes.push(AstNode::Block(AstBlock {
                prefix: bracket.open,
                suffix: closed.then_some(bracket.close),
                content,
            }));
            i = next;
            continue;
        }

        let (text, mut next) = rejoin(tokens, i);
        let mut elements = classify(&text);

        // A date may carry a "(水)" style weekday right after it.
        if let Some(last) = elements.last_mut().filter(|e| e.kind == ElementKind::Date) {
            if let Some((weekday, after)) = weekday_group(tokens, next) {
                last.content.push_str(&weekday);
                next = after;
            }
        }

        nodes.extend(elements.into_iter().map(AstNode::Element));
        i = next;
    }

    retag_adjuncts(coalesce_unknowns(nodes))
}

fn constant(tokens: &[Token]) -> AstNode {
    let text: String = tokens.iter().map(|t| t.text.as_str()).collect();
    AstNode::Element(AstElement::new(text, ElementKind::Constant))
}

/// Collect tokens up to the bracket's closing token, counting nested openers
/// of the same bracket. Returns `(inner, closed, next_index)`.
fn consume_block(tokens: &[Token], start: usize, bracket: Bracket) -> (&[Token], bool, usize) {
    let mut nesting = 0usize;
    for (j, token) in tokens.iter().enumerate().skip(start) {
        let Some(c) = token.as_separator() else {
            continue;
        };
        if c == bracket.close {
            if nesting == 0 {
                return (&tokens[start..j], true, j + 1);
            }
            nesting -= 1;
        } else if c == bracket.open {
            nesting += 1;
        }
    }
    (&tokens[start.min(tokens.len())..], false, tokens.len())
}

/// Join `2nd` + ` ` + `season` and `season` + ` ` + `2` into one run.
///
/// Returns the run text and the index of the next unconsumed token.
fn rejoin(tokens: &[Token], i: usize) -> (String, usize) {
    let token = &tokens[i];
    let complement: &Regex = match token.kind {
        TokenKind::Word if RE_ORDINAL.is_match(&token.text) => &*RE_SEASON_WORD,
        TokenKind::Word if RE_SEASON_WORD.is_match(&token.text) => &*RE_TRAILING_NUMBER,
        _ => return (token.text.clone(), i + 1),
    };

    let mut n = i + 1;
    while tokens.get(n).is_some_and(Token::is_whitespace) {
        n += 1;
    }
    match tokens.get(n) {
        Some(next) if next.kind == TokenKind::Word && complement.is_match(&next.text) => {
            let text = tokens[i..=n].iter().map(|t| t.text.as_str()).collect();
            (text, n + 1)
        }
        _ => (token.text.clone(), i + 1),
    }
}

/// Split a run at strict episode/season matches and classify the rest.
fn classify(text: &str) -> Vec<AstElement> {
    let mut ranges: Vec<((usize, usize), ElementKind)> = extract::episodes(text, true)
        .into_iter()
        .map(|r| (r.range, ElementKind::Episode))
        .chain(
            extract::seasons(text)
                .into_iter()
                .map(|r| (r.range, ElementKind::Season)),
        )
        .collect();
    // Stable: an episode wins over a season on the same range.
    ranges.sort_by_key(|(range, _)| *range);
    let mut kept: Vec<((usize, usize), ElementKind)> = Vec::with_capacity(ranges.len());
    for ((start, end), kind) in ranges {
        if kept.last().is_some_and(|((_, last_end), _)| start <= *last_end) {
            continue;
        }
        kept.push(((start, end), kind));
    }

    split_by_ranges(text, &kept)
        .into_iter()
        .map(|e| match e.kind {
            ElementKind::Unknown => reclassify(e),
            _ => e,
        })
        .collect()
}

fn split_by_ranges(text: &str, ranges: &[((usize, usize), ElementKind)]) -> Vec<AstElement> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Vec::new();
    let mut last = 0;

    for &((start, end), kind) in ranges {
        if start > last {
            out.push(AstElement::new(
                chars[last..start].iter().collect::<String>(),
                ElementKind::Unknown,
            ));
        }
        out.push(AstElement::new(
            chars[start..=end].iter().collect::<String>(),
            kind,
        ));
        last = end + 1;
    }
    if last < chars.len() {
        out.push(AstElement::new(
            chars[last..].iter().collect::<String>(),
            ElementKind::Unknown,
        ));
    }

    out
}

/// Hashtag, then promo, then date, then deadline; otherwise left unknown.
fn reclassify(mut element: AstElement) -> AstElement {
    if let Some(tag) = element.content.strip_prefix('#') {
        element.content = tag.to_string();
        element.prefix = Some("#".to_string());
        element.kind = ElementKind::Hashtag;
    } else if keyword::is_promo(&element.content) {
        element.kind = ElementKind::Promo;
    } else if RE_DATE.is_match(&element.content) || RE_DEADLINE.is_match(&element.content) {
        element.kind = ElementKind::Date;
    }
    element
}

/// Match optional whitespace, `(`, a weekday, `)` starting at `start`.
fn weekday_group(tokens: &[Token], start: usize) -> Option<(String, usize)> {
    let mut n = start;
    while tokens.get(n).is_some_and(Token::is_whitespace) {
        n += 1;
    }
    let open = tokens.get(n)?.as_separator()?;
    let day = tokens.get(n + 1)?;
    let close = tokens.get(n + 2)?.as_separator()?;

    let is_day = day.kind == TokenKind::Word
        && day.text.chars().count() == 1
        && WEEKDAYS.contains(day.text.as_str());
    if !matches!((open, close), ('(', ')') | ('（', '）')) || !is_day {
        return None;
    }

    let text = tokens[start..n + 3].iter().map(|t| t.text.as_str()).collect();
    Some((text, n + 3))
}

/// Merge runs of adjacent unknown leaves, peeling separator-only leaves off
/// both ends of each run.
fn coalesce_unknowns(nodes: Vec<AstNode>) -> Vec<AstNode> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut run: Vec<AstElement> = Vec::new();

    for node in nodes {
        match node {
            AstNode::Element(e) if e.kind == ElementKind::Unknown => run.push(e),
            other => {
                flush_unknowns(&mut run, &mut out);
                out.push(other);
            }
        }
    }
    flush_unknowns(&mut run, &mut out);

    out
}

fn flush_unknowns(run: &mut Vec<AstElement>, out: &mut Vec<AstNode>) {
    if run.is_empty() {
        return;
    }
    let is_sep = |e: &AstElement| keyword::is_separator_text(&e.content);

    let lead = run.iter().take_while(|e| is_sep(*e)).count();
    let trail = if lead == run.len() {
        0
    } else {
        run.iter().rev().take_while(|e| is_sep(*e)).count()
    };
    let middle_end = run.len() - trail;

    for (idx, mut element) in run.drain(..).enumerate() {
        if idx < lead || idx >= middle_end {
            element.kind = ElementKind::Separator;
            out.push(AstNode::Element(element));
        } else if idx == lead {
            out.push(AstNode::Element(element));
        } else if let Some(AstNode::Element(merged)) = out.last_mut() {
            merged.content.push_str(&element.content);
        }
    }
}

/// Unknown leaves touching an episode marker become adjuncts.
fn retag_adjuncts(mut nodes: Vec<AstNode>) -> Vec<AstNode> {
    let near_episode: Vec<bool> = (0..nodes.len())
        .map(|i| {
            (i > 0 && nodes[i - 1].is_kind(ElementKind::Episode))
                || nodes
                    .get(i + 1)
                    .is_some_and(|n| n.is_kind(ElementKind::Episode))
        })
        .collect();

    for (node, near) in nodes.iter_mut().zip(near_episode) {
        if let AstNode::Element(e) = node {
            if near && e.kind == ElementKind::Unknown {
                e.kind = ElementKind::Adjunct;
            }
        }
    }
    nodes
}

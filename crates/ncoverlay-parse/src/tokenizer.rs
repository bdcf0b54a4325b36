use serde::Serialize;

use crate::keyword::is_separator;
use crate::numeral::is_numeral_char;

/// Token types produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// A single separator or bracket character.
    Separator,
    /// A maximal run of non-separator text.
    Word,
}

/// A single token from a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn separator(c: char) -> Self {
        Self {
            kind: TokenKind::Separator,
            text: c.to_string(),
        }
    }

    fn word(text: &str) -> Self {
        Self {
            kind: TokenKind::Word,
            text: text.trim().to_string(),
        }
    }

    /// The separator character, if this is a separator token.
    pub fn as_separator(&self) -> Option<char> {
        match self.kind {
            TokenKind::Separator => self.text.chars().next(),
            TokenKind::Word => None,
        }
    }

    /// Whether this is a single whitespace separator.
    pub fn is_whitespace(&self) -> bool {
        self.as_separator().is_some_and(char::is_whitespace)
    }
}

/// Split a title into separator tokens and word runs.
///
/// Every separator character becomes its own token. A `~` between numerals
/// (`第1~2話`, `一~三話`) stays inside the run so range declarations survive.
pub fn tokenize(input: &str) -> Vec<Token> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut run = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if is_separator(c) && !is_range_tilde(&chars, i) {
            if !run.is_empty() {
                tokens.push(Token::word(&run));
                run.clear();
            }
            tokens.push(Token::separator(c));
        } else {
            run.push(c);
        }
    }
    if !run.is_empty() {
        tokens.push(Token::word(&run));
    }

    tokens
}

fn is_range_tilde(chars: &[char], i: usize) -> bool {
    if chars[i] != '~' || i == 0 {
        return false;
    }
    let left = chars[i - 1];
    let Some(&right) = chars.get(i + 1) else {
        return false;
    };
    (is_numeral_char(left) || matches!(left, '話' | '目'))
        && (is_numeral_char(right) || matches!(right, '第' | '新'))
}

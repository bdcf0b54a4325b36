//! Conversion between Arabic numbers and kanji numerals.
//!
//! Handles the common forms (`一`, `二十`, `三百四`), positional digit strings
//! (`二〇二四`), and the formal daiji forms (`壱`, `弐`, `拾`, `萬`) that show
//! up in stylized episode labels.

use phf::phf_map;

use crate::error::NumeralError;

/// Common kanji numeral characters, as a regex character-class body.
pub const KANSUJI: &str = "〇一二三四五六七八九十百千万";

/// Formal (daiji) kanji numeral characters, as a regex character-class body.
pub const DAIJI: &str = "零壱弐参肆伍陸漆捌玖拾佰仟萬";

/// Largest value `number_to_kanji` can render (no 億 support).
pub const MAX_KANJI: u32 = 99_999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numeral {
    Digit(u32),
    Unit(u32),
    Myriad(u32),
}

static NUMERALS: phf::Map<char, Numeral> = phf_map! {
    // ── Common ───────────────────────────────────────────────────
    '〇' => Numeral::Digit(0),
    '一' => Numeral::Digit(1),
    '二' => Numeral::Digit(2),
    '三' => Numeral::Digit(3),
    '四' => Numeral::Digit(4),
    '五' => Numeral::Digit(5),
    '六' => Numeral::Digit(6),
    '七' => Numeral::Digit(7),
    '八' => Numeral::Digit(8),
    '九' => Numeral::Digit(9),
    '十' => Numeral::Unit(10),
    '百' => Numeral::Unit(100),
    '千' => Numeral::Unit(1000),
    '万' => Numeral::Myriad(10_000),

    // ── Daiji ────────────────────────────────────────────────────
    '零' => Numeral::Digit(0),
    '壱' => Numeral::Digit(1),
    '弐' => Numeral::Digit(2),
    '参' => Numeral::Digit(3),
    '肆' => Numeral::Digit(4),
    '伍' => Numeral::Digit(5),
    '陸' => Numeral::Digit(6),
    '漆' => Numeral::Digit(7),
    '捌' => Numeral::Digit(8),
    '玖' => Numeral::Digit(9),
    '拾' => Numeral::Unit(10),
    '佰' => Numeral::Unit(100),
    '仟' => Numeral::Unit(1000),
    '萬' => Numeral::Myriad(10_000),
};

const DIGIT_CHARS: [char; 10] = ['〇', '一', '二', '三', '四', '五', '六', '七', '八', '九'];

/// Whether `c` is an ASCII digit or any kanji/daiji numeral character.
pub fn is_numeral_char(c: char) -> bool {
    c.is_ascii_digit() || NUMERALS.contains_key(&c)
}

/// Parse a kanji numeral (common or daiji) into an integer.
///
/// ```
/// use ncoverlay_parse::numeral::kanji_to_number;
///
/// assert_eq!(kanji_to_number("二十四"), Ok(24));
/// assert_eq!(kanji_to_number("弐拾"), Ok(20));
/// assert_eq!(kanji_to_number("二〇二四"), Ok(2024));
/// ```
pub fn kanji_to_number(s: &str) -> Result<u32, NumeralError> {
    if s.is_empty() {
        return Err(NumeralError::Empty);
    }
    let overflow = || NumeralError::Overflow(s.to_string());

    let mut total: u32 = 0;
    let mut section: u32 = 0;
    let mut digits: Option<u32> = None;

    for c in s.chars() {
        match NUMERALS.get(&c).copied() {
            Some(Numeral::Digit(d)) => {
                // Consecutive digits without a unit read positionally (二〇二四).
                let next = match digits {
                    Some(prev) => prev.checked_mul(10).and_then(|v| v.checked_add(d)),
                    None => Some(d),
                };
                digits = Some(next.ok_or_else(overflow)?);
            }
            Some(Numeral::Unit(unit)) => {
                let n = digits.take().unwrap_or(1);
                section = n
                    .checked_mul(unit)
                    .and_then(|v| section.checked_add(v))
                    .ok_or_else(overflow)?;
            }
            Some(Numeral::Myriad(myriad)) => {
                let n = section
                    .checked_add(digits.take().unwrap_or(0))
                    .ok_or_else(overflow)?;
                let n = if n == 0 { 1 } else { n };
                total = n
                    .checked_mul(myriad)
                    .and_then(|v| total.checked_add(v))
                    .ok_or_else(overflow)?;
                section = 0;
            }
            None => return Err(NumeralError::InvalidCharacter(c)),
        }
    }

    total
        .checked_add(section)
        .and_then(|v| v.checked_add(digits.unwrap_or(0)))
        .ok_or_else(overflow)
}

/// Render an integer as a canonical common-kanji numeral.
///
/// Values above [`MAX_KANJI`] return [`NumeralError::OutOfRange`].
pub fn number_to_kanji(n: u32) -> Result<String, NumeralError> {
    if n > MAX_KANJI {
        return Err(NumeralError::OutOfRange(n.into()));
    }
    if n == 0 {
        return Ok(DIGIT_CHARS[0].to_string());
    }

    let mut out = String::new();
    let (myriads, rest) = (n / 10_000, n % 10_000);
    if myriads > 0 {
        push_section(&mut out, myriads);
        out.push('万');
    }
    push_section(&mut out, rest);
    Ok(out)
}

/// Render `n` (< 10000) with 千/百/十 units. A leading 一 is omitted before a unit.
fn push_section(out: &mut String, n: u32) {
    for (unit, ch) in [(1000, '千'), (100, '百'), (10, '十')] {
        let d = (n / unit % 10) as usize;
        if d == 0 {
            continue;
        }
        if d > 1 {
            out.push(DIGIT_CHARS[d]);
        }
        out.push(ch);
    }
    let d = (n % 10) as usize;
    if d > 0 {
        out.push(DIGIT_CHARS[d]);
    }
}

/// Parse an Arabic digit string into an integer.
pub fn arabic_to_number(s: &str) -> Result<u32, NumeralError> {
    if s.is_empty() {
        return Err(NumeralError::Empty);
    }
    if let Some(c) = s.chars().find(|c| !c.is_ascii_digit()) {
        return Err(NumeralError::InvalidCharacter(c));
    }
    s.parse().map_err(|_| NumeralError::Overflow(s.to_string()))
}

use thiserror::Error;

/// Failure converting between Arabic and kanji numerals.
///
/// The extractor treats every variant as recoverable: a match whose kanji
/// rendering cannot be produced keeps its number and drops only `kansuji`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumeralError {
    #[error("numeral is empty")]
    Empty,

    #[error("invalid numeral character: {0:?}")]
    InvalidCharacter(char),

    #[error("numeral overflows u32: {0:?}")]
    Overflow(String),

    #[error("{0} is outside the representable kanji range")]
    OutOfRange(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert_eq!(NumeralError::Empty.to_string(), "numeral is empty");
        assert!(NumeralError::InvalidCharacter('x').to_string().contains("'x'"));
        assert!(NumeralError::OutOfRange(100_000_000)
            .to_string()
            .contains("100000000"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NumeralError>();
    }
}

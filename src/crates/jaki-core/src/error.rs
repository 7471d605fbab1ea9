use thiserror::Error;

/// Broad class of a [`JakiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value outside the domain of an operation
    Domain,
    /// A symbol that an alphabet does not know
    Lookup,
    /// An index outside the enumerated space
    Index,
}

/// Errors raised by pattern, space and performance operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JakiError {
    #[error("Invalid note duration {0}: expected 1 or 2")]
    InvalidDuration(u32),

    #[error("Pattern length must be non-negative, got {0}")]
    NegativeLength(i64),

    #[error("Pattern count for length {0} does not fit in 128 bits")]
    CountOverflow(usize),

    #[error("Invalid alphabet {0:?}: expected exactly two distinct characters")]
    InvalidAlphabet(String),

    #[error("Invalid {name} {value}: expected 0..={max}")]
    OutOfRange {
        name: &'static str,
        value: i64,
        max: u8,
    },

    #[error("Invalid velocity configuration: {0}")]
    InvalidConfig(String),

    #[error("Slice step must be non-zero")]
    ZeroStep,

    #[error("Unknown symbol {symbol:?} at position {position}")]
    UnknownSymbol { symbol: char, position: usize },

    #[error("Index {index} out of range for {count} patterns")]
    IndexOutOfRange { index: u128, count: u128 },

    #[error("Pattern of duration {found} is not in the space of length {length}")]
    NotInSpace { found: usize, length: usize },
}

impl JakiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JakiError::InvalidDuration(_)
            | JakiError::NegativeLength(_)
            | JakiError::CountOverflow(_)
            | JakiError::InvalidAlphabet(_)
            | JakiError::OutOfRange { .. }
            | JakiError::InvalidConfig(_)
            | JakiError::ZeroStep => ErrorKind::Domain,
            JakiError::UnknownSymbol { .. } => ErrorKind::Lookup,
            JakiError::IndexOutOfRange { .. } | JakiError::NotInSpace { .. } => ErrorKind::Index,
        }
    }
}

pub type Result<T> = std::result::Result<T, JakiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(JakiError::InvalidDuration(3).kind(), ErrorKind::Domain);
        assert_eq!(JakiError::NegativeLength(-1).kind(), ErrorKind::Domain);
        assert_eq!(
            JakiError::UnknownSymbol { symbol: 'x', position: 2 }.kind(),
            ErrorKind::Lookup
        );
        assert_eq!(
            JakiError::IndexOutOfRange { index: 5, count: 3 }.kind(),
            ErrorKind::Index
        );
    }

    #[test]
    fn test_error_messages() {
        let err = JakiError::UnknownSymbol { symbol: 'x', position: 2 };
        assert_eq!(err.to_string(), "Unknown symbol 'x' at position 2");

        let err = JakiError::OutOfRange { name: "velocity", value: 200, max: 127 };
        assert_eq!(err.to_string(), "Invalid velocity 200: expected 0..=127");
    }
}

use crate::{JakiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Symbol for a short note in the default alphabet
pub const DEFAULT_SHORT: char = '·';
/// Symbol for a long note in the default alphabet
pub const DEFAULT_LONG: char = '–';

/// Duration class of a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteKind {
    /// One unit long
    Short,
    /// Two units long
    Long,
}

impl NoteKind {
    /// Look up the kind for a duration in units
    pub fn from_duration(duration: u32) -> Result<Self> {
        match duration {
            1 => Ok(NoteKind::Short),
            2 => Ok(NoteKind::Long),
            other => Err(JakiError::InvalidDuration(other)),
        }
    }

    /// Duration in units
    pub fn duration(self) -> u8 {
        match self {
            NoteKind::Short => 1,
            NoteKind::Long => 2,
        }
    }
}

/// A pair of distinct symbols used to write short and long notes
///
/// The first character denotes a short note, the second a long one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Alphabet {
    short: char,
    long: char,
}

impl Alphabet {
    /// Build an alphabet from a two-character string such as `"._"`
    pub fn new(symbols: &str) -> Result<Self> {
        let mut chars = symbols.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(short), Some(long), None) => Self::from_chars(short, long),
            _ => Err(JakiError::InvalidAlphabet(symbols.to_string())),
        }
    }

    /// Build an alphabet from its two symbols
    pub fn from_chars(short: char, long: char) -> Result<Self> {
        if short == long {
            return Err(JakiError::InvalidAlphabet(format!("{}{}", short, long)));
        }
        Ok(Alphabet { short, long })
    }

    pub fn short(&self) -> char {
        self.short
    }

    pub fn long(&self) -> char {
        self.long
    }

    /// Symbol for a note kind
    pub fn symbol(&self, kind: NoteKind) -> char {
        match kind {
            NoteKind::Short => self.short,
            NoteKind::Long => self.long,
        }
    }

    /// Note kind for a symbol, if the symbol belongs to this alphabet
    pub fn kind(&self, symbol: char) -> Option<NoteKind> {
        if symbol == self.short {
            Some(NoteKind::Short)
        } else if symbol == self.long {
            Some(NoteKind::Long)
        } else {
            None
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet {
            short: DEFAULT_SHORT,
            long: DEFAULT_LONG,
        }
    }
}

impl FromStr for Alphabet {
    type Err = JakiError;

    fn from_str(s: &str) -> Result<Self> {
        Alphabet::new(s)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.short, self.long)
    }
}

/// A single note of a pattern
///
/// The note remembers the alphabet it was created with so that it renders
/// back to the same symbol. Equality and hashing only look at the duration.
#[derive(Debug, Clone, Copy)]
pub struct NoteUnit {
    kind: NoteKind,
    alphabet: Alphabet,
}

impl NoteUnit {
    /// Create a note of the given kind
    pub fn new(kind: NoteKind, alphabet: Alphabet) -> Self {
        NoteUnit { kind, alphabet }
    }

    pub fn short(alphabet: Alphabet) -> Self {
        NoteUnit::new(NoteKind::Short, alphabet)
    }

    pub fn long(alphabet: Alphabet) -> Self {
        NoteUnit::new(NoteKind::Long, alphabet)
    }

    /// Create a note from a duration of 1 or 2 units
    ///
    /// # Examples
    /// ```
    /// use jaki_core::{Alphabet, NoteUnit};
    ///
    /// let note = NoteUnit::from_duration(2, Alphabet::default()).unwrap();
    /// assert!(note.is_long());
    /// assert!(NoteUnit::from_duration(3, Alphabet::default()).is_err());
    /// ```
    pub fn from_duration(duration: u32, alphabet: Alphabet) -> Result<Self> {
        Ok(NoteUnit::new(NoteKind::from_duration(duration)?, alphabet))
    }

    /// Create a note from one of the alphabet's symbols
    pub fn from_symbol(symbol: char, alphabet: Alphabet) -> Result<Self> {
        alphabet
            .kind(symbol)
            .map(|kind| NoteUnit::new(kind, alphabet))
            .ok_or(JakiError::UnknownSymbol { symbol, position: 0 })
    }

    /// The symbol of this note under its own alphabet
    pub fn render(&self) -> char {
        self.alphabet.symbol(self.kind)
    }

    pub fn kind(&self) -> NoteKind {
        self.kind
    }

    pub fn duration(&self) -> u8 {
        self.kind.duration()
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn is_short(&self) -> bool {
        self.kind == NoteKind::Short
    }

    pub fn is_long(&self) -> bool {
        self.kind == NoteKind::Long
    }

    /// Same note, written with another alphabet
    pub fn with_alphabet(&self, alphabet: Alphabet) -> Self {
        NoteUnit::new(self.kind, alphabet)
    }
}

impl PartialEq for NoteUnit {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for NoteUnit {}

impl Hash for NoteUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl fmt::Display for NoteUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

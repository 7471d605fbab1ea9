use crate::{Alphabet, JakiError, NoteKind, NoteUnit, Result};
use std::fmt;
use std::ops::Add;

/// An ordered sequence of short and long notes
///
/// Patterns are values: every transformation returns a new pattern. Two
/// patterns are equal when their duration sequences are equal, whatever
/// alphabet they are written in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pattern {
    units: Vec<NoteUnit>,
}

impl Pattern {
    /// Create a pattern from its notes
    pub fn new(units: Vec<NoteUnit>) -> Self {
        Pattern { units }
    }

    /// Create an empty pattern
    pub fn empty() -> Self {
        Pattern::default()
    }

    /// Build a pattern from note kinds, all written in one alphabet
    pub fn from_kinds<I>(kinds: I, alphabet: Alphabet) -> Self
    where
        I: IntoIterator<Item = NoteKind>,
    {
        kinds
            .into_iter()
            .map(|kind| NoteUnit::new(kind, alphabet))
            .collect()
    }

    /// Build a pattern from durations of 1 and 2
    pub fn from_durations<I>(durations: I, alphabet: Alphabet) -> Result<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        durations
            .into_iter()
            .map(|duration| NoteUnit::from_duration(duration, alphabet))
            .collect()
    }

    /// Parse a symbol string, one note per character
    ///
    /// Fails on the first character that is not in the alphabet, reporting
    /// its character position.
    ///
    /// # Examples
    /// ```
    /// use jaki_core::{Alphabet, Pattern};
    ///
    /// let alphabet = Alphabet::new("._").unwrap();
    /// let pattern = Pattern::parse("_.._", alphabet).unwrap();
    /// assert_eq!(pattern.durations(), vec![2, 1, 1, 2]);
    /// assert!(Pattern::parse("_x", alphabet).is_err());
    /// ```
    pub fn parse(input: &str, alphabet: Alphabet) -> Result<Self> {
        input
            .chars()
            .enumerate()
            .map(|(position, symbol)| {
                NoteUnit::from_symbol(symbol, alphabet)
                    .map_err(|_| JakiError::UnknownSymbol { symbol, position })
            })
            .collect()
    }

    /// Join the notes' own symbols with `separator`
    pub fn render(&self, separator: &str) -> String {
        self.join_symbols(separator, |unit| unit.render())
    }

    /// Join the notes' symbols under `alphabet` with `separator`
    pub fn render_with(&self, alphabet: Alphabet, separator: &str) -> String {
        self.join_symbols(separator, |unit| alphabet.symbol(unit.kind()))
    }

    fn join_symbols<F>(&self, separator: &str, symbol: F) -> String
    where
        F: Fn(&NoteUnit) -> char,
    {
        let mut out = String::new();
        for (i, unit) in self.units.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.push(symbol(unit));
        }
        out
    }

    /// Return a new pattern with `other` appended
    pub fn concat(&self, other: &Pattern) -> Pattern {
        self.units.iter().chain(other.units.iter()).copied().collect()
    }

    /// Return a new pattern with a single note appended
    pub fn concat_unit(&self, unit: NoteUnit) -> Pattern {
        self.units.iter().copied().chain(std::iter::once(unit)).collect()
    }

    /// Same pattern, written with another alphabet
    pub fn with_alphabet(&self, alphabet: Alphabet) -> Pattern {
        self.units.iter().map(|unit| unit.with_alphabet(alphabet)).collect()
    }

    pub fn units(&self) -> &[NoteUnit] {
        &self.units
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoteUnit> {
        self.units.iter()
    }

    /// Number of notes
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn durations(&self) -> Vec<u8> {
        self.units.iter().map(NoteUnit::duration).collect()
    }

    /// Sum of all note durations
    pub fn total_duration(&self) -> usize {
        self.units.iter().map(|unit| unit.duration() as usize).sum()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(""))
    }
}

impl FromIterator<NoteUnit> for Pattern {
    fn from_iter<I: IntoIterator<Item = NoteUnit>>(iter: I) -> Self {
        Pattern {
            units: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Pattern {
    type Item = &'a NoteUnit;
    type IntoIter = std::slice::Iter<'a, NoteUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

impl Add for Pattern {
    type Output = Pattern;

    fn add(self, other: Pattern) -> Pattern {
        self.concat(&other)
    }
}

impl Add<NoteUnit> for Pattern {
    type Output = Pattern;

    fn add(self, unit: NoteUnit) -> Pattern {
        self.concat_unit(unit)
    }
}

/// A collection of patterns, displayed with a separator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patterns {
    patterns: Vec<Pattern>,
    separator: String,
}

impl Patterns {
    pub const DEFAULT_SEPARATOR: &'static str = ", ";

    pub fn new(patterns: Vec<Pattern>) -> Self {
        Patterns {
            patterns,
            separator: Self::DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Use a different separator when displaying
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Concatenate every pattern, in order, into a single pattern
    pub fn join(&self) -> Pattern {
        self.patterns.iter().flat_map(|p| p.iter().copied()).collect()
    }

    /// Append another collection, keeping this collection's separator
    pub fn chain(mut self, other: Patterns) -> Self {
        self.patterns.extend(other.patterns);
        self
    }

    pub fn as_slice(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn into_vec(self) -> Vec<Pattern> {
        self.patterns
    }
}

impl FromIterator<Pattern> for Patterns {
    fn from_iter<I: IntoIterator<Item = Pattern>>(iter: I) -> Self {
        Patterns::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Patterns {
    type Item = Pattern;
    type IntoIter = std::vec::IntoIter<Pattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.into_iter()
    }
}

impl fmt::Display for Patterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pattern) in self.patterns.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", self.separator)?;
            }
            write!(f, "{}", pattern)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn dots() -> Alphabet {
        Alphabet::new("._").unwrap()
    }

    #[test]
    fn test_parse_and_render() {
        let pattern = Pattern::parse("·–·", Alphabet::default()).unwrap();
        assert_eq!(pattern.len(), 3);
        assert_eq!(pattern.durations(), vec![1, 2, 1]);
        assert_eq!(pattern.total_duration(), 4);
        assert_eq!(pattern.to_string(), "·–·");
        assert_eq!(pattern.render(" "), "· – ·");
    }

    #[test]
    fn test_parse_reports_position() {
        let err = Pattern::parse("._.x_", dots()).unwrap_err();
        assert_eq!(err, JakiError::UnknownSymbol { symbol: 'x', position: 3 });
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_parse_counts_characters_not_bytes() {
        // Default symbols are multi-byte in UTF-8
        let err = Pattern::parse("·–x", Alphabet::default()).unwrap_err();
        assert_eq!(err, JakiError::UnknownSymbol { symbol: 'x', position: 2 });
    }

    #[test]
    fn test_parse_agrees_with_from_symbol() {
        let pattern = Pattern::parse("_.", dots()).unwrap();
        let units = vec![
            NoteUnit::from_symbol('_', dots()).unwrap(),
            NoteUnit::from_symbol('.', dots()).unwrap(),
        ];
        assert_eq!(pattern.units(), units.as_slice());
        assert!(pattern.iter().all(|u| u.alphabet() == dots()));

        // A lone symbol fails at position 0 either way
        assert_eq!(
            Pattern::parse("?", dots()).unwrap_err(),
            NoteUnit::from_symbol('?', dots()).unwrap_err()
        );
        assert_eq!(
            Pattern::parse(".?", dots()).unwrap_err(),
            JakiError::UnknownSymbol { symbol: '?', position: 1 }
        );
    }

    #[test]
    fn test_parse_empty() {
        let pattern = Pattern::parse("", Alphabet::default()).unwrap();
        assert!(pattern.is_empty());
        assert_eq!(pattern.to_string(), "");
    }

    #[test]
    fn test_render_with_override() {
        let pattern = Pattern::parse("_..", dots()).unwrap();
        assert_eq!(pattern.to_string(), "_..");
        assert_eq!(pattern.render_with(Alphabet::default(), ""), "–··");
        assert_eq!(pattern.with_alphabet(Alphabet::default()).to_string(), "–··");
    }

    #[test]
    fn test_equality_across_alphabets() {
        let a = Pattern::parse("_.", dots()).unwrap();
        let b = Pattern::parse("–·", Alphabet::default()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Pattern::parse("._", dots()).unwrap());
    }

    #[test]
    fn test_concat() {
        let alphabet = Alphabet::default();
        let a = Pattern::parse("·–", alphabet).unwrap();
        let b = Pattern::parse("–", alphabet).unwrap();

        assert_eq!(a.concat(&b).to_string(), "·––");
        assert_eq!((a.clone() + b).to_string(), "·––");
        assert_eq!((a.clone() + NoteUnit::short(alphabet)).to_string(), "·–·");
        // `a` is untouched
        assert_eq!(a.to_string(), "·–");
    }

    #[test]
    fn test_from_durations() {
        let pattern = Pattern::from_durations([2, 1, 2], Alphabet::default()).unwrap();
        assert_eq!(pattern.to_string(), "–·–");
        assert!(Pattern::from_durations([1, 3], Alphabet::default()).is_err());
    }

    #[test]
    fn test_patterns_display_and_join() {
        let alphabet = Alphabet::default();
        let patterns: Patterns = ["··", "–"]
            .iter()
            .map(|s| Pattern::parse(s, alphabet).unwrap())
            .collect();

        assert_eq!(patterns.to_string(), "··, –");
        assert_eq!(patterns.clone().with_separator(" | ").to_string(), "·· | –");
        assert_eq!(patterns.join().to_string(), "··–");
        assert_eq!(Patterns::new(Vec::new()).join(), Pattern::empty());
    }

    #[test]
    fn test_patterns_chain() {
        let alphabet = Alphabet::default();
        let first: Patterns = vec![Pattern::parse("·", alphabet).unwrap()].into_iter().collect();
        let second: Patterns = vec![Pattern::parse("–", alphabet).unwrap()].into_iter().collect();

        let chained = first.chain(second);
        assert_eq!(chained.len(), 2);
        assert_eq!(chained.to_string(), "·, –");
    }
}

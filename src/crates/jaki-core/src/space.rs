//! Lazy enumeration of every pattern of a given length
//!
//! Patterns are ordered by their number of long notes, fewest first. Within
//! a group of `d` long notes among `s + d` notes, the positions of the long
//! notes run through every `d`-combination of `0..s + d` in ascending
//! lexicographic order. For length 3 this gives `···`, `·–`, `–·`.
//!
//! Every pattern has a rank (its index in that order) and every rank can be
//! turned back into its pattern without walking the groups before it, so
//! indexing, slicing and random sampling never materialize the space.
//!
//! Ranks are `u128`. Spaces of any length can be iterated and indexed; only
//! the operations that need the total count ([`PatternSpace::count`],
//! [`PatternSpace::rank`], [`PatternSpace::choose`]) fail once it no longer
//! fits, past [`MAX_LENGTH`](crate::MAX_LENGTH).

use crate::counting::{binomial, pattern_count};
use crate::{Alphabet, JakiError, NoteKind, Pattern, Patterns, Result};
use rand::Rng;
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// Whether `rank` falls inside a block of `size` patterns
///
/// A size of `None` did not fit in a `u128`, so it holds every rank.
fn within(rank: u128, size: Option<u128>) -> bool {
    size.map_or(true, |size| rank < size)
}

/// Advance `positions` to the next combination of `0..slots` in
/// lexicographic order, returning `false` when it was the last one
fn next_combination(positions: &mut [usize], slots: usize) -> bool {
    let k = positions.len();
    for i in (0..k).rev() {
        if positions[i] < slots - k + i {
            positions[i] += 1;
            for j in i + 1..k {
                positions[j] = positions[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

/// Positions of the long notes for the pattern at `rank`, or `None` if the
/// space has no such rank
fn unrank(length: usize, mut rank: u128) -> Option<(usize, Vec<usize>)> {
    for longs in 0..=length / 2 {
        let slots = length - longs;
        let size = binomial(slots, longs);
        if within(rank, size) {
            return Some((longs, unrank_combination(slots, longs, rank)));
        }
        rank -= size?;
    }
    None
}

fn unrank_combination(slots: usize, longs: usize, mut rank: u128) -> Vec<usize> {
    let mut positions = Vec::with_capacity(longs);
    let mut candidate = 0;
    while positions.len() < longs {
        let remaining = longs - positions.len();
        // Combinations whose next long note sits at `candidate`
        match binomial(slots - candidate - 1, remaining - 1) {
            Some(starting_here) if rank >= starting_here => rank -= starting_here,
            _ => positions.push(candidate),
        }
        candidate += 1;
    }
    positions
}

fn rank_combination(slots: usize, positions: &[usize]) -> Option<u128> {
    let longs = positions.len();
    let mut rank: u128 = 0;
    let mut candidate = 0;
    for (chosen, &position) in positions.iter().enumerate() {
        let remaining = longs - chosen;
        while candidate < position {
            rank = rank.checked_add(binomial(slots - candidate - 1, remaining - 1)?)?;
            candidate += 1;
        }
        candidate = position + 1;
    }
    Some(rank)
}

/// Iterator over the patterns of one length, in enumeration order
///
/// Holds the long-note positions of the next pattern to yield and can jump
/// to any rank in O(length).
#[derive(Debug, Clone)]
pub struct Compositions {
    length: usize,
    alphabet: Alphabet,
    count: Option<u128>,
    longs: usize,
    positions: Option<Vec<usize>>,
    rank: u128,
}

impl Compositions {
    fn new(length: usize, alphabet: Alphabet, count: Option<u128>) -> Self {
        Compositions {
            length,
            alphabet,
            count,
            longs: 0,
            positions: Some(Vec::new()),
            rank: 0,
        }
    }

    /// Rank of the next pattern this iterator yields
    pub fn rank(&self) -> u128 {
        self.rank
    }

    /// Patterns left to yield, if that number fits in a `u128`
    pub fn remaining(&self) -> Option<u128> {
        self.count.map(|count| count - self.rank)
    }

    /// Move so that the next pattern yielded is the one at `rank`
    ///
    /// Seeking at or past the end exhausts the iterator.
    pub fn seek(&mut self, rank: u128) {
        trace!(length = self.length, rank, "seek");
        match unrank(self.length, rank) {
            Some((longs, positions)) => {
                self.longs = longs;
                self.positions = Some(positions);
                self.rank = rank;
            }
            None => {
                self.longs = self.length / 2 + 1;
                self.positions = None;
                self.rank = self.count.unwrap_or(rank);
            }
        }
    }

    fn build(&self, positions: &[usize]) -> Pattern {
        let mut kinds = vec![NoteKind::Short; self.length - self.longs];
        for &position in positions {
            kinds[position] = NoteKind::Long;
        }
        Pattern::from_kinds(kinds, self.alphabet)
    }

    fn advance(&mut self) {
        let Some(positions) = self.positions.as_mut() else {
            return;
        };
        self.rank = self.rank.saturating_add(1);
        if next_combination(positions, self.length - self.longs) {
            return;
        }

        self.longs += 1;
        self.positions = if 2 * self.longs <= self.length {
            Some((0..self.longs).collect())
        } else {
            None
        };
    }
}

impl Iterator for Compositions {
    type Item = Pattern;

    fn next(&mut self) -> Option<Pattern> {
        let pattern = self.build(self.positions.as_deref()?);
        self.advance();
        Some(pattern)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.positions.is_none() {
            return (0, Some(0));
        }
        let remaining = self.remaining();
        let exact = remaining.and_then(|remaining| usize::try_from(remaining).ok());
        (exact.unwrap_or(usize::MAX), exact)
    }

    fn nth(&mut self, n: usize) -> Option<Pattern> {
        if self.positions.is_some() {
            self.seek(self.rank.saturating_add(n as u128));
        }
        self.next()
    }
}

impl FusedIterator for Compositions {}

/// A lazy sub-enumeration of a [`PatternSpace`], see [`PatternSpace::slice`]
#[derive(Debug, Clone)]
pub struct Slice {
    cursor: Compositions,
    remaining: u128,
    step: u128,
}

impl Iterator for Slice {
    type Item = Pattern;

    fn next(&mut self) -> Option<Pattern> {
        if self.remaining == 0 {
            return None;
        }
        let pattern = self.cursor.next()?;
        self.remaining -= 1;
        if self.remaining > 0 && self.step > 1 {
            let target = self.cursor.rank().saturating_add(self.step - 1);
            self.cursor.seek(target);
        }
        Some(pattern)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.cursor.size_hint();
        let bound = usize::try_from(self.remaining).ok();
        let upper = match (upper, bound) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        (0, upper)
    }
}

impl FusedIterator for Slice {}

/// Every pattern whose durations sum to a target length
///
/// The contents are a pure function of the length. The space also keeps a
/// [cursor](Self::cursor) that resumes where it left off until it is
/// [restarted](Self::restart);
/// [`get`](Self::get), [`slice`](Self::slice), [`head`](Self::head) and
/// [`choose`](Self::choose) never move that cursor.
///
/// # Examples
/// ```
/// use jaki_core::PatternSpace;
///
/// let mut space = PatternSpace::new(4).unwrap();
/// assert_eq!(space.count().unwrap(), 5);
/// assert_eq!(space.get(2).unwrap().to_string(), "·–·");
///
/// let first = space.cursor().next().unwrap();
/// assert_eq!(space.position(), 1);
/// space.restart();
/// assert_eq!(space.cursor().next(), Some(first));
/// ```
#[derive(Debug, Clone)]
pub struct PatternSpace {
    length: usize,
    alphabet: Alphabet,
    count: Option<u128>,
    cursor: Compositions,
}

impl PatternSpace {
    /// Create the space of patterns of `length` units, in the default alphabet
    ///
    /// Negative lengths are rejected.
    pub fn new(length: i64) -> Result<Self> {
        let length = usize::try_from(length).map_err(|_| JakiError::NegativeLength(length))?;
        Ok(Self::of_length(length))
    }

    /// Create the space for a non-negative length
    pub fn of_length(length: usize) -> Self {
        let count = pattern_count(length);
        let alphabet = Alphabet::default();
        debug!(length, count = ?count, "created pattern space");

        PatternSpace {
            length,
            alphabet,
            count,
            cursor: Compositions::new(length, alphabet, count),
        }
    }

    /// Write the enumerated patterns with another alphabet
    ///
    /// Resets the cursor.
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self.restart();
        self
    }

    /// Target length every pattern sums to
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Number of patterns, `F(length + 1)`
    ///
    /// Fails for lengths above [`MAX_LENGTH`](crate::MAX_LENGTH), whose count does not fit in
    /// a `u128`.
    pub fn count(&self) -> Result<u128> {
        self.count.ok_or(JakiError::CountOverflow(self.length))
    }

    /// A fresh iterator over the whole space, independent of the cursor
    pub fn iter(&self) -> Compositions {
        Compositions::new(self.length, self.alphabet, self.count)
    }

    fn out_of_range(&self, index: u128) -> JakiError {
        JakiError::IndexOutOfRange {
            index,
            count: self.count.unwrap_or(u128::MAX),
        }
    }

    /// Pattern at `index` in enumeration order
    pub fn get(&self, index: u128) -> Result<Pattern> {
        if !within(index, self.count) {
            return Err(self.out_of_range(index));
        }
        let mut cursor = self.iter();
        cursor.seek(index);
        cursor.next().ok_or_else(|| self.out_of_range(index))
    }

    /// Index of `pattern` in enumeration order
    ///
    /// Fails if the pattern does not sum to this space's length, or if its
    /// index does not fit in a `u128`.
    pub fn rank(&self, pattern: &Pattern) -> Result<u128> {
        let found = pattern.total_duration();
        if found != self.length {
            return Err(JakiError::NotInSpace {
                found,
                length: self.length,
            });
        }

        let positions: Vec<usize> = pattern
            .iter()
            .enumerate()
            .filter(|(_, unit)| unit.is_long())
            .map(|(position, _)| position)
            .collect();
        let longs = positions.len();

        let before = (0..longs).try_fold(0u128, |total, fewer| {
            total.checked_add(binomial(self.length - fewer, fewer)?)
        });
        before
            .zip(rank_combination(self.length - longs, &positions))
            .and_then(|(before, within_group)| before.checked_add(within_group))
            .ok_or(JakiError::CountOverflow(self.length))
    }

    /// Patterns from `start` up to `stop` (exclusive), every `step`th one
    ///
    /// `stop` is clamped to the end of the space; `None` means the end. A
    /// `start` past the end is an error, as is a zero `step`.
    pub fn slice(&self, start: u128, stop: Option<u128>, step: u128) -> Result<Slice> {
        if step == 0 {
            return Err(JakiError::ZeroStep);
        }
        if let Some(count) = self.count.filter(|&count| start > count) {
            return Err(JakiError::IndexOutOfRange { index: start, count });
        }

        let end = match (stop, self.count) {
            (Some(stop), Some(count)) => stop.min(count),
            (Some(stop), None) => stop,
            (None, count) => count.unwrap_or(u128::MAX),
        };
        let remaining = if end > start {
            (end - start - 1) / step + 1
        } else {
            0
        };

        let mut cursor = self.iter();
        cursor.seek(start);
        Ok(Slice {
            cursor,
            remaining,
            step,
        })
    }

    /// The first `n` patterns, or all of them if there are fewer
    pub fn head(&self, n: u128) -> Slice {
        Slice {
            cursor: self.iter(),
            remaining: self.count.map_or(n, |count| n.min(count)),
            step: 1,
        }
    }

    /// Draw `k` patterns uniformly at random, with replacement
    pub fn choose(&self, k: usize) -> Result<Patterns> {
        self.choose_with_rng(k, &mut rand::thread_rng())
    }

    /// Draw `k` patterns uniformly at random using the given generator
    ///
    /// Each draw picks a rank below the count and builds its pattern
    /// directly, so sampling costs O(length) per pattern rather than the
    /// size of the space. Needs the count, so fails past [`MAX_LENGTH`](crate::MAX_LENGTH).
    pub fn choose_with_rng<R: Rng>(&self, k: usize, rng: &mut R) -> Result<Patterns> {
        let count = self.count()?;
        debug!(length = self.length, k, "sampling patterns");

        let mut cursor = self.iter();
        (0..k)
            .map(|_| {
                let rank = rng.gen_range(0..count);
                cursor.seek(rank);
                // Every rank below the count names a pattern
                cursor.next().ok_or(JakiError::IndexOutOfRange { index: rank, count })
            })
            .collect()
    }

    /// The space's own iteration state, resumed across calls
    pub fn cursor(&mut self) -> &mut Compositions {
        &mut self.cursor
    }

    /// Move the cursor back to the first pattern
    pub fn restart(&mut self) {
        self.cursor = self.iter();
    }

    /// Rank of the next pattern the cursor yields
    pub fn position(&self) -> u128 {
        self.cursor.rank()
    }
}

impl<'a> IntoIterator for &'a PatternSpace {
    type Item = Pattern;
    type IntoIter = Compositions;

    fn into_iter(self) -> Compositions {
        self.iter()
    }
}

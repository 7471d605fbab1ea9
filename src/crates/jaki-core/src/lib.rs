//! Core types for short/long rhythm patterns
//!
//! This crate enumerates every rhythm built from short (1 unit) and long
//! (2 unit) notes that fills a given length, and turns a chosen rhythm into
//! performance events for an external synthesizer.
//!
//! # Examples
//!
//! ```
//! use jaki_core::{Alphabet, Pattern, PatternSpace, PerformanceMapper};
//!
//! let space = PatternSpace::new(3).unwrap();
//! let rendered: Vec<String> = space.iter().map(|p| p.to_string()).collect();
//! assert_eq!(rendered, vec!["···", "·–", "–·"]);
//!
//! let pattern = Pattern::parse("·–·", Alphabet::default()).unwrap();
//! let velocities: Vec<u8> = PerformanceMapper::default()
//!     .map(&pattern)
//!     .iter()
//!     .map(|event| event.velocity())
//!     .collect();
//! assert_eq!(velocities, vec![100, 100, 50, 127]);
//! ```
//!
//! # Main Components
//!
//! - **NoteUnit**: a single short or long note with its symbol
//! - **Pattern**: an ordered sequence of notes
//! - **PatternSpace**: lazy, indexable enumeration of every pattern of a length
//! - **PerformanceMapper**: converts a pattern into accented events

pub mod counting;
pub mod error;
pub mod note;
pub mod pattern;
pub mod performance;
pub mod space;

pub use counting::{binomial, fibonacci, pattern_count, MAX_LENGTH};
pub use error::{ErrorKind, JakiError, Result};
pub use note::{Alphabet, NoteKind, NoteUnit};
pub use pattern::{Pattern, Patterns};
pub use performance::{EventSink, Events, PerformanceEvent, PerformanceMapper, SynthVelocities};
pub use space::{Compositions, PatternSpace, Slice};

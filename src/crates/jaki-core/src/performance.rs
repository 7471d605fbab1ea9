//! Turning patterns into performance events
//!
//! A short note plays once, a long note plays twice (normal, then soft).
//! A short note right after a long one is accented. Nothing here waits on
//! real time: events are handed to an [`EventSink`], which owns the output
//! device and any scheduling.

use crate::{JakiError, NoteUnit, Pattern, Result};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tracing::debug;

/// Highest MIDI data value (pitch, velocity)
pub const MAX_DATA: u8 = 127;
/// Highest MIDI channel number
pub const MAX_CHANNEL: u8 = 15;

const NOTE_ON: u8 = 0x90;
const NOTE_OFF: u8 = 0x80;

fn check_range(name: &'static str, value: u8, max: u8) -> Result<u8> {
    if value > max {
        return Err(JakiError::OutOfRange {
            name,
            value: value as i64,
            max,
        });
    }
    Ok(value)
}

/// Velocities used by the performance rule, on the MIDI 0-127 scale
///
/// No ordering between the three is enforced, though sensible settings
/// have `soft < normal <= accent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthVelocities {
    /// Short note right after a long note
    pub accent: u8,
    /// Any other short note, and the first half of a long note
    pub normal: u8,
    /// Second half of a long note
    pub soft: u8,
}

impl Default for SynthVelocities {
    fn default() -> Self {
        SynthVelocities {
            accent: 127,
            normal: 100,
            soft: 50,
        }
    }
}

impl SynthVelocities {
    /// Create a velocity set, checking every value is at most 127
    pub fn new(accent: u8, normal: u8, soft: u8) -> Result<Self> {
        SynthVelocities {
            accent,
            normal,
            soft,
        }
        .validated()
    }

    /// Read a velocity set from JSON; missing fields take their defaults
    ///
    /// # Examples
    /// ```
    /// use jaki_core::SynthVelocities;
    ///
    /// let velocities = SynthVelocities::from_json(r#"{"accent": 110}"#).unwrap();
    /// assert_eq!(velocities, SynthVelocities { accent: 110, normal: 100, soft: 50 });
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let velocities: SynthVelocities =
            serde_json::from_str(json).map_err(|e| JakiError::InvalidConfig(e.to_string()))?;
        velocities.validated()
    }

    pub fn validated(self) -> Result<Self> {
        check_range("accent velocity", self.accent, MAX_DATA)?;
        check_range("normal velocity", self.normal, MAX_DATA)?;
        check_range("soft velocity", self.soft, MAX_DATA)?;
        Ok(self)
    }
}

/// One trigger for the playback collaborator
///
/// Every event holds a channel in 0-15 and pitch and velocity in 0-127,
/// so its MIDI messages are always note-on/note-off on that channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PerformanceEvent {
    channel: u8,
    pitch: u8,
    velocity: u8,
}

impl PerformanceEvent {
    /// Create an event, checking channel (0-15), pitch and velocity (0-127)
    pub fn new(channel: u8, pitch: u8, velocity: u8) -> Result<Self> {
        Ok(PerformanceEvent {
            channel: check_range("channel", channel, MAX_CHANNEL)?,
            pitch: check_range("pitch", pitch, MAX_DATA)?,
            velocity: check_range("velocity", velocity, MAX_DATA)?,
        })
    }

    /// Channel or voice the event is addressed to
    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    /// Raw MIDI note-on message
    pub fn note_on(&self) -> [u8; 3] {
        [NOTE_ON | (self.channel & MAX_CHANNEL), self.pitch, self.velocity]
    }

    /// Raw MIDI note-off message, carrying the same velocity
    pub fn note_off(&self) -> [u8; 3] {
        [NOTE_OFF | (self.channel & MAX_CHANNEL), self.pitch, self.velocity]
    }
}

/// Receiver of performance events
///
/// Implemented by whatever actually produces sound; it may block on real
/// time for each event.
pub trait EventSink {
    type Error;

    fn send(&mut self, event: PerformanceEvent) -> std::result::Result<(), Self::Error>;
}

impl EventSink for Vec<PerformanceEvent> {
    type Error = Infallible;

    fn send(&mut self, event: PerformanceEvent) -> std::result::Result<(), Infallible> {
        self.push(event);
        Ok(())
    }
}

/// Maps patterns to performance events with a fixed accent rule
///
/// The mapping is a pure function of the pattern and this mapper's
/// settings: the only state, whether the previous note was long, is reset
/// for every pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceMapper {
    pitch: u8,
    channel: u8,
    velocities: SynthVelocities,
}

impl Default for PerformanceMapper {
    fn default() -> Self {
        PerformanceMapper {
            pitch: 60,
            channel: 0,
            velocities: SynthVelocities::default(),
        }
    }
}

impl PerformanceMapper {
    /// Create a mapper, checking pitch (0-127), channel (0-15) and velocities
    pub fn new(pitch: u8, channel: u8, velocities: SynthVelocities) -> Result<Self> {
        Ok(PerformanceMapper {
            pitch: check_range("pitch", pitch, MAX_DATA)?,
            channel: check_range("channel", channel, MAX_CHANNEL)?,
            velocities: velocities.validated()?,
        })
    }

    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn velocities(&self) -> SynthVelocities {
        self.velocities
    }

    /// Lazily produce the events for `pattern`
    pub fn events<'a>(&'a self, pattern: &'a Pattern) -> Events<'a> {
        Events {
            mapper: self,
            units: pattern.iter(),
            pending: None,
            follows_long: false,
        }
    }

    /// All events for `pattern`, in order
    ///
    /// # Examples
    /// ```
    /// use jaki_core::{Alphabet, Pattern, PerformanceMapper};
    ///
    /// let pattern = Pattern::parse("–·", Alphabet::default()).unwrap();
    /// let events = PerformanceMapper::default().map(&pattern);
    /// let velocities: Vec<u8> = events.iter().map(|e| e.velocity()).collect();
    /// assert_eq!(velocities, vec![100, 50, 127]);
    /// ```
    pub fn map(&self, pattern: &Pattern) -> Vec<PerformanceEvent> {
        self.events(pattern).collect()
    }

    /// Hand every event for `pattern` to `sink`, stopping at the first error
    pub fn perform<S: EventSink>(
        &self,
        pattern: &Pattern,
        sink: &mut S,
    ) -> std::result::Result<usize, S::Error> {
        debug!(
            notes = pattern.len(),
            pitch = self.pitch,
            channel = self.channel,
            "performing pattern"
        );
        let mut sent = 0;
        for event in self.events(pattern) {
            sink.send(event)?;
            sent += 1;
        }
        Ok(sent)
    }

    // Pitch, channel and velocities were all checked in `new`
    fn event(&self, velocity: u8) -> PerformanceEvent {
        PerformanceEvent {
            channel: self.channel,
            pitch: self.pitch,
            velocity,
        }
    }
}

/// Iterator returned by [`PerformanceMapper::events`]
#[derive(Debug, Clone)]
pub struct Events<'a> {
    mapper: &'a PerformanceMapper,
    units: std::slice::Iter<'a, NoteUnit>,
    pending: Option<u8>,
    follows_long: bool,
}

impl Iterator for Events<'_> {
    type Item = PerformanceEvent;

    fn next(&mut self) -> Option<PerformanceEvent> {
        if let Some(velocity) = self.pending.take() {
            return Some(self.mapper.event(velocity));
        }

        let unit = self.units.next()?;
        let velocities = &self.mapper.velocities;
        let velocity = if unit.is_long() {
            self.pending = Some(velocities.soft);
            velocities.normal
        } else if self.follows_long {
            velocities.accent
        } else {
            velocities.normal
        };
        self.follows_long = unit.is_long();
        Some(self.mapper.event(velocity))
    }
}

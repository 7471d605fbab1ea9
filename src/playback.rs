//! Event sinks that stand in for a sound device
//!
//! Playback proper (opening a port, timing note-on/note-off pairs) is left
//! to whatever consumes the printed events.

use clap::ValueEnum;
use jaki_core::{EventSink, PerformanceEvent};
use std::io::{self, Write};

/// How events are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One readable line per event
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// Note-on and note-off messages as hex bytes
    Midi,
}

/// Writes each event to a writer as soon as it is received
pub struct EventPrinter<W: Write> {
    writer: W,
    format: OutputFormat,
    index: usize,
}

impl<W: Write> EventPrinter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        EventPrinter {
            writer,
            format,
            index: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn hex(bytes: [u8; 3]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

impl<W: Write> EventSink for EventPrinter<W> {
    type Error = io::Error;

    fn send(&mut self, event: PerformanceEvent) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(
                self.writer,
                "[{}] channel {} pitch {} velocity {}",
                self.index,
                event.channel(),
                event.pitch(),
                event.velocity()
            )?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.writer, &event).map_err(io::Error::from)?;
                writeln!(self.writer)?;
            }
            OutputFormat::Midi => writeln!(
                self.writer,
                "{}  {}",
                hex(event.note_on()),
                hex(event.note_off())
            )?,
        }
        self.index += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(velocity: u8) -> PerformanceEvent {
        PerformanceEvent::new(0, 60, velocity).unwrap()
    }

    fn printed(format: OutputFormat, events: &[PerformanceEvent]) -> String {
        let mut printer = EventPrinter::new(Vec::new(), format);
        for &e in events {
            printer.send(e).unwrap();
        }
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test]
    fn test_text_format() {
        let out = printed(OutputFormat::Text, &[event(100), event(50)]);
        assert_eq!(
            out,
            "[0] channel 0 pitch 60 velocity 100\n[1] channel 0 pitch 60 velocity 50\n"
        );
    }

    #[test]
    fn test_json_format() {
        let out = printed(OutputFormat::Json, &[event(127)]);
        assert_eq!(out, "{\"channel\":0,\"pitch\":60,\"velocity\":127}\n");
    }

    #[test]
    fn test_midi_format() {
        let out = printed(OutputFormat::Midi, &[event(100)]);
        assert_eq!(out, "90 3C 64  80 3C 64\n");
    }

    #[test]
    fn test_midi_format_last_channel() {
        let last = PerformanceEvent::new(15, 60, 100).unwrap();
        let out = printed(OutputFormat::Midi, &[last]);
        assert_eq!(out, "9F 3C 64  8F 3C 64\n");
    }
}

use crate::playback::{EventPrinter, OutputFormat};
use anyhow::{Context, Result};
use jaki_core::{Alphabet, Pattern, PatternSpace, Patterns, PerformanceMapper, SynthVelocities};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// How patterns are written out
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Symbols for short and long notes
    pub alphabet: Alphabet,
    /// Text placed between patterns
    pub separator: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            alphabet: Alphabet::default(),
            separator: "\n".to_string(),
        }
    }
}

/// Settings for turning a pattern into events
#[derive(Debug, Clone, Default)]
pub struct PerformanceConfig {
    pub pitch: Option<u8>,
    pub channel: Option<u8>,
    pub velocities: SynthVelocities,
    pub format: OutputFormat,
}

impl PerformanceConfig {
    pub fn mapper(&self) -> Result<PerformanceMapper> {
        let defaults = PerformanceMapper::default();
        PerformanceMapper::new(
            self.pitch.unwrap_or(defaults.pitch()),
            self.channel.unwrap_or(defaults.channel()),
            self.velocities,
        )
        .context("Invalid performance settings")
    }
}

fn space(length: i64, display: &DisplayConfig) -> Result<PatternSpace> {
    let space = PatternSpace::new(length)
        .with_context(|| format!("Cannot enumerate patterns of length {}", length))?;
    Ok(space.with_alphabet(display.alphabet))
}

fn show(patterns: Patterns, display: &DisplayConfig) -> String {
    patterns.with_separator(display.separator.clone()).to_string()
}

/// Number of patterns of `length`
pub fn count(length: i64) -> Result<String> {
    let space = PatternSpace::new(length)
        .with_context(|| format!("Cannot count patterns of length {}", length))?;
    let count = space.count()?;
    Ok(count.to_string())
}

/// Patterns `start..stop` of `length`, every `step`th one
pub fn list(
    length: i64,
    start: u128,
    stop: Option<u128>,
    step: u128,
    display: &DisplayConfig,
) -> Result<String> {
    let slice = space(length, display)?
        .slice(start, stop, step)
        .context("Invalid slice")?;
    Ok(show(slice.collect(), display))
}

/// The first `n` patterns of `length`
pub fn head(length: i64, n: u128, display: &DisplayConfig) -> Result<String> {
    Ok(show(space(length, display)?.head(n).collect(), display))
}

/// The pattern at `index` among those of `length`
pub fn get(length: i64, index: u128, display: &DisplayConfig) -> Result<String> {
    let pattern = space(length, display)?
        .get(index)
        .with_context(|| format!("No pattern at index {}", index))?;
    Ok(pattern.to_string())
}

/// Index of a written pattern among the patterns of its own length
pub fn rank(input: &str, display: &DisplayConfig) -> Result<String> {
    let pattern = parse(input, display.alphabet)?;
    let space = PatternSpace::of_length(pattern.total_duration());
    let index = space.rank(&pattern)?;
    Ok(match space.count() {
        Ok(count) => format!("{} of {}", index, count),
        Err(_) => index.to_string(),
    })
}

/// `k` random patterns of `length`, reproducible when `seed` is given
pub fn choose(length: i64, k: usize, seed: Option<u64>, display: &DisplayConfig) -> Result<String> {
    let space = space(length, display)?;
    let chosen = match seed {
        Some(seed) => space.choose_with_rng(k, &mut StdRng::seed_from_u64(seed)),
        None => space.choose(k),
    }
    .with_context(|| format!("Cannot sample patterns of length {}", length))?;
    Ok(show(chosen, display))
}

/// Events for a written pattern, formatted one per line
pub fn perform(input: &str, display: &DisplayConfig, config: &PerformanceConfig) -> Result<String> {
    let pattern = parse(input, display.alphabet)?;
    let mapper = config.mapper()?;

    let mut printer = EventPrinter::new(Vec::new(), config.format);
    let sent = mapper
        .perform(&pattern, &mut printer)
        .context("Failed to write events")?;
    tracing::info!(events = sent, pattern = %pattern, "performed pattern");

    let out = String::from_utf8(printer.into_inner()).context("Event output was not UTF-8")?;
    Ok(out.trim_end().to_string())
}

fn parse(input: &str, alphabet: Alphabet) -> Result<Pattern> {
    Pattern::parse(input, alphabet)
        .with_context(|| format!("Cannot read pattern {:?} with alphabet {}", input, alphabet))
}

use anyhow::{Context, Result};
use autojaki_lib::{commands, DisplayConfig, OutputFormat, PerformanceConfig};
use clap::{ArgAction, Parser, Subcommand};
use jaki_core::{Alphabet, SynthVelocities};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "autojaki")]
#[command(about = "Enumerate, sample and perform short/long rhythm patterns", long_about = None)]
struct Cli {
    /// Two symbols for short and long notes
    #[arg(short, long, global = true, default_value = "·–")]
    alphabet: String,

    /// Text printed between patterns
    #[arg(long, global = true, default_value = "\n")]
    separator: String,

    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count the patterns of a length
    Count {
        #[arg(allow_negative_numbers = true)]
        length: i64,
    },
    /// List a slice of the patterns of a length
    List {
        #[arg(allow_negative_numbers = true)]
        length: i64,

        /// First index (default: 0)
        #[arg(long, default_value = "0")]
        start: u128,

        /// Index to stop before (default: the end)
        #[arg(long)]
        stop: Option<u128>,

        /// Take every nth pattern
        #[arg(long, default_value = "1")]
        step: u128,
    },
    /// Show the first patterns of a length
    Head {
        #[arg(allow_negative_numbers = true)]
        length: i64,

        /// How many patterns to show
        #[arg(short, default_value = "5")]
        n: u128,
    },
    /// Show the pattern at an index
    Get {
        #[arg(allow_negative_numbers = true)]
        length: i64,

        index: u128,
    },
    /// Show the index of a pattern
    Rank {
        pattern: String,
    },
    /// Draw random patterns of a length
    Choose {
        #[arg(allow_negative_numbers = true)]
        length: i64,

        /// How many patterns to draw
        #[arg(short, default_value = "1")]
        k: usize,

        /// Seed for reproducible draws
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the performance events for a pattern
    Perform {
        pattern: String,

        /// Note number (default: 60)
        #[arg(long)]
        pitch: Option<u8>,

        /// Channel or voice (default: 0)
        #[arg(long)]
        channel: Option<u8>,

        /// Velocity of a short note after a long one
        #[arg(long)]
        accent: Option<u8>,

        /// Velocity of other short notes and the start of long ones
        #[arg(long)]
        normal: Option<u8>,

        /// Velocity of the second half of long notes
        #[arg(long)]
        soft: Option<u8>,

        /// Velocities as JSON, e.g. '{"accent": 120}'
        #[arg(long)]
        velocities_json: Option<String>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn velocities(
    json: Option<&str>,
    accent: Option<u8>,
    normal: Option<u8>,
    soft: Option<u8>,
) -> Result<SynthVelocities> {
    let base = match json {
        Some(json) => SynthVelocities::from_json(json)?,
        None => SynthVelocities::default(),
    };
    SynthVelocities::new(
        accent.unwrap_or(base.accent),
        normal.unwrap_or(base.normal),
        soft.unwrap_or(base.soft),
    )
    .context("Invalid velocities")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let display = DisplayConfig {
        alphabet: Alphabet::new(&cli.alphabet).context("Invalid --alphabet")?,
        separator: cli.separator,
    };

    let output = match cli.command {
        Commands::Count { length } => commands::count(length)?,
        Commands::List {
            length,
            start,
            stop,
            step,
        } => commands::list(length, start, stop, step, &display)?,
        Commands::Head { length, n } => commands::head(length, n, &display)?,
        Commands::Get { length, index } => commands::get(length, index, &display)?,
        Commands::Rank { pattern } => commands::rank(&pattern, &display)?,
        Commands::Choose { length, k, seed } => commands::choose(length, k, seed, &display)?,
        Commands::Perform {
            pattern,
            pitch,
            channel,
            accent,
            normal,
            soft,
            velocities_json,
            format,
        } => {
            let config = PerformanceConfig {
                pitch,
                channel,
                velocities: velocities(velocities_json.as_deref(), accent, normal, soft)?,
                format,
            };
            commands::perform(&pattern, &display, &config)?
        }
    };

    println!("{}", output);
    Ok(())
}

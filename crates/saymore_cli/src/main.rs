//! SayMore CLI
//!
//! Command-line tools for SayMore annotation files.
//!
//! # Commands
//!
//! - `inspect` - Display segments, text tiers and statistics
//! - `verify` - Check segment invariants and orphaned segment files
//! - `import-labels` - Create an annotation file from Audacity labels

mod commands;

use clap::{Parser, Subcommand};
use saymore_core::TierConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SayMore annotation file tools.
#[derive(Parser)]
#[command(name = "saymore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Shortest acceptable segment, in milliseconds
    #[arg(global = true, long, default_value = "500")]
    min_segment_ms: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display segments, text tiers and statistics
    Inspect {
        /// Annotation file (.eaf)
        eaf: PathBuf,

        /// List every segment
        #[arg(short, long)]
        segments: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check segment invariants and orphaned segment files
    Verify {
        /// Annotation file (.eaf)
        eaf: PathBuf,
    },

    /// Create an annotation file from an Audacity label file
    ImportLabels {
        /// Audacity label file
        labels: PathBuf,

        /// The media file the labels were made for
        #[arg(short, long)]
        media: PathBuf,

        /// Where to write the annotation file (defaults to next to the media)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = TierConfig::new().minimum_segment_length_ms(cli.min_segment_ms);

    match cli.command {
        Commands::Inspect {
            eaf,
            segments,
            format,
        } => {
            commands::inspect::run(&eaf, config, segments, &format)?;
        }
        Commands::Verify { eaf } => {
            commands::verify::run(&eaf, config)?;
        }
        Commands::ImportLabels {
            labels,
            media,
            output,
        } => {
            commands::import_labels::run(&labels, &media, output.as_deref(), &config)?;
        }
        Commands::Version => {
            println!("SayMore CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("SayMore Core v{}", saymore_core::VERSION);
        }
    }

    Ok(())
}

//! bwtpack CLI - block-sorting compression from the command line.
//!
//! Compresses files through BWT + MTF + RLE + Huffman into a stream of
//! block records, and restores, verifies or inspects such streams.

mod commands;
mod utils;

use bwtpack_codec::{CodecConfig, DEFAULT_BLOCK_SIZE, DEFAULT_CHUNK_SIZE};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bwtpack")]
#[command(author, version, about = "Block-sorting compressor (BWT + MTF + RLE + Huffman)")]
#[command(long_about = "
bwtpack compresses a file block by block: each block is Burrows-Wheeler
transformed in fixed-size chunks, Move-to-Front and run-length encoded, then
Huffman coded with its own code table.

The chunk size is not stored in the stream; decompress with the same
--chunk-size that was used to compress.

Examples:
  bwtpack compress notes.txt
  bwtpack compress image.bmp -o image.bwp --block-size 409600
  bwtpack decompress notes.txt.bwp
  bwtpack test notes.txt
  bwtpack info notes.txt.bwp --json
  bwtpack entropy notes.txt
  bwtpack entropy notes.txt --sweep
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

/// Block and chunk size flags shared by the subcommands that run the codec.
#[derive(Args, Clone, Copy)]
struct SizeArgs {
    /// Block size in bytes
    #[arg(short = 'b', long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// BWT chunk size in bytes
    #[arg(short = 'c', long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,
}

impl SizeArgs {
    fn config(self) -> bwtpack_codec::Result<CodecConfig> {
        CodecConfig::new(self.block_size, self.chunk_size)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    #[command(alias = "c")]
    Compress {
        /// File to compress
        input: PathBuf,

        /// Output file (default: <input>.bwp)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        sizes: SizeArgs,

        /// Encode blocks on all cores
        #[arg(short = 'j', long)]
        parallel: bool,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Decompress a file
    #[command(alias = "d")]
    Decompress {
        /// File to decompress
        input: PathBuf,

        /// Output file (default: input without .bwp, or <input>.out)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        sizes: SizeArgs,

        /// Decode blocks on all cores
        #[arg(short = 'j', long)]
        parallel: bool,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Compress and decompress in memory, then report sizes and timing
    #[command(alias = "t")]
    Test {
        /// File to test with
        input: PathBuf,

        #[command(flatten)]
        sizes: SizeArgs,

        /// Output as JSON (machine-readable)
        #[arg(long)]
        json: bool,
    },

    /// List the block records of a compressed file
    #[command(alias = "i")]
    Info {
        /// Compressed file to inspect
        archive: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(long)]
        json: bool,
    },

    /// Compare entropy before and after BWT + MTF
    Entropy {
        /// File to analyze
        input: PathBuf,

        #[command(flatten)]
        sizes: SizeArgs,

        /// Try block sizes from 1 KiB to 1 MiB and report the best one
        #[arg(long)]
        sweep: bool,

        /// Output as JSON (machine-readable)
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Off
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    // Fails only if a logger is already installed
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Compress {
            input,
            output,
            sizes,
            parallel,
            progress,
        } => commands::cmd_compress(
            &input,
            output.as_deref(),
            &sizes.config()?,
            parallel,
            progress,
        ),
        Commands::Decompress {
            input,
            output,
            sizes,
            parallel,
            progress,
        } => commands::cmd_decompress(
            &input,
            output.as_deref(),
            &sizes.config()?,
            parallel,
            progress,
        ),
        Commands::Test {
            input,
            sizes,
            json,
        } => commands::cmd_test(&input, &sizes.config()?, json),
        Commands::Info { archive, json } => commands::cmd_info(&archive, json),
        Commands::Entropy {
            input,
            sizes,
            sweep,
            json,
        } => commands::cmd_entropy(&input, &sizes.config()?, sweep, json),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

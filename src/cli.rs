//! Implementation of the CLI application of ldpc-decoders.

use clap::Parser;
use std::error::Error;

pub mod codes;
pub mod decode;

/// Trait to run a CLI subcommand.
pub trait Run {
    /// Run the CLI subcommand.
    fn run(&self) -> Result<(), Box<dyn Error>>;
}

/// CLI options.
#[derive(Debug, Parser)]
#[command(name = "ldpc-decoders", about = "LDPC decoders", version)]
pub enum Args {
    /// codes subcommand
    Codes(codes::Args),
    /// decode subcommand
    Decode(decode::Args),
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        match self {
            Args::Codes(x) => x.run(),
            Args::Decode(x) => x.run(),
        }
    }
}

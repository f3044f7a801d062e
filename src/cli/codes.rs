//! Code listing CLI subcommand.
//!
//! This subcommand parses a control file and prints a table with the codes
//! it defines, validating each definition along the way.

use crate::cli::Run;
use crate::codes::parse_control_file;
use clap::Parser;
use console::style;
use std::error::Error;

/// Code listing CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Lists the codes defined in a control file")]
pub struct Args {
    /// Control file with one code definition per line
    control: String,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let codes = parse_control_file(&std::fs::read_to_string(&self.control)?)?;
        println!(
            "{}",
            style("idx     n     k d_min gamma checks").bold()
        );
        for (idx, code) in codes.iter().enumerate() {
            let h = code.h()?;
            let gamma = h
                .uniform_row_weight()
                .map(|w| w.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:3} {:5} {:5} {:5} {:>5} {}",
                idx,
                code.n(),
                code.num_checks(),
                code.d_min(),
                gamma,
                if code.orthogonal() { "ortho" } else { "nonortho" },
            );
        }
        Ok(())
    }
}
